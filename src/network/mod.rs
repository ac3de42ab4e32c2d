//! Network Module
//!
//! HTTP server and request handling.
//!
//! ## Architecture
//! - axum router on a multi-threaded tokio runtime
//! - Handlers decode requests into commands
//! - Commands run against the Engine on the blocking pool

mod server;
mod routes;

pub use server::Server;
pub use routes::{router, status_for, ApiError};
