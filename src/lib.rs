//! # castbase
//!
//! A small REST API over a CSV-backed character roster:
//! - Paginated listing in file order
//! - Case-insensitive substring search on names
//! - Update and delete by id, each followed by an atomic file rewrite
//! - Single-writer/multi-reader access to the in-memory table
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      HTTP Server (axum)                     │
//! │                   GET / PUT / DELETE routes                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  codec: query/body → Command
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Engine                               │
//! │            (Single Writer / Multi Reader)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Table    │          │   Storage   │
//!   │  (RwLock)   │ ───────► │ (CSV file)  │
//!   └─────────────┘  persist └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod logging;

pub mod table;
pub mod storage;
pub mod network;
pub mod protocol;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CastError, ErrorKind, Result};
pub use config::Config;
pub use engine::Engine;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of castbase
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
