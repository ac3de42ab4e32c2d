//! HTTP Server
//!
//! Binds the listen address and serves the router until shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use crate::engine::Engine;
use crate::error::Result;

use super::routes::router;

/// HTTP server for castbase
pub struct Server {
    /// Shared engine handed to every request
    engine: Arc<Engine>,

    /// Fired by `shutdown()`
    shutdown: Arc<Notify>,
}

impl Server {
    /// Create a new server around the given engine
    pub fn new(engine: Arc<Engine>) -> Self {
        Self {
            engine,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// The router this server serves
    pub fn router(&self) -> Router {
        router(Arc::clone(&self.engine))
    }

    /// Bind `listen_addr` from the engine config and serve until shutdown
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(&self.engine.config().listen_addr).await?;
        self.serve(listener).await
    }

    /// Serve on an already-bound listener until Ctrl+C or `shutdown()`
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        let addr: SocketAddr = listener.local_addr()?;
        tracing::info!("Listening on http://{}", addr);

        let shutdown = Arc::clone(&self.shutdown);
        axum::serve(listener, self.router())
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }

    /// Signal the server to shutdown gracefully
    pub fn shutdown(&self) {
        // notify_one keeps a permit if nobody is waiting yet
        self.shutdown.notify_one();
    }
}

async fn wait_for_shutdown(shutdown: Arc<Notify>) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            match result {
                Ok(()) => tracing::info!("Received Ctrl+C, initiating shutdown..."),
                Err(e) => {
                    // No signal handler available; wait for an explicit shutdown instead
                    tracing::warn!("Unable to listen for Ctrl+C: {}", e);
                    shutdown.notified().await;
                }
            }
        }
        _ = shutdown.notified() => {
            tracing::info!("Shutdown requested");
        }
    }
}
