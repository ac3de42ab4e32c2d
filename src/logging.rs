//! Logging setup
//!
//! Leveled, timestamped events go to stdout and are appended to a log file.
//! The file is write-only from our side; nothing ever reads it back.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{CastError, Result};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info,castbase=debug";

/// Install the global subscriber
///
/// Fails if the log file cannot be opened for appending or a subscriber is
/// already installed.
pub fn init(log_file: &Path, verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new(DEFAULT_FILTER)
        }
    });

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|e| CastError::Config(format!("failed to install logger: {}", e)))
}
