//! Configuration for castbase
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for a castbase instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// CSV file the table is loaded from and rewritten to after every mutation
    pub data_file: PathBuf,

    // -------------------------------------------------------------------------
    // Logging Configuration
    // -------------------------------------------------------------------------
    /// Append-only log file
    pub log_file: PathBuf,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// HTTP listen address
    pub listen_addr: String,

    // -------------------------------------------------------------------------
    // Query Configuration
    // -------------------------------------------------------------------------
    /// Page used when the request omits `page`
    pub default_page: u64,

    /// Page size used when the request omits `per_page`
    pub default_per_page: u64,

    /// Reject updates naming unknown columns instead of ignoring them
    pub reject_unknown_fields: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("friends_data.csv"),
            log_file: PathBuf::from("friends_analysis.log"),
            listen_addr: "127.0.0.1:5000".to_string(),
            default_page: 1,
            default_per_page: 10,
            reject_unknown_fields: false,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the backing CSV file
    pub fn data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_file = path.into();
        self
    }

    /// Set the log file
    pub fn log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.log_file = path.into();
        self
    }

    /// Set the HTTP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the default page size
    pub fn default_per_page(mut self, per_page: u64) -> Self {
        self.config.default_per_page = per_page;
        self
    }

    /// Reject (instead of ignoring) unknown update fields
    pub fn reject_unknown_fields(mut self, reject: bool) -> Self {
        self.config.reject_unknown_fields = reject;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
