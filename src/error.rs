//! Error types for castbase
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using CastError
pub type Result<T> = std::result::Result<T, CastError>;

/// Unified error type for castbase operations
#[derive(Debug, Error)]
pub enum CastError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // CSV / Table Errors
    // -------------------------------------------------------------------------
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Column not found: {0}")]
    MissingColumn(String),

    // -------------------------------------------------------------------------
    // Request Errors
    // -------------------------------------------------------------------------
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Character with id {0} not found")]
    CharacterNotFound(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification used to pick a response status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or missing query/body parameters
    InvalidArgument,

    /// Referenced id is absent
    NotFound,

    /// Anything unexpected, including load/persist faults
    Internal,
}

impl CastError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CastError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            CastError::CharacterNotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::Internal,
        }
    }

    /// Shorthand for an invalid-argument error
    pub fn invalid(message: impl Into<String>) -> Self {
        CastError::InvalidArgument(message.into())
    }

    /// Not-found error for a numeric id
    pub fn not_found(id: i64) -> Self {
        CastError::CharacterNotFound(id.to_string())
    }
}

impl From<serde_json::Error> for CastError {
    fn from(e: serde_json::Error) -> Self {
        CastError::Serialization(e.to_string())
    }
}
