//! Error types for SubTrack
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

use crate::record::RecordId;

/// Result type alias using SubsError
pub type Result<T> = std::result::Result<T, SubsError>;

/// Unified error type for SubTrack operations
#[derive(Debug, Error)]
pub enum SubsError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Record Errors
    // -------------------------------------------------------------------------
    /// Rejected user input; the message is meant to be shown as-is.
    #[error("{0}")]
    Validation(String),

    #[error("Record not found: {0}")]
    RecordNotFound(RecordId),

    // -------------------------------------------------------------------------
    // Journal Errors
    // -------------------------------------------------------------------------
    #[error("Journal corruption detected: {0}")]
    JournalCorruption(String),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Storage error: {0}")]
    Storage(String),

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
}

impl SubsError {
    /// Shorthand for building a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        SubsError::Validation(message.into())
    }
}

impl From<bincode::Error> for SubsError {
    fn from(e: bincode::Error) -> Self {
        SubsError::Serialization(e.to_string())
    }
}
