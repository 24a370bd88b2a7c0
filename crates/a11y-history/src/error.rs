//! History error types

use thiserror::Error;

/// Errors raised by normalization, record stores and projections
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("Persistent storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Failed to write audit history: {0}")]
    Write(String),

    #[error("Failed to read audit history: {0}")]
    Read(String),

    #[error("Malformed checker results: {0}")]
    MalformedResults(String),

    #[error("Export failed: {0}")]
    Export(String),
}

impl HistoryError {
    /// Stable code for programmatic handling
    pub fn code(&self) -> &'static str {
        match self {
            Self::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
            Self::Write(_) => "WRITE_ERROR",
            Self::Read(_) => "READ_ERROR",
            Self::MalformedResults(_) => "MALFORMED_RESULTS",
            Self::Export(_) => "EXPORT_ERROR",
        }
    }
}

/// Result type for history operations
pub type HistoryResult<T> = Result<T, HistoryError>;
