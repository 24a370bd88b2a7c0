//! Core error types for the audit workflow

use thiserror::Error;

/// Result type alias for audit operations
pub type AuditResult<T> = Result<T, AuditError>;

/// Coarse failure kind, one per taxonomy entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditErrorKind {
    Validation,
    FetchFailed,
    CheckerFailed,
    StorageUnavailable,
    WriteError,
    ReadError,
    MalformedResults,
    Config,
    Export,
}

/// Main error type for the audit workflow
///
/// Every variant carries a human-readable message; variants that can point
/// at something concrete (a URL, a file) carry it as well.
#[derive(Error, Debug, Clone)]
pub enum AuditError {
    /// Bad input combination; nothing was started
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Network or proxy failure while retrieving the page
    #[error("Failed to fetch page: {message}")]
    FetchFailed {
        message: String,
        url: Option<String>,
        status_code: Option<u16>,
    },

    /// Checker could not be loaded or failed while running
    #[error("Accessibility check failed: {message}")]
    CheckerFailed {
        message: String,
        context: Option<String>,
    },

    /// Persistent storage cannot be used at all
    #[error("Audit history storage unavailable: {message}")]
    StorageUnavailable { message: String },

    /// A write transaction failed
    #[error("Failed to save audit history: {message}")]
    WriteError { message: String },

    /// A read transaction failed
    #[error("Failed to read audit history: {message}")]
    ReadError { message: String },

    /// Checker output did not have the promised shape
    #[error("Malformed checker results: {message}")]
    MalformedResults { message: String },

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// History could not be exported
    #[error("Export failed: {message}")]
    Export {
        message: String,
        path: Option<String>,
    },
}

impl AuditError {
    pub fn kind(&self) -> AuditErrorKind {
        match self {
            Self::Validation { .. } => AuditErrorKind::Validation,
            Self::FetchFailed { .. } => AuditErrorKind::FetchFailed,
            Self::CheckerFailed { .. } => AuditErrorKind::CheckerFailed,
            Self::StorageUnavailable { .. } => AuditErrorKind::StorageUnavailable,
            Self::WriteError { .. } => AuditErrorKind::WriteError,
            Self::ReadError { .. } => AuditErrorKind::ReadError,
            Self::MalformedResults { .. } => AuditErrorKind::MalformedResults,
            Self::Config { .. } => AuditErrorKind::Config,
            Self::Export { .. } => AuditErrorKind::Export,
        }
    }

    /// Stable code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self.kind() {
            AuditErrorKind::Validation => "AUDIT_VALIDATION",
            AuditErrorKind::FetchFailed => "AUDIT_FETCH_FAILED",
            AuditErrorKind::CheckerFailed => "AUDIT_CHECKER_FAILED",
            AuditErrorKind::StorageUnavailable => "AUDIT_STORAGE_UNAVAILABLE",
            AuditErrorKind::WriteError => "AUDIT_WRITE_ERROR",
            AuditErrorKind::ReadError => "AUDIT_READ_ERROR",
            AuditErrorKind::MalformedResults => "AUDIT_MALFORMED_RESULTS",
            AuditErrorKind::Config => "AUDIT_CONFIG",
            AuditErrorKind::Export => "AUDIT_EXPORT",
        }
    }

    /// The plain message without the variant prefix
    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message }
            | Self::FetchFailed { message, .. }
            | Self::CheckerFailed { message, .. }
            | Self::StorageUnavailable { message }
            | Self::WriteError { message }
            | Self::ReadError { message }
            | Self::MalformedResults { message }
            | Self::Config { message, .. }
            | Self::Export { message, .. } => message,
        }
    }

    /// Whether retrying the same action might succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::FetchFailed { status_code, .. } => {
                status_code.is_none_or(|code| code >= 500 || code == 429)
            }
            Self::WriteError { .. } | Self::ReadError { .. } => true,
            _ => false,
        }
    }
}
