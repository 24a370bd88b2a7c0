//! Constructor methods for AuditError

use super::types::AuditError;

impl AuditError {
    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a fetch error for a non-success HTTP status
    pub fn fetch_failed_with_status(
        message: impl Into<String>,
        url: impl Into<String>,
        status_code: u16,
    ) -> Self {
        Self::FetchFailed {
            message: message.into(),
            url: Some(url.into()),
            status_code: Some(status_code),
        }
    }

    /// Create a checker error
    pub fn checker(message: impl Into<String>) -> Self {
        Self::CheckerFailed {
            message: message.into(),
            context: None,
        }
    }

    /// Create a checker error with context (stderr, command line, ...)
    pub fn checker_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::CheckerFailed {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    pub fn storage_unavailable(message: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            message: message.into(),
        }
    }

    pub fn write(message: impl Into<String>) -> Self {
        Self::WriteError {
            message: message.into(),
        }
    }

    pub fn read(message: impl Into<String>) -> Self {
        Self::ReadError {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResults {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a new export error
    pub fn export(message: impl Into<String>) -> Self {
        Self::Export {
            message: message.into(),
            path: None,
        }
    }

    /// Create an export error for a destination file
    pub fn export_to(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Export {
            message: message.into(),
            path: Some(path.into()),
        }
    }
}
