//! Conversions from other error types into AuditError

use super::types::AuditError;
use a11y_history::HistoryError;

impl From<HistoryError> for AuditError {
    fn from(error: HistoryError) -> Self {
        match error {
            HistoryError::StorageUnavailable(message) => Self::storage_unavailable(message),
            HistoryError::Write(message) => Self::write(message),
            HistoryError::Read(message) => Self::read(message),
            HistoryError::MalformedResults(message) => Self::malformed(message),
            HistoryError::Export(message) => Self::export(message),
        }
    }
}

impl From<reqwest::Error> for AuditError {
    fn from(error: reqwest::Error) -> Self {
        let status_code = error.status().map(|s| s.as_u16());
        let url = error.url().map(|u| u.to_string());
        let message = if error.is_timeout() {
            format!("request timed out: {}", error)
        } else if error.is_connect() {
            format!("could not connect: {}", error)
        } else {
            error.to_string()
        };

        Self::FetchFailed {
            message,
            url,
            status_code,
        }
    }
}
