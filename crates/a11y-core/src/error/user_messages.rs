//! User-friendly error messages and classification
//!
//! Turns an [`AuditError`] into a title, explanation and suggested actions
//! suitable for showing to the person running the audit.

use super::types::AuditError;

/// Error category for user-facing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Invalid user input
    UserInput,
    /// Network connectivity or proxy issues
    Network,
    /// Checker engine failures
    Checker,
    /// Local history storage issues
    Storage,
    /// Checker returned something unexpected
    Internal,
    /// Configuration issues
    Configuration,
    /// File system related errors
    FileSystem,
}

impl ErrorCategory {
    /// Get a user-friendly category name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::UserInput => "Invalid Input",
            Self::Network => "Network Error",
            Self::Checker => "Checker Error",
            Self::Storage => "History Storage Error",
            Self::Internal => "Internal Error",
            Self::Configuration => "Configuration Error",
            Self::FileSystem => "File System Error",
        }
    }
}

/// User-friendly error information
#[derive(Debug, Clone)]
pub struct UserFriendlyError {
    pub category: ErrorCategory,
    pub title: String,
    pub message: String,
    pub suggestions: Vec<String>,
    /// Whether the user can fix this without a code change
    pub is_recoverable: bool,
    pub error_code: String,
}

impl UserFriendlyError {
    pub fn new(category: ErrorCategory, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            category,
            title: title.into(),
            message: message.into(),
            suggestions: Vec::new(),
            is_recoverable: true,
            error_code: String::new(),
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn recoverable(mut self, is_recoverable: bool) -> Self {
        self.is_recoverable = is_recoverable;
        self
    }

    pub fn with_error_code(mut self, code: impl Into<String>) -> Self {
        self.error_code = code.into();
        self
    }

    /// Format the error for display: a headline, a blank line, then the
    /// explanation and suggested actions
    pub fn format_display(&self) -> String {
        let mut output = format!(
            "{}: {}\n\n{}",
            self.category.display_name(),
            self.title,
            self.message
        );

        if !self.suggestions.is_empty() {
            output.push_str("\n\nSuggested actions:");
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("\n  {}. {}", i + 1, suggestion));
            }
        }

        if !self.is_recoverable {
            output.push_str("\n\nRunning the audit again will not change this result.");
        }

        output
    }
}

impl From<&AuditError> for UserFriendlyError {
    fn from(error: &AuditError) -> Self {
        let friendly = match error {
            AuditError::Validation { message } => {
                UserFriendlyError::new(ErrorCategory::UserInput, "Nothing to audit", message.clone())
                    .with_suggestion("Enter either a URL or pasted HTML, not both")
            }

            AuditError::FetchFailed {
                message,
                status_code,
                ..
            } => {
                let title = match status_code {
                    Some(code) => format!("Page request returned HTTP {}", code),
                    None => "Failed to fetch page".to_string(),
                };
                UserFriendlyError::new(ErrorCategory::Network, title, message.clone())
                    .with_suggestion("Check the URL")
                    .with_suggestion("Check the proxy prefix in the fetch configuration")
            }

            AuditError::CheckerFailed { message, .. } => {
                UserFriendlyError::new(ErrorCategory::Checker, "Audit could not run", message.clone())
                    .with_suggestion("Verify the checker command is installed and on PATH")
                    .with_suggestion("Run again with --verbose to see the checker output")
            }

            AuditError::StorageUnavailable { message } => UserFriendlyError::new(
                ErrorCategory::Storage,
                "Audit history unavailable",
                message.clone(),
            )
            .with_suggestion("Check that the storage directory exists and is writable"),

            AuditError::WriteError { message } => UserFriendlyError::new(
                ErrorCategory::Storage,
                "Audit not recorded",
                message.clone(),
            )
            .with_suggestion("The results above are still valid; free disk space or fix permissions and re-run to record them"),

            AuditError::ReadError { message } => UserFriendlyError::new(
                ErrorCategory::Storage,
                "Could not load audit history",
                message.clone(),
            )
            .with_suggestion("Inspect or remove the audit table file"),

            AuditError::MalformedResults { message } => UserFriendlyError::new(
                ErrorCategory::Internal,
                "Unexpected checker output",
                message.clone(),
            )
            .with_suggestion("Make sure the checker prints its JSON results to stdout")
            .recoverable(false),

            AuditError::Config { message, .. } => UserFriendlyError::new(
                ErrorCategory::Configuration,
                "Invalid configuration",
                message.clone(),
            )
            .with_suggestion("Fix the configuration file or the A11Y_AUDIT_* environment variables"),

            AuditError::Export { message, .. } => {
                UserFriendlyError::new(ErrorCategory::FileSystem, "Export failed", message.clone())
            }
        };

        friendly.with_error_code(error.error_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_status_in_title() {
        let err = AuditError::fetch_failed_with_status("HTTP error! status: 404", "https://x.test", 404);
        let friendly = UserFriendlyError::from(&err);
        assert_eq!(friendly.category, ErrorCategory::Network);
        assert_eq!(friendly.title, "Page request returned HTTP 404");
        assert_eq!(friendly.error_code, "AUDIT_FETCH_FAILED");
    }

    #[test]
    fn test_format_display_lists_suggestions() {
        let friendly = UserFriendlyError::from(&AuditError::validation("Please enter a URL or paste HTML to audit."));
        let text = friendly.format_display();
        assert!(text.starts_with("Invalid Input: Nothing to audit"));
        assert!(text.contains("Suggested actions:\n  1. Enter either a URL or pasted HTML, not both"));
        assert!(!text.contains("will not change"));
    }

    #[test]
    fn test_malformed_results_are_not_recoverable() {
        let friendly = UserFriendlyError::from(&AuditError::malformed("missing violations array"));
        assert!(!friendly.is_recoverable);
        assert_eq!(friendly.category, ErrorCategory::Internal);
        assert!(
            friendly
                .format_display()
                .ends_with("Running the audit again will not change this result.")
        );
    }
}
