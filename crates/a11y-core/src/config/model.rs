//! Configuration data structures

use super::logging_config::LoggingConfig;
use crate::error::{AuditError, AuditResult};
use a11y_history::storage::{DEFAULT_TABLE_FILE, default_store_dir};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default timeout for page fetches (20 seconds)
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 20;

/// Default timeout for one checker run (120 seconds)
pub const DEFAULT_CHECKER_TIMEOUT_SECS: u64 = 120;

/// Placeholder in checker args replaced by the document path
pub const DOCUMENT_PATH_PLACEHOLDER: &str = "{document}";

/// Placeholder in checker args replaced by the document `file://` URL
pub const DOCUMENT_URL_PLACEHOLDER: &str = "{document_url}";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub fetch: FetchConfig,
    pub checker: CheckerConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Remote page retrieval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Prefix prepended to the audited URL (a CORS-style forwarding proxy).
    /// Empty means fetch directly.
    pub proxy_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            proxy_url: String::new(),
            timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            user_agent: format!("a11y-audit/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// External checker command
///
/// The command runs once per audit in a scratch directory holding
/// `document.html` and must print the checker's JSON results on stdout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    pub command: String,
    /// Arguments; `{document}` and `{document_url}` are substituted, and
    /// the document path is appended when neither appears
    pub args: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            command: "axe".to_string(),
            args: vec![DOCUMENT_URL_PLACEHOLDER.to_string(), "--stdout".to_string()],
            timeout_secs: DEFAULT_CHECKER_TIMEOUT_SECS,
        }
    }
}

impl CheckerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Audit history storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory of the audit table; `~` is expanded. Defaults to
    /// `~/.a11y-audit`.
    pub directory: Option<String>,
    pub file_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file_name: DEFAULT_TABLE_FILE.to_string(),
        }
    }
}

impl StorageConfig {
    /// Full path of the audit table file
    pub fn table_path(&self) -> AuditResult<PathBuf> {
        let dir = match &self.directory {
            Some(dir) => PathBuf::from(shellexpand::tilde(dir).into_owned()),
            None => default_store_dir().map_err(AuditError::from)?,
        };
        Ok(dir.join(&self.file_name))
    }
}
