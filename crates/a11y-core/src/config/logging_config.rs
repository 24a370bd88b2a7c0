//! Logging configuration

use crate::error::AuditError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Levels accepted in `logging.level`, least verbose last
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Output format of log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compact => write!(f, "compact"),
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(AuditError::config(format!(
                "logging.format must be one of compact, pretty, json, got '{}'",
                other
            ))),
        }
    }
}

/// Where and how audit runs are logged
///
/// Logs never go to stdout, which carries `export -` output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of [`LOG_LEVELS`]; `RUST_LOG` takes precedence at runtime
    pub level: String,
    pub format: LogFormat,
    /// Write log lines to stderr
    pub stderr: bool,
    /// Also append log lines to this file; `~` is expanded
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::default(),
            stderr: true,
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Lower the threshold to `debug` for `--verbose`; an explicit `trace`
    /// stays.
    pub fn raise_to_debug(&mut self) {
        if !self.level.eq_ignore_ascii_case("trace") {
            self.level = "debug".to_string();
        }
    }

    pub fn file_path(&self) -> Option<PathBuf> {
        self.file
            .as_deref()
            .map(|file| PathBuf::from(shellexpand::tilde(file).into_owned()))
    }
}
