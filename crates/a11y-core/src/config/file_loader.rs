//! Configuration file discovery and parsing

use super::model::AuditConfig;
use crate::error::{AuditError, AuditResult};
use a11y_history::storage::default_store_dir;
use std::fs;
use std::path::{Path, PathBuf};

/// Looked up in the working directory, in order, when no file is named
pub const CONFIG_FILE_CANDIDATES: &[&str] = &[
    "a11y_audit.toml",
    "a11y_audit.yaml",
    "a11y_audit.yml",
    "a11y_audit.json",
];

/// Looked up next to the default audit table after the working directory
pub const STORE_DIR_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Chosen by extension; anything unrecognized is read as JSON
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Self::Toml,
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Yaml => "YAML",
            Self::Json => "JSON",
        }
    }

    fn parse(self, content: &str) -> Result<AuditConfig, String> {
        match self {
            Self::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

/// Find the configuration file to use when none was named: the first
/// [`CONFIG_FILE_CANDIDATES`] entry in `dir`, then
/// [`STORE_DIR_CONFIG_FILE`] in the default store directory.
pub fn discover_config_file(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_CANDIDATES
        .iter()
        .map(|name| dir.join(name))
        .chain(default_store_dir().ok().map(|store| store.join(STORE_DIR_CONFIG_FILE)))
        .find(|path| path.is_file())
}

/// Load the configuration file at `path`
///
/// A relative `storage.directory` is taken relative to the file, so a
/// project-local config can keep its history next to it.
pub fn load_from_file(path: &Path) -> AuditResult<AuditConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        AuditError::config_with_context(
            format!("Failed to read config file: {}", e),
            format!("Reading configuration from '{}'", path.display()),
        )
    })?;

    let format = ConfigFormat::of(path);
    let mut config = format.parse(&content).map_err(|e| {
        AuditError::config_with_context(
            format!("Failed to parse {} config: {}", format.name(), e),
            format!("Deserializing configuration from '{}'", path.display()),
        )
    })?;

    if let (Some(dir), Some(base)) = (&config.storage.directory, path.parent()) {
        let expanded = PathBuf::from(shellexpand::tilde(dir).into_owned());
        if expanded.is_relative() {
            config.storage.directory = Some(base.join(expanded).to_string_lossy().into_owned());
        }
    }

    Ok(config)
}
