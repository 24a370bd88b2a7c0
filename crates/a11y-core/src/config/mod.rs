//! Configuration management
//!
//! Configuration is layered: built-in defaults, then an optional JSON,
//! TOML or YAML file (named explicitly or discovered), then `A11Y_AUDIT_*`
//! environment variables. The merged result is validated before use.

pub mod env_loader;
pub mod file_loader;
pub mod logging_config;
pub mod model;
pub mod validation;

pub use env_loader::{apply_env_overrides, apply_overrides_from};
pub use file_loader::{discover_config_file, load_from_file};
pub use logging_config::{LogFormat, LoggingConfig};
pub use model::{AuditConfig, CheckerConfig, FetchConfig, StorageConfig};
pub use validation::validate_config;

use crate::error::AuditResult;
use std::path::{Path, PathBuf};

/// A validated configuration and the file it came from, if any
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AuditConfig,
    pub source: Option<PathBuf>,
}

/// Load, override and validate the configuration
///
/// `explicit` must exist when given. Otherwise the file is discovered from
/// the working directory, and defaults apply when none is found.
pub fn load_config(explicit: Option<&Path>) -> AuditResult<LoadedConfig> {
    let source = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => std::env::current_dir()
            .ok()
            .and_then(|dir| discover_config_file(&dir)),
    };

    let mut config = match &source {
        Some(path) => load_from_file(path)?,
        None => AuditConfig::default(),
    };
    apply_env_overrides(&mut config)?;
    validate_config(&config)?;
    Ok(LoadedConfig { config, source })
}
