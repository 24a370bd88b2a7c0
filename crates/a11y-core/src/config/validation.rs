//! Configuration validation

use super::logging_config::LOG_LEVELS;
use super::model::AuditConfig;
use crate::error::{AuditError, AuditResult};

/// Check a fully merged configuration
pub fn validate_config(config: &AuditConfig) -> AuditResult<()> {
    let proxy = config.fetch.proxy_url.trim();
    if !proxy.is_empty() && !(proxy.starts_with("http://") || proxy.starts_with("https://")) {
        return Err(AuditError::config(format!(
            "fetch.proxy_url must be an http(s) URL prefix, got '{}'",
            proxy
        )));
    }

    if config.fetch.timeout_secs == 0 {
        return Err(AuditError::config("fetch.timeout_secs must be greater than 0"));
    }

    if config.checker.command.trim().is_empty() {
        return Err(AuditError::config("checker.command must not be empty"));
    }

    if config.checker.timeout_secs == 0 {
        return Err(AuditError::config("checker.timeout_secs must be greater than 0"));
    }

    if config.storage.file_name.trim().is_empty() {
        return Err(AuditError::config("storage.file_name must not be empty"));
    }

    let level = config.logging.level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        return Err(AuditError::config(format!(
            "logging.level must be one of {}, got '{}'",
            LOG_LEVELS.join(", "),
            config.logging.level
        )));
    }

    if config.logging.file.as_deref().is_some_and(|file| file.trim().is_empty()) {
        return Err(AuditError::config("logging.file must not be empty when set"));
    }

    Ok(())
}
