//! Environment variable-based configuration overrides

use super::model::AuditConfig;
use crate::error::{AuditError, AuditResult};
use std::env;

/// Prefix shared by every override variable
pub const ENV_PREFIX: &str = "A11Y_AUDIT_";

/// Apply `A11Y_AUDIT_*` overrides from the process environment
pub fn apply_env_overrides(config: &mut AuditConfig) -> AuditResult<()> {
    apply_overrides_from(config, |key| env::var(key).ok())
}

/// Apply overrides using `lookup` to resolve variable names
///
/// Recognized variables:
/// - `A11Y_AUDIT_PROXY_URL`
/// - `A11Y_AUDIT_FETCH_TIMEOUT_SECS`
/// - `A11Y_AUDIT_CHECKER_COMMAND`
/// - `A11Y_AUDIT_CHECKER_TIMEOUT_SECS`
/// - `A11Y_AUDIT_STORAGE_DIR`
/// - `A11Y_AUDIT_LOG_LEVEL`
/// - `A11Y_AUDIT_LOG_FORMAT`
/// - `A11Y_AUDIT_LOG_FILE`
pub fn apply_overrides_from<F>(config: &mut AuditConfig, lookup: F) -> AuditResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

    if let Some(proxy) = var("PROXY_URL") {
        config.fetch.proxy_url = proxy;
    }

    if let Some(secs) = var("FETCH_TIMEOUT_SECS") {
        config.fetch.timeout_secs = parse_secs("FETCH_TIMEOUT_SECS", &secs)?;
    }

    if let Some(command) = var("CHECKER_COMMAND") {
        config.checker.command = command;
    }

    if let Some(secs) = var("CHECKER_TIMEOUT_SECS") {
        config.checker.timeout_secs = parse_secs("CHECKER_TIMEOUT_SECS", &secs)?;
    }

    if let Some(dir) = var("STORAGE_DIR") {
        config.storage.directory = Some(dir);
    }

    if let Some(level) = var("LOG_LEVEL") {
        config.logging.level = level;
    }

    if let Some(format) = var("LOG_FORMAT") {
        config.logging.format = format.parse()?;
    }

    if let Some(file) = var("LOG_FILE") {
        config.logging.file = Some(file);
    }

    Ok(())
}

fn parse_secs(name: &str, value: &str) -> AuditResult<u64> {
    value.trim().parse().map_err(|_| {
        AuditError::config(format!(
            "Invalid {}{} value '{}': expected whole seconds",
            ENV_PREFIX, name, value
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_overrides_apply() {
        let mut config = AuditConfig::default();
        apply_overrides_from(
            &mut config,
            lookup(&[
                ("A11Y_AUDIT_PROXY_URL", "https://proxy.internal/"),
                ("A11Y_AUDIT_CHECKER_TIMEOUT_SECS", "45"),
                ("A11Y_AUDIT_STORAGE_DIR", "/data/a11y"),
                ("A11Y_AUDIT_LOG_LEVEL", "trace"),
            ]),
        )
        .unwrap();

        assert_eq!(config.fetch.proxy_url, "https://proxy.internal/");
        assert_eq!(config.checker.timeout_secs, 45);
        assert_eq!(config.storage.directory.as_deref(), Some("/data/a11y"));
        assert_eq!(config.logging.level, "trace");
    }

    #[test]
    fn test_no_variables_changes_nothing() {
        let mut config = AuditConfig::default();
        apply_overrides_from(&mut config, lookup(&[])).unwrap();
        assert_eq!(config, AuditConfig::default());
    }

    #[test]
    fn test_log_format_override_is_parsed() {
        let mut config = AuditConfig::default();
        apply_overrides_from(
            &mut config,
            lookup(&[("A11Y_AUDIT_LOG_FORMAT", "json"), ("A11Y_AUDIT_LOG_FILE", "/tmp/a11y.log")]),
        )
        .unwrap();
        assert_eq!(config.logging.format, crate::config::LogFormat::Json);
        assert_eq!(config.logging.file.as_deref(), Some("/tmp/a11y.log"));

        let err = apply_overrides_from(&mut config, lookup(&[("A11Y_AUDIT_LOG_FORMAT", "xml")]))
            .unwrap_err();
        assert!(err.to_string().contains("logging.format"));
    }

    #[test]
    fn test_bad_number_is_rejected() {
        let mut config = AuditConfig::default();
        let err = apply_overrides_from(
            &mut config,
            lookup(&[("A11Y_AUDIT_FETCH_TIMEOUT_SECS", "soon")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("A11Y_AUDIT_FETCH_TIMEOUT_SECS"));
    }
}
