//! Checker backed by an external command
//!
//! Each check gets its own scratch directory holding `document.html`.
//! The command runs with that directory as its working directory and
//! prints the results JSON on stdout. Releasing the context removes the
//! directory; a child still running when its future is dropped is killed.

use super::{AccessibilityChecker, IsolatedContext};
use crate::config::CheckerConfig;
use crate::config::model::{DOCUMENT_PATH_PLACEHOLDER, DOCUMENT_URL_PLACEHOLDER};
use crate::error::{AuditError, AuditResult};
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tempfile::TempDir;
use tokio::process::Command;
use tracing::{debug, warn};

/// Name of the document file inside the scratch directory
pub const DOCUMENT_FILE_NAME: &str = "document.html";

/// Environment variable carrying the document path to the command
pub const DOCUMENT_ENV_VAR: &str = "A11Y_AUDIT_DOCUMENT";

/// Runs the configured checker command once per audit
#[derive(Debug, Clone)]
pub struct CommandChecker {
    config: CheckerConfig,
}

impl CommandChecker {
    pub fn new(config: CheckerConfig) -> Self {
        Self { config }
    }

    /// Argument list for a document at `path`
    pub fn build_args(&self, path: &Path) -> Vec<String> {
        let path_str = path.display().to_string();
        let url = format!("file://{}", path_str);
        let mut substituted = false;

        let mut args: Vec<String> = self
            .config
            .args
            .iter()
            .map(|arg| {
                if arg.contains(DOCUMENT_PATH_PLACEHOLDER) || arg.contains(DOCUMENT_URL_PLACEHOLDER)
                {
                    substituted = true;
                }
                arg.replace(DOCUMENT_URL_PLACEHOLDER, &url)
                    .replace(DOCUMENT_PATH_PLACEHOLDER, &path_str)
            })
            .collect();

        if !substituted {
            args.push(path_str);
        }
        args
    }
}

#[async_trait]
impl AccessibilityChecker for CommandChecker {
    fn name(&self) -> &str {
        &self.config.command
    }

    async fn isolate(&self, html: &str) -> AuditResult<Box<dyn IsolatedContext>> {
        let scratch = tempfile::Builder::new()
            .prefix("a11y-audit-")
            .tempdir()
            .map_err(|e| AuditError::checker(format!("Failed to create checker context: {}", e)))?;

        let document = scratch.path().join(DOCUMENT_FILE_NAME);
        // On failure `scratch` drops here and removes the directory.
        tokio::fs::write(&document, html)
            .await
            .map_err(|e| AuditError::checker(format!("Failed to load document: {}", e)))?;

        debug!("Isolated checker context at {:?}", scratch.path());
        Ok(Box::new(CommandContext {
            command: self.config.command.clone(),
            args: self.build_args(&document),
            timeout: self.config.timeout(),
            document,
            scratch: Some(scratch),
        }))
    }
}

struct CommandContext {
    command: String,
    args: Vec<String>,
    timeout: std::time::Duration,
    document: PathBuf,
    scratch: Option<TempDir>,
}

impl CommandContext {
    fn command_line(&self) -> String {
        std::iter::once(self.command.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl IsolatedContext for CommandContext {
    async fn run(&mut self) -> AuditResult<Value> {
        let Some(scratch) = self.scratch.as_ref() else {
            return Err(AuditError::checker("checker context already released"));
        };

        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args)
            .current_dir(scratch.path())
            .env(DOCUMENT_ENV_VAR, &self.document)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|e| {
            AuditError::checker_with_context(
                format!("Failed to start checker '{}': {}", self.command, e),
                self.command_line(),
            )
        })?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(AuditError::checker(format!(
                    "Failed to wait for checker: {}",
                    e
                )));
            }
            Err(_) => {
                warn!("Checker timed out after {:?}", self.timeout);
                return Err(AuditError::checker_with_context(
                    format!("Checker timed out after {} seconds", self.timeout.as_secs()),
                    self.command_line(),
                ));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = match output.status.code() {
                Some(code) => format!("Checker exited with code {}", code),
                None => "Checker was terminated by a signal".to_string(),
            };
            return Err(if stderr.is_empty() {
                AuditError::checker(message)
            } else {
                AuditError::checker_with_context(message, stderr)
            });
        }

        parse_checker_output(&output.stdout)
    }

    fn release(&mut self) {
        if let Some(scratch) = self.scratch.take() {
            let path = scratch.path().to_path_buf();
            if let Err(e) = scratch.close() {
                warn!("Failed to remove checker context {:?}: {}", path, e);
            }
        }
    }
}

/// Decode stdout. Some runners print one result object per page as an
/// array; only the first page is used.
fn parse_checker_output(stdout: &[u8]) -> AuditResult<Value> {
    let value: Value = serde_json::from_slice(stdout)
        .map_err(|e| AuditError::checker(format!("Checker produced invalid JSON: {}", e)))?;

    match value {
        Value::Array(mut pages) => {
            if pages.is_empty() {
                Err(AuditError::checker("Checker produced no results"))
            } else {
                Ok(pages.swap_remove(0))
            }
        }
        other => Ok(other),
    }
}
