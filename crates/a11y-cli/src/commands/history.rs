//! History management commands: list, export, import, clear

use super::build_orchestrator;
use crate::console::CliConsole;
use crate::presenter::{HistoryView, TerminalPresenter};
use a11y_core::{AuditConfig, AuditError, NullPresenter};
use a11y_history::ExportFormat;
use colored::Colorize;
use dialoguer::{Confirm, theme::ColorfulTheme};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

/// Print the stored audits, most recent first
pub async fn list(
    config: &AuditConfig,
    console: CliConsole,
    limit: Option<usize>,
) -> anyhow::Result<ExitCode> {
    let presenter = Arc::new(TerminalPresenter::new(console, HistoryView::Full { limit }));
    let orchestrator = build_orchestrator(config, console, presenter).await?;

    Ok(match orchestrator.refresh_history().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    })
}

/// Where an export is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    Stdout,
    File(PathBuf),
}

impl ExportTarget {
    pub fn resolve(output: Option<PathBuf>, format: ExportFormat) -> Self {
        match output {
            Some(path) if path.as_os_str() == "-" => Self::Stdout,
            Some(path) => Self::File(path),
            None => Self::File(PathBuf::from(format.file_name())),
        }
    }
}

async fn write_export(target: &ExportTarget, content: &str) -> Result<(), AuditError> {
    match target {
        ExportTarget::Stdout => {
            print!("{}", content);
            Ok(())
        }
        ExportTarget::File(path) => tokio::fs::write(path, content).await.map_err(|e| {
            AuditError::export_to(
                format!("Could not write {}: {}", path.display(), e),
                path.display().to_string(),
            )
        }),
    }
}

/// Export the whole history in `format`
pub async fn export(
    config: &AuditConfig,
    console: CliConsole,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> anyhow::Result<ExitCode> {
    let orchestrator = build_orchestrator(config, console, Arc::new(NullPresenter)).await?;
    let target = ExportTarget::resolve(output, format);

    let result = match orchestrator.export_history(format).await {
        Ok(content) => write_export(&target, &content).await,
        Err(error) => Err(error),
    };

    Ok(match result {
        Ok(()) => {
            if let ExportTarget::File(path) = &target {
                console.success(&format!(
                    "Exported history as {} to {}",
                    format,
                    path.display()
                ));
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            console.audit_error(&error);
            ExitCode::FAILURE
        }
    })
}

/// Add the audits of a JSON export to the history
pub async fn import(
    config: &AuditConfig,
    console: CliConsole,
    path: &Path,
) -> anyhow::Result<ExitCode> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) => {
            console.audit_error(&AuditError::read(format!(
                "Could not read {}: {}",
                path.display(),
                e
            )));
            return Ok(ExitCode::FAILURE);
        }
    };

    let presenter = Arc::new(TerminalPresenter::new(console, HistoryView::Summary));
    let orchestrator = build_orchestrator(config, console, presenter).await?;

    Ok(match orchestrator.import_history(&content).await {
        Ok(count) => {
            console.success(&format!("Imported {} audit(s)", count));
            ExitCode::SUCCESS
        }
        Err(error) => {
            console.audit_error(&error);
            ExitCode::FAILURE
        }
    })
}

/// Delete every stored audit after confirmation
pub async fn clear(config: &AuditConfig, console: CliConsole, yes: bool) -> anyhow::Result<ExitCode> {
    if !yes {
        if !::console::Term::stderr().is_term() {
            console.error("Refusing to clear history without a terminal; pass --yes");
            return Ok(ExitCode::FAILURE);
        }

        let confirm = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Delete every stored audit? This cannot be undone.")
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirm {
            println!("{}", "Clear cancelled.".dimmed());
            return Ok(ExitCode::SUCCESS);
        }
    }

    let presenter = Arc::new(TerminalPresenter::new(console, HistoryView::Summary));
    let orchestrator = build_orchestrator(config, console, presenter).await?;

    Ok(match orchestrator.clear_history().await {
        Ok(()) => {
            console.success("Audit history cleared.");
            ExitCode::SUCCESS
        }
        Err(_) => ExitCode::FAILURE,
    })
}
