//! `run`: audit one URL or HTML document

use super::build_orchestrator;
use crate::console::CliConsole;
use crate::presenter::{HistoryView, TerminalPresenter};
use a11y_core::{AuditConfig, AuditError, AuditOutcome, AuditRequest};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

pub struct RunArgs {
    pub url: String,
    pub html: String,
    pub html_file: Option<PathBuf>,
}

/// Resolve the CLI inputs into a request; HTML from a file replaces `--html`
pub async fn build_request(args: RunArgs) -> Result<AuditRequest, AuditError> {
    let html = match args.html_file {
        Some(path) => tokio::fs::read_to_string(&path).await.map_err(|e| {
            AuditError::validation(format!("Could not read {}: {}", path.display(), e))
        })?,
        None => args.html,
    };
    Ok(AuditRequest {
        url: args.url,
        html,
    })
}

pub async fn execute(
    config: &AuditConfig,
    console: CliConsole,
    args: RunArgs,
) -> anyhow::Result<ExitCode> {
    let request = match build_request(args).await {
        Ok(request) => request,
        Err(error) => {
            console.audit_error(&error);
            return Ok(ExitCode::FAILURE);
        }
    };

    let presenter = Arc::new(TerminalPresenter::new(console, HistoryView::Summary));
    let orchestrator = build_orchestrator(config, console, presenter).await?;

    Ok(match orchestrator.run(request).await {
        AuditOutcome::Recorded { record } => {
            console.success(&format!("Saved as audit #{}", record.id));
            ExitCode::SUCCESS
        }
        AuditOutcome::NotRecorded { .. } | AuditOutcome::Failed { .. } => ExitCode::FAILURE,
    })
}
