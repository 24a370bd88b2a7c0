//! CLI commands

pub mod history;
pub mod run;

use crate::console::CliConsole;
use a11y_core::{
    AuditConfig, AuditOrchestrator, AuditPresenter, CommandChecker, ProxyFetcher, connect_store,
};
use a11y_history::StoreOpener;
use std::sync::Arc;

/// Build an orchestrator wired to the configured store, fetcher and
/// checker. A store that cannot be opened is reported and replaced by one
/// that reports itself unavailable.
pub async fn build_orchestrator(
    config: &AuditConfig,
    console: CliConsole,
    presenter: Arc<dyn AuditPresenter>,
) -> anyhow::Result<AuditOrchestrator> {
    let opener = StoreOpener::new(config.storage.table_path()?);
    console.info(&format!("Audit history at {}", opener.path().display()));

    let (store, store_error) = connect_store(&opener).await;
    if let Some(error) = store_error {
        console.audit_error(&error);
    }

    let fetcher = Arc::new(ProxyFetcher::new(&config.fetch)?);
    let checker = Arc::new(CommandChecker::new(config.checker.clone()));
    Ok(AuditOrchestrator::new(store, fetcher, checker, presenter))
}
