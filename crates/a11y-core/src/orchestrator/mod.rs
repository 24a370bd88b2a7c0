//! Audit workflow
//!
//! [`AuditOrchestrator`] drives one audit from input validation through
//! fetch, check, normalization and persistence, and owns the history
//! operations that sit next to it (refresh, clear, export, import). All
//! collaborators are explicit handles; there is no global state.

mod phase;
mod presenter;
mod request;

#[cfg(test)]
mod tests;

pub use phase::AuditPhase;
pub use presenter::{AuditPresenter, NullPresenter};
pub use request::{AuditRequest, AuditTarget};

use crate::checker::{AccessibilityChecker, check_isolated};
use crate::error::{AuditError, AuditResult};
use crate::fetch::PageFetcher;
use a11y_history::storage::{StoreHandle, StoreOpener, UnavailableRecordStore, import_records};
use a11y_history::{
    AuditRecord, AuditSource, CheckerResults, ExportFormat, capture_timestamp, export, import_json,
    normalize, sort_by_recency,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

/// How an audit invocation ended
#[derive(Debug, Clone)]
pub enum AuditOutcome {
    /// Results shown and stored
    Recorded { record: AuditRecord },
    /// Results shown but the store rejected them
    NotRecorded {
        source: AuditSource,
        results: CheckerResults,
        error: AuditError,
    },
    /// Nothing shown; `error` was surfaced
    Failed { error: AuditError },
}

impl AuditOutcome {
    pub fn error(&self) -> Option<&AuditError> {
        match self {
            Self::Recorded { .. } => None,
            Self::NotRecorded { error, .. } | Self::Failed { error } => Some(error),
        }
    }

    /// Results that were displayed, if any
    pub fn results(&self) -> Option<&CheckerResults> {
        match self {
            Self::Recorded { record } => Some(&record.results),
            Self::NotRecorded { results, .. } => Some(results),
            Self::Failed { .. } => None,
        }
    }
}

/// Open the store once, falling back to a store that reports itself
/// unavailable so startup never fails on storage
pub async fn connect_store(opener: &StoreOpener) -> (StoreHandle, Option<AuditError>) {
    match opener.open().await {
        Ok(store) => (store as StoreHandle, None),
        Err(e) => {
            let error = AuditError::from(e);
            error!("Audit history unavailable: {}", error);
            let fallback: StoreHandle = Arc::new(UnavailableRecordStore::new(error.message()));
            (fallback, Some(error))
        }
    }
}

/// Runs audits and history operations against explicit collaborators
pub struct AuditOrchestrator {
    store: StoreHandle,
    fetcher: Arc<dyn PageFetcher>,
    checker: Arc<dyn AccessibilityChecker>,
    presenter: Arc<dyn AuditPresenter>,
    /// Phase of every in-flight audit, oldest first
    phases: Mutex<Vec<(Uuid, AuditPhase)>>,
}

impl AuditOrchestrator {
    pub fn new(
        store: StoreHandle,
        fetcher: Arc<dyn PageFetcher>,
        checker: Arc<dyn AccessibilityChecker>,
        presenter: Arc<dyn AuditPresenter>,
    ) -> Self {
        Self {
            store,
            fetcher,
            checker,
            presenter,
            phases: Mutex::new(Vec::new()),
        }
    }

    /// Phase of the most recently started audit still in flight, or
    /// `Idle` when none is
    pub fn current_phase(&self) -> AuditPhase {
        self.phases
            .lock()
            .last()
            .map_or(AuditPhase::Idle, |(_, phase)| *phase)
    }

    fn transition(&self, run_id: Uuid, phase: AuditPhase) {
        {
            let mut phases = self.phases.lock();
            let position = phases.iter().position(|(id, _)| *id == run_id);
            match (position, phase) {
                (Some(index), AuditPhase::Idle) => {
                    phases.remove(index);
                }
                (Some(index), _) => phases[index].1 = phase,
                (None, AuditPhase::Idle) => {}
                (None, _) => phases.push((run_id, phase)),
            }
        }
        info!(%phase, "Audit phase");
        self.presenter.phase_changed(phase);
    }

    /// Surface a failure that happened before anything was displayed
    fn fail(&self, run_id: Uuid, error: AuditError) -> AuditOutcome {
        warn!(code = error.error_code(), "Audit failed: {}", error);
        self.transition(run_id, AuditPhase::Error);
        self.presenter.clear_results();
        self.presenter.show_error(&error);
        self.transition(run_id, AuditPhase::Idle);
        AuditOutcome::Failed { error }
    }

    /// Run one audit to completion. Every failure is surfaced through the
    /// presenter and also returned in the outcome.
    pub async fn run(&self, request: AuditRequest) -> AuditOutcome {
        let run_id = Uuid::new_v4();
        self.run_audit(run_id, request)
            .instrument(info_span!("audit", run_id = %run_id))
            .await
    }

    async fn run_audit(&self, run_id: Uuid, request: AuditRequest) -> AuditOutcome {
        self.transition(run_id, AuditPhase::Validating);
        let target = match request.validate() {
            Ok(target) => target,
            Err(e) => return self.fail(run_id, e),
        };
        self.presenter.clear_results();

        let (source, html) = match target {
            AuditTarget::Url(url) => {
                self.transition(run_id, AuditPhase::Fetching);
                match self.fetcher.fetch(&url).await {
                    Ok(html) => (AuditSource::url(url), html),
                    Err(e) => return self.fail(run_id, e),
                }
            }
            AuditTarget::Html(html) => (AuditSource::PastedHtml, html),
        };

        self.transition(run_id, AuditPhase::Checking);
        let raw = match check_isolated(self.checker.as_ref(), &html).await {
            Ok(raw) => raw,
            Err(e) => return self.fail(run_id, e),
        };

        self.transition(run_id, AuditPhase::Normalizing);
        let payload = match normalize(source, capture_timestamp(), &raw) {
            Ok(payload) => payload,
            Err(e) => return self.fail(run_id, e.into()),
        };
        info!(
            source = %payload.source,
            violations = payload.violation_count,
            "Audit complete"
        );
        self.presenter.show_results(&payload.source, &payload.results);

        self.transition(run_id, AuditPhase::Persisting);
        let record = match self.store.add(payload.clone()).await {
            Ok(record) => record,
            Err(e) => {
                warn!(code = e.code(), "Audit not saved: {}", e);
                let error = AuditError::from(e);
                self.transition(run_id, AuditPhase::Error);
                self.presenter.show_error(&error);
                self.transition(run_id, AuditPhase::Idle);
                return AuditOutcome::NotRecorded {
                    source: payload.source,
                    results: payload.results,
                    error,
                };
            }
        };
        debug!("Stored audit {}", record.id);

        self.transition(run_id, AuditPhase::Refreshing);
        // A failed refresh is surfaced by refresh_history; the record is stored regardless.
        let _ = self.refresh_history().await;
        self.transition(run_id, AuditPhase::Idle);

        AuditOutcome::Recorded { record }
    }

    /// All records, most recent first
    pub async fn load_history(&self) -> AuditResult<Vec<AuditRecord>> {
        let records = self.store.list_all().await?;
        Ok(sort_by_recency(records))
    }

    /// Reload history and hand it to the presenter
    pub async fn refresh_history(&self) -> AuditResult<Vec<AuditRecord>> {
        match self.load_history().await {
            Ok(records) => {
                self.presenter.show_history(&records);
                Ok(records)
            }
            Err(error) => {
                warn!("History refresh failed: {}", error);
                self.presenter.show_error(&error);
                Err(error)
            }
        }
    }

    /// Delete every stored audit
    pub async fn clear_history(&self) -> AuditResult<()> {
        if let Err(e) = self.store.clear_all().await {
            let error = AuditError::from(e);
            self.presenter.show_error(&error);
            return Err(error);
        }
        info!("Cleared audit history");
        self.refresh_history().await.map(|_| ())
    }

    /// Render the whole history in `format`
    pub async fn export_history(&self, format: ExportFormat) -> AuditResult<String> {
        let records = self.store.list_all().await?;
        let rendered = export(records, format)?;
        debug!("Exported history as {}", format);
        Ok(rendered)
    }

    /// Add every record of a JSON export to the store; returns how many
    pub async fn import_history(&self, content: &str) -> AuditResult<usize> {
        let records = import_json(content)?;
        let stored = import_records(self.store.as_ref(), records).await?;
        info!("Imported {} audits", stored.len());
        self.refresh_history().await?;
        Ok(stored.len())
    }
}
