//! Presentation boundary

use super::phase::AuditPhase;
use crate::error::AuditError;
use a11y_history::{AuditRecord, AuditSource, CheckerResults};

/// Receives everything the user should see
///
/// Calls arrive in workflow order from the orchestrator. Implementations
/// render; they never call back into the orchestrator.
pub trait AuditPresenter: Send + Sync {
    fn phase_changed(&self, _phase: AuditPhase) {}

    /// Results of the audit that just finished checking
    fn show_results(&self, source: &AuditSource, results: &CheckerResults);

    /// Remove any results currently shown
    fn clear_results(&self);

    /// Full history, most recent first
    fn show_history(&self, records: &[AuditRecord]);

    fn show_error(&self, error: &AuditError);
}

/// Presenter that shows nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl AuditPresenter for NullPresenter {
    fn show_results(&self, _source: &AuditSource, _results: &CheckerResults) {}

    fn clear_results(&self) {}

    fn show_history(&self, _records: &[AuditRecord]) {}

    fn show_error(&self, _error: &AuditError) {}
}
