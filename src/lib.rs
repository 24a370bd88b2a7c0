//! Accessibility auditor
//!
//! Facade over the workspace crates:
//! - [`a11y_history`]: audit records, normalization, storage and exports
//! - [`a11y_core`]: configuration, fetch and checker boundaries, and the
//!   audit orchestrator

pub use a11y_core;
pub use a11y_history;

pub use a11y_core::{
    AccessibilityChecker, AuditConfig, AuditError, AuditErrorKind, AuditOrchestrator, AuditOutcome,
    AuditPhase, AuditPresenter, AuditRequest, AuditResult, CommandChecker, PageFetcher,
    ProxyFetcher, connect_store, load_config,
};
pub use a11y_history::{
    AuditRecord, AuditSource, CheckerResults, ExportFormat, Impact, RecordStore, StoreOpener,
    Violation, impact_breakdown, sort_by_recency,
};
