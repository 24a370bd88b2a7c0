//! Audit history for the accessibility auditor
//!
//! This crate owns everything that happens to a checker result after it is
//! produced:
//! - Normalization of raw checker output into audit records
//! - Durable record storage with store-assigned, increasing ids
//! - Chronological, impact-breakdown and export projections

pub mod error;
pub mod normalize;
pub mod projector;
pub mod record;
pub mod storage;

pub use error::{HistoryError, HistoryResult};
pub use normalize::{normalize, parse_results};
pub use projector::{ExportFormat, export, impact_breakdown, import_json, sort_by_recency};
pub use record::{
    AuditRecord, AuditRecordPayload, AuditSource, CheckerResults, Impact, PASTED_HTML_SOURCE,
    Violation, ViolationNode, capture_timestamp,
};
pub use storage::{
    FileRecordStore, MemoryRecordStore, RecordStore, StoreHandle, StoreOpener,
    UnavailableRecordStore, import_records,
};
