//! Read-only views derived from a history snapshot
//!
//! - chronological ordering
//! - per-record impact breakdown
//! - JSON export/import and flat CSV export

mod breakdown;
mod chronology;
mod csv;
mod export;

pub use breakdown::impact_breakdown;
pub use chronology::sort_by_recency;
pub use csv::{CSV_HEADER, NOT_APPLICABLE, render_csv};
pub use export::{ExportFormat, export, import_json, render_json};
