//! Flat CSV export
//!
//! One row per violation with the record fields repeated; a record without
//! violations still gets a single row with `N/A` in the violation columns.

use crate::record::{AuditRecord, Violation};

/// CSV header row.
pub const CSV_HEADER: &str = "ID,URL,Timestamp,Violations Count,Violation Help,Violation Description,Violation Impact,WCAG Tags,Remediation,HTML Node";

/// Placeholder for columns that do not apply to a row
pub const NOT_APPLICABLE: &str = "N/A";

/// Renders records as CSV, in the order given.
pub fn render_csv(records: &[AuditRecord]) -> String {
    let mut out = String::new();

    out.push_str(CSV_HEADER);
    out.push('\n');

    for record in records {
        if record.results.violations.is_empty() {
            out.push_str(&render_empty_row(record));
        } else {
            for violation in &record.results.violations {
                out.push_str(&render_violation_row(record, violation));
            }
        }
    }

    out
}

fn record_columns(record: &AuditRecord) -> String {
    format!(
        "{},{},{},{}",
        record.id,
        escape_csv_field(record.source.as_str()),
        escape_csv_field(&record.timestamp),
        record.violation_count
    )
}

fn render_empty_row(record: &AuditRecord) -> String {
    let placeholders = [NOT_APPLICABLE; 6].join(",");
    format!("{},{}\n", record_columns(record), placeholders)
}

fn render_violation_row(record: &AuditRecord, violation: &Violation) -> String {
    let impact = violation
        .impact
        .as_ref()
        .map(|i| i.as_str())
        .unwrap_or(NOT_APPLICABLE);

    let nodes = violation
        .nodes
        .iter()
        .map(|n| n.html.as_str())
        .collect::<Vec<_>>()
        .join("; ");
    let nodes: &str = if nodes.is_empty() { NOT_APPLICABLE } else { &nodes };

    format!(
        "{},{},{},{},{},{},{}\n",
        record_columns(record),
        escape_csv_field(&violation.help),
        escape_csv_field(&violation.description),
        escape_csv_field(impact),
        escape_csv_field(&violation.wcag_tags().join("; ")),
        escape_csv_field(violation.remediation().unwrap_or(NOT_APPLICABLE)),
        escape_csv_field(nodes)
    )
}

/// Escapes a field for CSV.
///
/// Fields containing the delimiter or a double quote are wrapped in quotes
/// with embedded quotes doubled. Nothing else is escaped.
fn escape_csv_field(s: &str) -> String {
    if s.contains(',') || s.contains('"') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
