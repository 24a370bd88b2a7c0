//! Structured (JSON) export and import

use super::chronology::sort_by_recency;
use super::csv::render_csv;
use crate::error::{HistoryError, HistoryResult};
use crate::record::AuditRecord;
use std::fmt;
use std::str::FromStr;

/// History export format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    /// Default download/file name
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Json => "a11y-audit-history.json",
            Self::Csv => "a11y-audit-history.csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = HistoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(HistoryError::Export(format!("unknown export format '{}'", other))),
        }
    }
}

/// Export a history snapshot, most recent audit first.
///
/// An empty history is refused rather than producing an empty file.
pub fn export(records: Vec<AuditRecord>, format: ExportFormat) -> HistoryResult<String> {
    if records.is_empty() {
        return Err(HistoryError::Export("No audit history to export".to_string()));
    }

    let ordered = sort_by_recency(records);
    match format {
        ExportFormat::Json => render_json(&ordered),
        ExportFormat::Csv => Ok(render_csv(&ordered)),
    }
}

/// Pretty-printed JSON array of the records, in the order given
pub fn render_json(records: &[AuditRecord]) -> HistoryResult<String> {
    serde_json::to_string_pretty(records).map_err(|e| HistoryError::Export(e.to_string()))
}

/// Parse a JSON export back into records.
///
/// Every record must pass its integrity check.
pub fn import_json(content: &str) -> HistoryResult<Vec<AuditRecord>> {
    let records: Vec<AuditRecord> = serde_json::from_str(content)
        .map_err(|e| HistoryError::MalformedResults(format!("invalid history export: {}", e)))?;

    for record in &records {
        record.verify_integrity()?;
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{AuditSource, CheckerResults, Impact, Violation, ViolationNode};
    use serde_json::{Value, json};

    fn sample_history() -> Vec<AuditRecord> {
        let mut violation = Violation::new("Buttons must have discernible text", "Ensures buttons have text", Impact::Critical)
            .with_help_url("https://dequeuniversity.com/rules/axe/4.9/button-name")
            .with_tags(["wcag2a", "wcag412"])
            .with_node(ViolationNode::new("<button></button>").with_failure_summary("Fix all of the following"));
        violation.extra.insert("id".to_string(), json!("button-name"));

        let mut results = CheckerResults::new(vec![violation]);
        results.extra.insert("url".to_string(), json!("about:srcdoc"));

        vec![
            AuditRecord {
                id: 1,
                source: AuditSource::url("https://example.com"),
                timestamp: "4/1/2026, 9:00:00 AM".to_string(),
                violation_count: 1,
                results,
            },
            AuditRecord {
                id: 2,
                source: AuditSource::PastedHtml,
                timestamp: "4/2/2026, 9:00:00 AM".to_string(),
                violation_count: 0,
                results: CheckerResults::default(),
            },
        ]
    }

    #[test]
    fn test_json_export_is_most_recent_first() {
        let json = export(sample_history(), ExportFormat::Json).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        let entries = value.as_array().unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["id"], json!(2));
        assert_eq!(entries[0]["source"], json!("Pasted HTML"));
        assert_eq!(entries[0]["violationCount"], json!(0));
        assert_eq!(entries[0]["results"]["violations"], json!([]));
        assert_eq!(entries[1]["results"]["violations"][0]["helpUrl"], json!("https://dequeuniversity.com/rules/axe/4.9/button-name"));
        assert!(json.contains("\n  "), "export should be pretty-printed");
    }

    #[test]
    fn test_json_round_trip_is_lossless() {
        let history = sample_history();
        let json = export(history.clone(), ExportFormat::Json).unwrap();
        let mut imported = import_json(&json).unwrap();
        imported.sort_by_key(|r| r.id);
        assert_eq!(imported, history);
    }

    #[test]
    fn test_import_rejects_inconsistent_counts() {
        let mut history = sample_history();
        history[0].violation_count = 5;
        let json = render_json(&history).unwrap();

        assert!(matches!(
            import_json(&json),
            Err(HistoryError::MalformedResults(_))
        ));
    }

    #[test]
    fn test_import_rejects_garbage() {
        assert!(matches!(
            import_json("{\"not\": \"an array\"}"),
            Err(HistoryError::MalformedResults(_))
        ));
    }

    #[test]
    fn test_empty_history_is_not_exported() {
        for format in [ExportFormat::Json, ExportFormat::Csv] {
            assert!(matches!(export(Vec::new(), format), Err(HistoryError::Export(_))));
        }
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert!("xml".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Csv.file_name(), "a11y-audit-history.csv");
    }
}
