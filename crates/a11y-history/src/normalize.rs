//! Checker output normalization
//!
//! Turns the semi-structured JSON a checker emits into an
//! [`AuditRecordPayload`] ready for a record store.

use crate::error::{HistoryError, HistoryResult};
use crate::record::{AuditRecordPayload, AuditSource, CheckerResults};
use serde::Deserialize;
use serde_json::Value;

/// Build a record payload from raw checker output.
///
/// Pure: `raw` is only read. The violation count is taken from
/// `raw.violations` at call time; a missing or non-array `violations`
/// field is a contract violation by the checker.
pub fn normalize(
    source: AuditSource,
    timestamp: impl Into<String>,
    raw: &Value,
) -> HistoryResult<AuditRecordPayload> {
    let results = parse_results(raw)?;

    Ok(AuditRecordPayload {
        source,
        timestamp: timestamp.into(),
        violation_count: results.violations.len(),
        results,
    })
}

/// Parse raw checker output into typed results without building a record
pub fn parse_results(raw: &Value) -> HistoryResult<CheckerResults> {
    let object = raw
        .as_object()
        .ok_or_else(|| HistoryError::MalformedResults("results are not an object".to_string()))?;

    match object.get("violations") {
        Some(Value::Array(_)) => {}
        Some(_) => {
            return Err(HistoryError::MalformedResults(
                "`violations` is not an array".to_string(),
            ));
        }
        None => {
            return Err(HistoryError::MalformedResults(
                "`violations` is missing".to_string(),
            ));
        }
    }

    CheckerResults::deserialize(raw).map_err(|e| HistoryError::MalformedResults(e.to_string()))
}
