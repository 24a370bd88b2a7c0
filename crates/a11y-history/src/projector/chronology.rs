//! Chronological history view

use crate::record::{AuditRecord, parse_timestamp};
use std::cmp::Reverse;

/// Order records most recent first.
///
/// Records are compared by parsed timestamp; equal timestamps fall back to
/// descending id so the most recently inserted record wins. Timestamps that
/// cannot be parsed sort after every parseable one.
pub fn sort_by_recency(mut records: Vec<AuditRecord>) -> Vec<AuditRecord> {
    records.sort_by_cached_key(|record| {
        let captured = parse_timestamp(&record.timestamp);
        (captured.is_none(), Reverse(captured), Reverse(record.id))
    });
    records
}
