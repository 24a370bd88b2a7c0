//! Audit record data structures
//!
//! Defines the persisted shape of an audit:
//! - AuditRecord: a stored audit with its store-assigned id
//! - AuditRecordPayload: everything except the id, ready for insertion
//! - CheckerResults / Violation / ViolationNode: the checker payload
//! - Impact: violation severity

use crate::error::{HistoryError, HistoryResult};
use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Sentinel source recorded when pasted markup was audited directly
pub const PASTED_HTML_SOURCE: &str = "Pasted HTML";

/// Format used for capture timestamps (en-US locale style)
pub const TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Fallback formats accepted when reading timestamps back
const TIMESTAMP_PARSE_FORMATS: &[&str] = &[
    "%m/%d/%Y, %I:%M:%S %p",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Format the current local time as a capture timestamp
pub fn capture_timestamp() -> String {
    format_timestamp(Local::now())
}

/// Format a local time as a capture timestamp
pub fn format_timestamp(at: DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a capture timestamp into a comparable instant
///
/// Returns `None` for strings in none of the known formats.
pub fn parse_timestamp(timestamp: &str) -> Option<NaiveDateTime> {
    let trimmed = timestamp.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }

    TIMESTAMP_PARSE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
}

/// Where the audited document came from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AuditSource {
    /// A remote page fetched by URL
    Url(String),
    /// Markup pasted by the user
    PastedHtml,
}

impl AuditSource {
    /// Source for a fetched URL
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    /// String form as stored and exported
    pub fn as_str(&self) -> &str {
        match self {
            Self::Url(url) => url,
            Self::PastedHtml => PASTED_HTML_SOURCE,
        }
    }
}

impl From<String> for AuditSource {
    fn from(value: String) -> Self {
        if value == PASTED_HTML_SOURCE {
            Self::PastedHtml
        } else {
            Self::Url(value)
        }
    }
}

impl From<AuditSource> for String {
    fn from(source: AuditSource) -> Self {
        match source {
            AuditSource::Url(url) => url,
            AuditSource::PastedHtml => PASTED_HTML_SOURCE.to_string(),
        }
    }
}

impl fmt::Display for AuditSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Violation severity
///
/// Values outside the four known levels are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Impact {
    Critical,
    Serious,
    Moderate,
    Minor,
    Other(String),
}

impl Impact {
    /// Severity rank, lower is more severe. Unknown impacts have no rank.
    pub fn rank(&self) -> Option<u8> {
        match self {
            Self::Critical => Some(1),
            Self::Serious => Some(2),
            Self::Moderate => Some(3),
            Self::Minor => Some(4),
            Self::Other(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Critical => "critical",
            Self::Serious => "serious",
            Self::Moderate => "moderate",
            Self::Minor => "minor",
            Self::Other(value) => value,
        }
    }

    /// Capitalized label for display ("Critical", "Serious", ...)
    pub fn label(&self) -> String {
        let s = self.as_str();
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl From<String> for Impact {
    fn from(value: String) -> Self {
        match value.as_str() {
            "critical" => Self::Critical,
            "serious" => Self::Serious,
            "moderate" => Self::Moderate,
            "minor" => Self::Minor,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for Impact {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Impact> for String {
    fn from(impact: Impact) -> Self {
        match impact {
            Impact::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One offending element of a violation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationNode {
    /// Markup of the offending element
    pub html: String,

    /// Checker's remediation summary for this element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_summary: Option<String>,

    /// Checker fields not modeled here (targets, checks, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ViolationNode {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            failure_summary: None,
            extra: Map::new(),
        }
    }

    pub fn with_failure_summary(mut self, summary: impl Into<String>) -> Self {
        self.failure_summary = Some(summary.into());
        self
    }
}

/// One accessibility rule failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub help: String,

    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_url: Option<String>,

    /// Severity; the checker may leave it null
    #[serde(default)]
    pub impact: Option<Impact>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub nodes: Vec<ViolationNode>,

    /// Checker fields not modeled here (rule id, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Violation {
    pub fn new(help: impl Into<String>, description: impl Into<String>, impact: Impact) -> Self {
        Self {
            help: help.into(),
            description: description.into(),
            help_url: None,
            impact: Some(impact),
            tags: Vec::new(),
            nodes: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_help_url(mut self, url: impl Into<String>) -> Self {
        self.help_url = Some(url.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_node(mut self, node: ViolationNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// WCAG tags, upper-cased (`wcag2a` becomes `WCAG2A`)
    pub fn wcag_tags(&self) -> Vec<String> {
        self.tags
            .iter()
            .filter(|tag| tag.starts_with("wcag"))
            .map(|tag| tag.to_uppercase())
            .collect()
    }

    /// Remediation tip taken from the first offending node
    pub fn remediation(&self) -> Option<&str> {
        self.nodes
            .first()
            .and_then(|node| node.failure_summary.as_deref())
    }
}

/// Checker output payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckerResults {
    pub violations: Vec<Violation>,

    /// Remaining checker output (passes, incomplete, test environment, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CheckerResults {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self {
            violations,
            extra: Map::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// An audit ready for insertion; the store assigns the id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecordPayload {
    pub source: AuditSource,
    pub timestamp: String,
    /// Denormalized `results.violations.len()` for list views
    pub violation_count: usize,
    pub results: CheckerResults,
}

impl AuditRecordPayload {
    /// Attach a store-assigned id
    pub fn into_record(self, id: u64) -> AuditRecord {
        AuditRecord {
            id,
            source: self.source,
            timestamp: self.timestamp,
            violation_count: self.violation_count,
            results: self.results,
        }
    }
}

/// A persisted audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    /// Store-assigned identifier, strictly increasing in insertion order
    pub id: u64,
    pub source: AuditSource,
    pub timestamp: String,
    pub violation_count: usize,
    pub results: CheckerResults,
}

impl AuditRecord {
    pub fn violations(&self) -> &[Violation] {
        &self.results.violations
    }

    /// Drop the id, e.g. to re-insert into another store
    pub fn into_payload(self) -> AuditRecordPayload {
        AuditRecordPayload {
            source: self.source,
            timestamp: self.timestamp,
            violation_count: self.violation_count,
            results: self.results,
        }
    }

    /// Check that the denormalized count still matches the payload
    pub fn verify_integrity(&self) -> HistoryResult<()> {
        let actual = self.results.violations.len();
        if self.violation_count != actual {
            return Err(HistoryError::MalformedResults(format!(
                "record {} claims {} violations but carries {}",
                self.id, self.violation_count, actual
            )));
        }
        Ok(())
    }
}
