//! Audit input

use crate::error::{AuditError, AuditResult};

/// What the user asked to audit
///
/// Exactly one of `url` and `html` must be non-blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditRequest {
    pub url: String,
    pub html: String,
}

/// A validated request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditTarget {
    Url(String),
    Html(String),
}

impl AuditRequest {
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: String::new(),
        }
    }

    pub fn for_html(html: impl Into<String>) -> Self {
        Self {
            url: String::new(),
            html: html.into(),
        }
    }

    /// Resolve the request into a single target. Inputs are trimmed.
    pub fn validate(&self) -> AuditResult<AuditTarget> {
        let url = self.url.trim();
        let html = self.html.trim();

        match (url.is_empty(), html.is_empty()) {
            (false, true) => Ok(AuditTarget::Url(url.to_string())),
            (true, false) => Ok(AuditTarget::Html(html.to_string())),
            (true, true) => Err(AuditError::validation(
                "Please enter a URL or paste HTML to audit.",
            )),
            (false, false) => Err(AuditError::validation(
                "Please provide either a URL or HTML, not both.",
            )),
        }
    }
}
