//! Error types for the audit workflow
//!
//! One taxonomy covers the whole workflow: input validation, page fetch,
//! checker execution, history persistence and result shape, plus the
//! configuration and export surface. Each error has a stable code and a
//! user-facing rendering.

mod constructors;
mod conversions;
mod types;
mod user_messages;

pub use types::{AuditError, AuditErrorKind, AuditResult};
pub use user_messages::{ErrorCategory, UserFriendlyError};
