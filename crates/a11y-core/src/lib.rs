//! Accessibility Audit Core Library
//!
//! This crate provides the audit workflow for the accessibility auditor,
//! including configuration, page fetching, the isolated checker boundary
//! and the orchestrator that ties them to the audit history.

pub mod checker;
pub mod config;
pub mod error;
pub mod fetch;
pub mod orchestrator;

// Re-export commonly used types
pub use checker::{AccessibilityChecker, CommandChecker, ContextGuard, IsolatedContext, check_isolated};
pub use config::{
    AuditConfig, CheckerConfig, FetchConfig, LoadedConfig, LogFormat, LoggingConfig, StorageConfig,
    load_config,
};
pub use error::{AuditError, AuditErrorKind, AuditResult, ErrorCategory, UserFriendlyError};
pub use fetch::{PageFetcher, ProxyFetcher};
pub use orchestrator::{
    AuditOrchestrator, AuditOutcome, AuditPhase, AuditPresenter, AuditRequest, AuditTarget,
    NullPresenter, connect_store,
};
