//! Accessibility checker boundary
//!
//! The rule engine is a black box: it is loaded into a context isolated
//! from the host, given the document, and returns its results as JSON.
//! A context lives for exactly one check and is released on every exit
//! path through [`ContextGuard`].

mod command;

pub use command::CommandChecker;

use crate::error::AuditResult;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// Creates isolated contexts loaded with a document
#[async_trait]
pub trait AccessibilityChecker: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Prepare a fresh context for `html`. Resources created before a
    /// failure must be released by the implementation.
    async fn isolate(&self, html: &str) -> AuditResult<Box<dyn IsolatedContext>>;
}

/// One isolated checker execution
#[async_trait]
pub trait IsolatedContext: Send {
    /// Run the engine against the loaded document
    async fn run(&mut self) -> AuditResult<Value>;

    /// Tear the context down. Called exactly once by [`ContextGuard`];
    /// must not fail.
    fn release(&mut self);
}

/// Owns a context and releases it when dropped
pub struct ContextGuard {
    context: Option<Box<dyn IsolatedContext>>,
}

impl ContextGuard {
    pub fn new(context: Box<dyn IsolatedContext>) -> Self {
        Self {
            context: Some(context),
        }
    }

    pub async fn run(&mut self) -> AuditResult<Value> {
        match self.context.as_mut() {
            Some(context) => context.run().await,
            None => Err(crate::error::AuditError::checker("checker context already released")),
        }
    }

    /// Release now instead of at drop
    pub fn release(&mut self) {
        if let Some(mut context) = self.context.take() {
            context.release();
            debug!("Released checker context");
        }
    }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        self.release();
    }
}

/// Run one check in a freshly isolated context.
///
/// The context is released before this returns, whether the run
/// succeeded, failed, or the future was dropped mid-run.
pub async fn check_isolated(checker: &dyn AccessibilityChecker, html: &str) -> AuditResult<Value> {
    debug!("Isolating {} checker for {} bytes of HTML", checker.name(), html.len());
    let mut guard = ContextGuard::new(checker.isolate(html).await?);
    let result = guard.run().await;
    guard.release();
    result
}
