//! Audit phases

use std::fmt;

/// Where an audit invocation currently is
///
/// `Idle -> Validating -> [Fetching] -> Checking -> Normalizing -> Persisting -> Refreshing -> Idle`,
/// with `Error` reachable from every non-idle phase and always followed by `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AuditPhase {
    #[default]
    Idle,
    Validating,
    Fetching,
    Checking,
    Normalizing,
    Persisting,
    Refreshing,
    Error,
}

impl AuditPhase {
    /// Whether an audit is in flight
    pub fn is_busy(&self) -> bool {
        !matches!(self, Self::Idle | Self::Error)
    }

    /// Status line shown while in this phase
    pub fn status_message(&self) -> &'static str {
        match self {
            Self::Idle => "Ready",
            Self::Validating => "Checking input...",
            Self::Fetching => "Fetching page...",
            Self::Checking => "Running accessibility checks...",
            Self::Normalizing => "Processing results...",
            Self::Persisting => "Saving audit...",
            Self::Refreshing => "Updating history...",
            Self::Error => "Audit failed",
        }
    }
}

impl fmt::Display for AuditPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Fetching => "fetching",
            Self::Checking => "checking",
            Self::Normalizing => "normalizing",
            Self::Persisting => "persisting",
            Self::Refreshing => "refreshing",
            Self::Error => "error",
        };
        write!(f, "{}", name)
    }
}
