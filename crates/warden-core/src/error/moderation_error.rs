//! Moderation domain errors
//!
//! The taxonomy distinguishes operator mistakes (surfaced verbatim, never
//! retried), transient external failures (retried by the scheduler,
//! surfaced when raised during an interactive apply), infrastructure
//! failures, and invariant violations (treated as bugs).

use thiserror::Error;

use super::PlatformError;
use crate::types::ActionKind;

/// Errors produced by the moderation core
#[derive(Debug, Error)]
pub enum ModerationError {
    // =========================================================================
    // User Errors (operator mistakes, surfaced verbatim)
    // =========================================================================
    #[error("The {kind} is already {desc}")]
    AlreadyActive { kind: ActionKind, desc: &'static str },

    #[error("The action is not applicable to the target")]
    NotApplicable,

    #[error("Absent target")]
    AbsentTarget,

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid zero duration")]
    ZeroDuration,

    #[error("Actions without a duration can't be suspended")]
    NotSuspendable,

    #[error("The {kind} is not {desc} through the bot")]
    NotManaged { kind: ActionKind, desc: &'static str },

    #[error("The {kind} is not currently {desc}")]
    NotActive { kind: ActionKind, desc: &'static str },

    #[error("Unknown {kind} action type: {id}")]
    UnknownType { kind: ActionKind, id: String },

    // =========================================================================
    // External / Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Database error: {0}")]
    Database(String),

    // =========================================================================
    // Invariant Violations (bugs, logged loudly, never retried)
    // =========================================================================
    #[error("Inconsistent state: {0}")]
    Inconsistent(String),
}

impl ModerationError {
    /// Whether this error is an operator mistake that should surface
    /// verbatim and never be retried
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::AlreadyActive { .. }
                | Self::NotApplicable
                | Self::AbsentTarget
                | Self::InvalidDuration(_)
                | Self::ZeroDuration
                | Self::NotSuspendable
                | Self::NotManaged { .. }
                | Self::NotActive { .. }
                | Self::UnknownType { .. }
        )
    }

    /// Whether this error is transient and worth retrying (scheduled
    /// expirations retry these indefinitely at a fixed interval)
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Platform(_) | Self::Database(_))
    }

    /// Whether this error indicates corrupted persisted state
    #[must_use]
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::Inconsistent(_))
    }
}
