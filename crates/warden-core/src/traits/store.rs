//! Action store port
//!
//! The durable record of every action ever created. Every operation is
//! atomic: partial application of a multi-step mutation must never be
//! observable. Mutations return booleans so concurrent callers can detect
//! and ignore lost races instead of sharing a global lock.

use async_trait::async_trait;

use crate::entities::{Action, ActiveAction, ExpiringAction, NewAction};
use crate::error::ModerationError;
use crate::types::{ActionKind, ActionType};
use crate::value_objects::{ActionId, Snowflake};

/// Result type for store operations
pub type RepoResult<T> = Result<T, ModerationError>;

/// Persistence port for moderation actions
#[async_trait]
pub trait ActionStore: Send + Sync {
    /// Insert a new action record.
    ///
    /// Computes the absolute expiration from `duration_ms`, inserts the
    /// base row, and registers it as Active (plus Expiring when a future
    /// deadline exists) iff the type has a duration, all in one unit.
    async fn create_action(&self, new: NewAction) -> RepoResult<Action>;

    /// Write the one-time suspension sub-record and drop the action from
    /// the Active/Expiring indices.
    ///
    /// Returns `false` without changing anything if the action was already
    /// suspended, so callers can fall back to external-state checks.
    async fn suspend_action(
        &self,
        id: ActionId,
        suspender_id: Snowflake,
        reason: Option<&str>,
    ) -> RepoResult<bool>;

    /// Drop the action from the Active/Expiring indices after its natural
    /// expiration. No suspension sub-record is written.
    ///
    /// Returns `false` if it was already removed (a concurrent suspension
    /// or a duplicate firing lost the race).
    async fn expire_action(&self, id: ActionId) -> RepoResult<bool>;

    /// Fetch one action with its suspension state, if it exists
    async fn action(&self, id: ActionId) -> RepoResult<Option<Action>>;

    /// Full history for a target, newest first
    async fn actions_for_target(
        &self,
        kind: ActionKind,
        target_id: Snowflake,
    ) -> RepoResult<Vec<Action>>;

    /// The current Active entry for a (target, type) pair, if any
    async fn active_action(
        &self,
        target_id: Snowflake,
        ty: ActionType,
    ) -> RepoResult<Option<ActiveAction>>;

    /// Every Active entry (start-up re-activation sweep)
    async fn active_actions(&self) -> RepoResult<Vec<ActiveAction>>;

    /// Every Expiring entry with a deadline before `before` (exclusive)
    async fn expiring_actions(&self, before: i64) -> RepoResult<Vec<ExpiringAction>>;

    /// Whether the action is still registered as Expiring. Used by the
    /// scheduler to re-verify under its lock before arming a timer.
    async fn is_still_expiring(&self, id: ActionId) -> RepoResult<bool>;
}
