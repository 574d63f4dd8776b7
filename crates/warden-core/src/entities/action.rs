//! Moderation action records
//!
//! An `Action` is an append-only log entry: immutable once created except
//! for the one-time suspension sub-record. Supersession links actions into
//! a singly-linked history chain via `prev_id`; nothing is ever deleted.

use crate::types::ActionType;
use crate::value_objects::{ActionId, Snowflake};

/// Expiration value for actions whose type has no concept of duration
/// (one-shot actions such as kick or warn)
pub const EXPIRATION_NONE: i64 = 0;

/// Expiration value for explicitly permanent actions: tracked as active but
/// never auto-expired
pub const EXPIRATION_PERMANENT: i64 = -1;

/// Compute the absolute expiration timestamp from a relative duration.
///
/// `duration_ms == 0` means the type has no duration concept, negative
/// means permanent, positive is added to `created_at`.
#[must_use]
pub fn compute_expiration(created_at: i64, duration_ms: i64) -> i64 {
    if duration_ms == 0 {
        EXPIRATION_NONE
    } else if duration_ms < 0 {
        EXPIRATION_PERMANENT
    } else {
        created_at + duration_ms
    }
}

/// Graded payload of an action plus the value deactivation restores.
///
/// `reset_data` is not necessarily zero: a slowmode of 5s applied on top of
/// a manually configured 2s must reset back to 2s, and that baseline is
/// carried forward across the whole supersession chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionData {
    pub data: i64,
    pub reset_data: i64,
}

/// One-time manual closure of an action prior to its natural expiration.
///
/// Presence is terminal: a suspended action can never become active or
/// expiring again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suspension {
    pub suspender_id: Snowflake,
    pub time: i64,
    pub reason: Option<String>,
}

/// A persisted record of one applied sanction and its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub id: ActionId,
    pub ty: ActionType,
    pub target_id: Snowflake,
    pub actor_id: Snowflake,
    pub created_at: i64,
    /// See [`EXPIRATION_NONE`] and [`EXPIRATION_PERMANENT`]
    pub expiration: i64,
    pub reason: Option<String>,
    pub data: Option<ActionData>,
    pub prev_id: Option<ActionId>,
    pub suspension: Option<Suspension>,
}

impl Action {
    /// Whether this action is explicitly permanent
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        self.expiration < 0
    }

    /// Whether this action has a future auto-expiration instant
    #[must_use]
    pub fn is_expiring(&self) -> bool {
        self.expiration > 0 && self.suspension.is_none()
    }

    /// Whether this action has been manually suspended
    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.suspension.is_some()
    }
}

/// Parameters for inserting a new action record
#[derive(Debug, Clone)]
pub struct NewAction {
    pub ty: ActionType,
    pub target_id: Snowflake,
    pub actor_id: Snowflake,
    pub data: Option<ActionData>,
    /// Relative duration: 0 = none, negative = permanent, positive = ms
    pub duration_ms: i64,
    pub reason: Option<String>,
    pub prev_id: Option<ActionId>,
}

/// Projection of the store's Active index: the newest non-suspended,
/// non-expired action for a (target, type) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveAction {
    pub id: ActionId,
    pub ty: ActionType,
    pub target_id: Snowflake,
    pub data: Option<ActionData>,
    pub expiration: i64,
    pub reason: Option<String>,
}

/// Projection of the store's Expiring index: an active action with a known
/// future auto-deactivation instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiringAction {
    pub id: ActionId,
    pub ty: ActionType,
    pub target_id: Snowflake,
    pub data: Option<ActionData>,
    pub expiration: i64,
}

impl From<&Action> for ExpiringAction {
    fn from(action: &Action) -> Self {
        Self {
            id: action.id,
            ty: action.ty,
            target_id: action.target_id,
            data: action.data,
            expiration: action.expiration,
        }
    }
}
