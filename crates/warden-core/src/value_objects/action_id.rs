//! Action ID - store-assigned identifier for persisted moderation actions
//!
//! Assigned monotonically by the action store on insert; never reused.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a persisted moderation action
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct ActionId(i64);

impl ActionId {
    /// Create an ActionId from a raw i64 value
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner i64 value
    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ActionId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<ActionId> for i64 {
    fn from(id: ActionId) -> Self {
        id.0
    }
}
