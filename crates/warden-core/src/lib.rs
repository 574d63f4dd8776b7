//! # warden-core
//!
//! Domain layer for the moderation action lifecycle: the `Action` entity,
//! the action type taxonomy with its capability flags, duration parsing,
//! and the traits the persistence and platform layers implement.
//! This crate has zero dependencies on infrastructure (database, protocol
//! client, etc.).

pub mod duration;
pub mod entities;
pub mod error;
pub mod time;
pub mod traits;
pub mod types;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    compute_expiration, Action, ActionData, ActiveAction, ExpiringAction, NewAction, Suspension,
    EXPIRATION_NONE, EXPIRATION_PERMANENT,
};
pub use error::{ModerationError, PlatformError};
pub use traits::{
    ActionStore, Activation, Announcement, IdentityResolver, NotificationSink, PlatformClient,
    PlatformResult, RepoResult,
};
pub use types::{ActionKind, ActionType, ChannelPerms, MarkerRole};
pub use value_objects::{ActionId, Snowflake, SnowflakeParseError, SYSTEM_ACTOR};
