//! Platform client and identity resolver ports
//!
//! The platform client exposes the per-kind primitives the action type
//! descriptors need. All primitives are idempotent or made idempotent by
//! the descriptor's own pre-checks; failures are catchable errors, never
//! panics.

use async_trait::async_trait;

use crate::error::PlatformError;
use crate::types::{ChannelPerms, MarkerRole};
use crate::value_objects::Snowflake;

/// Result type for platform operations
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Outcome of an action type's external activation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// The action fundamentally cannot apply to this kind of target
    /// (e.g. slowmode on a non-text channel); the whole operation aborts
    NotApplicable,
    /// The effect was attempted on every resolved entity
    Applied {
        /// How many concrete entities the effect succeeded on
        affected: u32,
        /// The external-state value deactivation should restore
        reset_data: i64,
    },
}

/// Live connection to the moderated platform
#[async_trait]
pub trait PlatformClient: Send + Sync {
    async fn ban_user(&self, user: Snowflake, reason: Option<&str>) -> PlatformResult<()>;

    async fn unban_user(&self, user: Snowflake, reason: Option<&str>) -> PlatformResult<()>;

    async fn is_banned(&self, user: Snowflake) -> PlatformResult<bool>;

    async fn kick_user(&self, user: Snowflake, reason: Option<&str>) -> PlatformResult<()>;

    /// Whether the user is currently present in the moderated community
    async fn is_member(&self, user: Snowflake) -> PlatformResult<bool>;

    async fn add_marker(
        &self,
        user: Snowflake,
        marker: MarkerRole,
        reason: Option<&str>,
    ) -> PlatformResult<()>;

    async fn remove_marker(
        &self,
        user: Snowflake,
        marker: MarkerRole,
        reason: Option<&str>,
    ) -> PlatformResult<()>;

    async fn has_marker(&self, user: Snowflake, marker: MarkerRole) -> PlatformResult<bool>;

    /// Current `@everyone` deny overlay of a channel
    async fn channel_deny_mask(&self, channel: Snowflake) -> PlatformResult<ChannelPerms>;

    async fn update_channel_deny_mask(
        &self,
        channel: Snowflake,
        mask: ChannelPerms,
        reason: Option<&str>,
    ) -> PlatformResult<()>;

    /// Current slowmode delay in seconds, `None` for channels without a
    /// rate limit concept (non-text channels)
    async fn slowmode_delay(&self, channel: Snowflake) -> PlatformResult<Option<i64>>;

    async fn set_slowmode_delay(
        &self,
        channel: Snowflake,
        seconds: i64,
        reason: Option<&str>,
    ) -> PlatformResult<()>;
}

/// Maps a logical target identity to its concrete platform accounts.
///
/// One moderated person may own several accounts; sanctions bind the
/// identity, not the account.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// All platform accounts belonging to the logical target, possibly
    /// empty if none are known
    async fn resolve_accounts(&self, target: Snowflake) -> PlatformResult<Vec<Snowflake>>;
}
