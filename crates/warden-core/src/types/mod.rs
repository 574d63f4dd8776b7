//! Action type taxonomy
//!
//! Each sanction kind the bot can apply is one `ActionType` variant with an
//! explicit capability set. The original system probed capabilities
//! reflectively; here every flag is declared per variant and the external
//! effects dispatch through the platform client trait.

mod channel;
mod user;

use std::cmp::Ordering;
use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::ModerationError;
use crate::traits::{Activation, IdentityResolver, PlatformClient, PlatformResult};
use crate::value_objects::Snowflake;

/// Which kind of entity an action targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    User,
    Channel,
}

impl ActionKind {
    /// Stable identifier used in persisted records
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Channel => "channel",
        }
    }

    /// Parse a persisted kind identifier
    pub fn parse(id: &str) -> Result<Self, ModerationError> {
        match id {
            "user" => Ok(Self::User),
            "channel" => Ok(Self::Channel),
            _ => Err(ModerationError::Inconsistent(format!(
                "unknown action kind: {id}"
            ))),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Marker role the mute family of actions grants on the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerRole {
    Mute,
    MetaMute,
    ReactionMute,
    RequestsMute,
    SupportMute,
}

bitflags! {
    /// Channel permission overlay bits manipulated by the lock action
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ChannelPerms: i64 {
        const ADD_REACTIONS = 1 << 6;
        const SEND_MESSAGES = 1 << 11;
    }
}

impl ChannelPerms {
    /// The bits a channel lock denies for `@everyone`
    pub const RESTRICTED: Self = Self::SEND_MESSAGES.union(Self::ADD_REACTIONS);
}

/// One concrete sanction kind with its capability set and external effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    // user-targeted
    Ban,
    Kick,
    Mute,
    MetaMute,
    ReactionMute,
    RequestsMute,
    SupportMute,
    Warn,
    // channel-targeted
    Lock,
    Slowmode,
}

impl ActionType {
    /// Every known action type
    pub const ALL: [Self; 10] = [
        Self::Ban,
        Self::Kick,
        Self::Mute,
        Self::MetaMute,
        Self::ReactionMute,
        Self::RequestsMute,
        Self::SupportMute,
        Self::Warn,
        Self::Lock,
        Self::Slowmode,
    ];

    /// Look up a type by kind and persisted identifier
    pub fn get(kind: ActionKind, id: &str) -> Result<Self, ModerationError> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.kind() == kind && ty.id() == id)
            .ok_or_else(|| ModerationError::UnknownType {
                kind,
                id: id.to_string(),
            })
    }

    /// Stable identifier used in persisted records and operator input
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Ban => "ban",
            Self::Kick => "kick",
            Self::Mute => "mute",
            Self::MetaMute => "meta_mute",
            Self::ReactionMute => "reaction_mute",
            Self::RequestsMute => "requests_mute",
            Self::SupportMute => "support_mute",
            Self::Warn => "warn",
            Self::Lock => "lock",
            Self::Slowmode => "slowmode",
        }
    }

    /// Whether this type targets a user or a channel
    #[must_use]
    pub const fn kind(self) -> ActionKind {
        match self {
            Self::Ban | Self::Kick | Self::Mute | Self::MetaMute | Self::ReactionMute
            | Self::RequestsMute | Self::SupportMute | Self::Warn => ActionKind::User,
            Self::Lock | Self::Slowmode => ActionKind::Channel,
        }
    }

    /// Whether actions of this type last for a duration (and therefore get
    /// an Active record and may expire or be suspended)
    #[must_use]
    pub const fn has_duration(self) -> bool {
        !matches!(self, Self::Kick | Self::Warn)
    }

    /// Whether deactivation performs an external effect
    #[must_use]
    pub const fn has_deactivation(self) -> bool {
        !matches!(self, Self::Kick | Self::Warn)
    }

    /// Whether the effect should suppress the target's content immediately,
    /// ahead of external confirmation
    #[must_use]
    pub const fn blocks_messages(self) -> bool {
        matches!(self, Self::Ban | Self::Mute | Self::Lock)
    }

    /// Whether the effect itself prevents after-the-fact notification of
    /// the target (removal from the space)
    #[must_use]
    pub const fn is_notification_barrier(self) -> bool {
        matches!(self, Self::Ban | Self::Kick)
    }

    /// Whether suspension may proceed purely from observed external state
    /// when no persisted record exists
    #[must_use]
    pub const fn can_revert_beyond_db(self) -> bool {
        matches!(
            self,
            Self::Ban
                | Self::Mute
                | Self::MetaMute
                | Self::ReactionMute
                | Self::RequestsMute
                | Self::SupportMute
        )
    }

    /// Whether apply must find at least one present concrete entity.
    /// One-shot actions act on whoever is present right now; durable ones
    /// also bind future re-joins.
    #[must_use]
    pub const fn requires_target_presence(self) -> bool {
        !self.has_duration()
    }

    /// Human description of the applied (or reverted) effect,
    /// e.g. "muted" / "unmuted"
    #[must_use]
    pub const fn desc(self, reversal: bool) -> &'static str {
        match (self, reversal) {
            (Self::Ban, false) => "banned",
            (Self::Ban, true) => "unbanned",
            (Self::Kick, _) => "kicked",
            (Self::Mute, false) => "muted",
            (Self::Mute, true) => "unmuted",
            (Self::MetaMute, false) => "meta muted",
            (Self::MetaMute, true) => "meta unmuted",
            (Self::ReactionMute, false) => "reaction muted",
            (Self::ReactionMute, true) => "reaction unmuted",
            (Self::RequestsMute, false) => "requests muted",
            (Self::RequestsMute, true) => "requests unmuted",
            (Self::SupportMute, false) => "support muted",
            (Self::SupportMute, true) => "support unmuted",
            (Self::Warn, _) => "warned",
            (Self::Lock, false) => "locked",
            (Self::Lock, true) => "unlocked",
            (Self::Slowmode, false) => "slowmode enabled",
            (Self::Slowmode, true) => "slowmode disabled",
        }
    }

    /// Precedence order between two data values of this type.
    ///
    /// `Equal` for non-graded types; for graded types `Greater` means `a`
    /// supersedes `b`.
    #[must_use]
    pub fn compare_data(self, a: i64, b: i64) -> Ordering {
        match self {
            Self::Slowmode => a.cmp(&b),
            _ => Ordering::Equal,
        }
    }

    /// Whether a new data value is a genuine escalation over the previous
    /// action chain's reset baseline
    #[must_use]
    pub fn check_data(self, data: i64, prev_reset_data: i64) -> bool {
        match self {
            Self::Slowmode => data > prev_reset_data,
            _ => true,
        }
    }

    /// Perform the external side effect of this action.
    ///
    /// With `direct` set the target is one concrete entity; otherwise it is
    /// a logical identity resolved to zero or more accounts, each attempted
    /// with "entity vanished" failures tolerated silently.
    pub async fn activate(
        self,
        platform: &dyn PlatformClient,
        resolver: &dyn IdentityResolver,
        target: Snowflake,
        direct: bool,
        data: i64,
        reason: Option<&str>,
    ) -> PlatformResult<Activation> {
        match self.kind() {
            ActionKind::User => user::activate(self, platform, resolver, target, direct, reason).await,
            ActionKind::Channel => channel::activate(self, platform, target, data, reason).await,
        }
    }

    /// Revert the external side effect. Idempotent: reverting an absent
    /// effect is a no-op, not an error.
    pub async fn deactivate(
        self,
        platform: &dyn PlatformClient,
        resolver: &dyn IdentityResolver,
        target: Snowflake,
        reset_data: Option<i64>,
        reason: Option<&str>,
    ) -> PlatformResult<()> {
        match self.kind() {
            ActionKind::User => user::deactivate(self, platform, resolver, target, reason).await,
            ActionKind::Channel => {
                channel::deactivate(self, platform, target, reset_data, reason).await
            }
        }
    }

    /// Query live external state directly, bypassing the persisted store.
    /// Detects effects applied or reverted outside the bot.
    pub async fn is_active(
        self,
        platform: &dyn PlatformClient,
        resolver: &dyn IdentityResolver,
        target: Snowflake,
        data: i64,
    ) -> PlatformResult<bool> {
        match self.kind() {
            ActionKind::User => user::is_active(self, platform, resolver, target).await,
            ActionKind::Channel => channel::is_active(self, platform, target, data).await,
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
