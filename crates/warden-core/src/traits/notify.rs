//! Announcement sink port
//!
//! Applied, suspended and expired actions are announced to an external sink
//! (log channel, direct message, audit feed). Sink failures never roll back
//! the action they describe.

use async_trait::async_trait;

use crate::time::format_timestamp;
use crate::types::ActionType;
use crate::value_objects::{ActionId, Snowflake};
use crate::PlatformResult;

/// Human-facing description of one lifecycle event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    /// Absent when an externally-applied effect was reverted with no
    /// persisted record
    pub action_id: Option<ActionId>,
    pub ty: ActionType,
    pub target_id: Snowflake,
    /// true for suspension/expiration, false for application
    pub reversal: bool,
    /// true when the scheduler fired this, false for operator commands
    pub automatic: bool,
    /// Expiration of the applied action; ignored for reversals
    pub expiration: i64,
    pub reason: Option<String>,
}

impl Announcement {
    /// Short title, e.g. "User unmuted (expiration)"
    #[must_use]
    pub fn title(&self) -> String {
        let mut title = format!("{} {}", target_label(self.ty), self.ty.desc(self.reversal));
        if self.automatic {
            title.push_str(" (expiration)");
        }
        title
    }

    /// Full body, e.g.
    /// "User 7 has been muted until Wed, 03 Sep 2025 12:00:00 UTC: spam"
    #[must_use]
    pub fn describe(&self) -> String {
        let mut desc = format!(
            "{} {} has been {}",
            target_label(self.ty),
            self.target_id,
            self.ty.desc(self.reversal)
        );

        if self.automatic {
            desc.push_str(" automatically");
        }

        if !self.reversal {
            if self.expiration < 0 {
                desc.push_str(" permanently");
            } else if self.expiration > 0 {
                desc.push_str(" until ");
                desc.push_str(&format_timestamp(self.expiration));
            }
        }

        if let Some(reason) = &self.reason {
            if !reason.is_empty() {
                desc.push_str(": ");
                desc.push_str(reason);
            }
        }

        desc
    }

    /// Footer reference, e.g. "Action ID: 17"
    #[must_use]
    pub fn reference(&self) -> String {
        match self.action_id {
            Some(id) => format!("Action ID: {id}"),
            None => "No recorded action".to_string(),
        }
    }
}

fn target_label(ty: ActionType) -> &'static str {
    match ty.kind() {
        crate::types::ActionKind::User => "User",
        crate::types::ActionKind::Channel => "Channel",
    }
}

/// Sink for lifecycle announcements
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn publish(&self, announcement: &Announcement) -> PlatformResult<()>;
}
