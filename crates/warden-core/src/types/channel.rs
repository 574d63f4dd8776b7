//! External effects of channel-targeted action types
//!
//! Lock edits the `@everyone` permission overlay and remembers exactly the
//! bits it added, so deactivation restores the pre-lock overlay rather than
//! blindly clearing everything. Slowmode remembers the prior delay.

use super::{ActionType, ChannelPerms};
use crate::traits::{Activation, PlatformClient, PlatformResult};
use crate::value_objects::Snowflake;

pub(super) async fn activate(
    ty: ActionType,
    platform: &dyn PlatformClient,
    target: Snowflake,
    data: i64,
    reason: Option<&str>,
) -> PlatformResult<Activation> {
    match ty {
        ActionType::Lock => {
            let denied = platform.channel_deny_mask(target).await?;
            let extra = ChannelPerms::RESTRICTED.difference(denied);

            if extra.is_empty() {
                // already fully denied, nothing to add and nothing to reset
                return Ok(Activation::Applied {
                    affected: 1,
                    reset_data: 0,
                });
            }

            platform
                .update_channel_deny_mask(target, denied.union(extra), reason)
                .await?;

            Ok(Activation::Applied {
                affected: 1,
                reset_data: extra.bits(),
            })
        }
        ActionType::Slowmode => {
            let Some(old_delay) = platform.slowmode_delay(target).await? else {
                return Ok(Activation::NotApplicable);
            };

            platform.set_slowmode_delay(target, data, reason).await?;

            Ok(Activation::Applied {
                affected: 1,
                reset_data: old_delay,
            })
        }
        _ => Ok(Activation::NotApplicable),
    }
}

pub(super) async fn deactivate(
    ty: ActionType,
    platform: &dyn PlatformClient,
    target: Snowflake,
    reset_data: Option<i64>,
    reason: Option<&str>,
) -> PlatformResult<()> {
    match ty {
        ActionType::Lock => {
            // without a persisted record, assume the lock added every
            // restricted bit
            let reset = reset_data
                .map(ChannelPerms::from_bits_truncate)
                .unwrap_or(ChannelPerms::RESTRICTED);

            let denied = platform.channel_deny_mask(target).await?;
            if denied.intersection(reset).is_empty() {
                return Ok(());
            }

            platform
                .update_channel_deny_mask(target, denied.difference(reset), reason)
                .await
        }
        ActionType::Slowmode => {
            let reset = reset_data.unwrap_or(0);

            let Some(current) = platform.slowmode_delay(target).await? else {
                return Ok(());
            };
            if current <= reset {
                return Ok(());
            }

            platform.set_slowmode_delay(target, reset, reason).await
        }
        _ => Ok(()),
    }
}

pub(super) async fn is_active(
    ty: ActionType,
    platform: &dyn PlatformClient,
    target: Snowflake,
    data: i64,
) -> PlatformResult<bool> {
    match ty {
        ActionType::Lock => {
            let denied = platform.channel_deny_mask(target).await?;
            Ok(denied.contains(ChannelPerms::RESTRICTED))
        }
        ActionType::Slowmode => {
            let delay = platform.slowmode_delay(target).await?;
            Ok(delay.is_some_and(|current| current >= data))
        }
        _ => Ok(false),
    }
}
