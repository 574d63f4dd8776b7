//! External effects of user-targeted action types
//!
//! A logical user may map to several platform accounts; every effect loops
//! over the resolved accounts and tolerates accounts that vanished between
//! resolution and the call.

use super::{ActionType, MarkerRole};
use crate::error::PlatformError;
use crate::traits::{Activation, IdentityResolver, PlatformClient, PlatformResult};
use crate::value_objects::Snowflake;

const fn marker_role(ty: ActionType) -> Option<MarkerRole> {
    match ty {
        ActionType::Mute => Some(MarkerRole::Mute),
        ActionType::MetaMute => Some(MarkerRole::MetaMute),
        ActionType::ReactionMute => Some(MarkerRole::ReactionMute),
        ActionType::RequestsMute => Some(MarkerRole::RequestsMute),
        ActionType::SupportMute => Some(MarkerRole::SupportMute),
        _ => None,
    }
}

async fn resolve(
    resolver: &dyn IdentityResolver,
    target: Snowflake,
    direct: bool,
) -> PlatformResult<Vec<Snowflake>> {
    if direct {
        Ok(vec![target])
    } else {
        resolver.resolve_accounts(target).await
    }
}

pub(super) async fn activate(
    ty: ActionType,
    platform: &dyn PlatformClient,
    resolver: &dyn IdentityResolver,
    target: Snowflake,
    direct: bool,
    reason: Option<&str>,
) -> PlatformResult<Activation> {
    let mut affected = 0;

    for account in resolve(resolver, target, direct).await? {
        match activate_account(ty, platform, account, reason).await {
            Ok(true) => affected += 1,
            Ok(false) => {}
            Err(PlatformError::TargetVanished) => {}
            Err(e) => return Err(e),
        }
    }

    Ok(Activation::Applied {
        affected,
        reset_data: 0,
    })
}

async fn activate_account(
    ty: ActionType,
    platform: &dyn PlatformClient,
    account: Snowflake,
    reason: Option<&str>,
) -> PlatformResult<bool> {
    if let Some(role) = marker_role(ty) {
        return platform.add_marker(account, role, reason).await.map(|()| true);
    }

    match ty {
        ActionType::Ban => platform.ban_user(account, reason).await.map(|()| true),
        ActionType::Kick => platform.kick_user(account, reason).await.map(|()| true),
        // no platform effect, only counts present accounts so the
        // presence check upstream works
        ActionType::Warn => platform.is_member(account).await,
        // marker mutes handled above, channel types never dispatch here
        _ => Ok(false),
    }
}

pub(super) async fn deactivate(
    ty: ActionType,
    platform: &dyn PlatformClient,
    resolver: &dyn IdentityResolver,
    target: Snowflake,
    reason: Option<&str>,
) -> PlatformResult<()> {
    for account in resolve(resolver, target, false).await? {
        let res = match (ty, marker_role(ty)) {
            (_, Some(role)) => platform.remove_marker(account, role, reason).await,
            (ActionType::Ban, _) => platform.unban_user(account, reason).await,
            _ => Ok(()),
        };

        match res {
            Ok(()) | Err(PlatformError::TargetVanished) => {}
            Err(e) => return Err(e),
        }
    }

    Ok(())
}

pub(super) async fn is_active(
    ty: ActionType,
    platform: &dyn PlatformClient,
    resolver: &dyn IdentityResolver,
    target: Snowflake,
) -> PlatformResult<bool> {
    for account in resolve(resolver, target, false).await? {
        let res = match (ty, marker_role(ty)) {
            (_, Some(role)) => platform.has_marker(account, role).await,
            (ActionType::Ban, _) => platform.is_banned(account).await,
            _ => Ok(false),
        };

        match res {
            Ok(true) => return Ok(true),
            Ok(false) | Err(PlatformError::TargetVanished) => {}
            Err(e) => return Err(e),
        }
    }

    Ok(false)
}
