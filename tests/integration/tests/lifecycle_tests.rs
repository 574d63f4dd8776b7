//! End-to-end lifecycle tests: apply, suspend, and natural expiration

use std::time::Duration;

use integration_tests::{harness, harness_with_config};
use warden_core::time::now_millis;
use warden_core::types::{ActionType, MarkerRole};
use warden_core::value_objects::Snowflake;
use warden_core::{ActionKind, ModerationError, EXPIRATION_PERMANENT};
use warden_service::{ApplyRequest, SchedulerConfig};

fn request(ty: ActionType, target: i64, duration: Option<&str>) -> ApplyRequest {
    ApplyRequest {
        ty,
        target_id: Snowflake::new(target),
        actor_id: Snowflake::new(1),
        data: None,
        duration: duration.map(String::from),
        reason: Some("test".to_string()),
    }
}

#[tokio::test]
async fn test_mute_round_trip() {
    let h = harness().await;
    h.platform.add_member(Snowflake::new(7));

    let before = now_millis();
    let action = h
        .coordinator
        .apply(request(ActionType::Mute, 7, Some("30m")))
        .await
        .expect("apply");

    assert!(action.expiration >= before + 30 * 60 * 1_000);
    assert!(action.expiration <= now_millis() + 30 * 60 * 1_000);
    assert!(h.platform.marker(Snowflake::new(7), MarkerRole::Mute));

    let active = h
        .coordinator
        .active_action(Snowflake::new(7), ActionType::Mute)
        .await
        .expect("query")
        .expect("active");
    assert_eq!(active.id, action.id);

    let published = h.sink.published();
    assert_eq!(published.len(), 1);
    assert!(!published[0].reversal);
    assert_eq!(published[0].action_id, Some(action.id));
}

#[tokio::test]
async fn test_short_mute_expires() {
    let h = harness().await;
    h.scheduler.start().await;
    h.platform.add_member(Snowflake::new(7));

    let action = h
        .coordinator
        .apply(request(ActionType::Mute, 7, Some("1s")))
        .await
        .expect("apply");

    tokio::time::sleep(Duration::from_millis(2_000)).await;

    assert!(!h.platform.marker(Snowflake::new(7), MarkerRole::Mute));
    assert!(h
        .coordinator
        .active_action(Snowflake::new(7), ActionType::Mute)
        .await
        .expect("query")
        .is_none());

    // natural expiration writes no suspension record
    let fetched = h
        .coordinator
        .action(action.id)
        .await
        .expect("query")
        .expect("exists");
    assert!(fetched.suspension.is_none());

    // deactivated exactly once
    assert_eq!(h.platform.call_count("remove_marker"), 1);

    let automatic = h.sink.automatic();
    assert_eq!(automatic.len(), 1);
    assert!(automatic[0].reversal);
    assert_eq!(automatic[0].action_id, Some(action.id));
}

#[tokio::test]
async fn test_permanent_ban_never_fires() {
    let h = harness().await;
    h.scheduler.start().await;
    h.platform.add_member(Snowflake::new(9));

    let action = h
        .coordinator
        .apply(request(ActionType::Ban, 9, Some("perm")))
        .await
        .expect("apply");

    assert_eq!(action.expiration, EXPIRATION_PERMANENT);
    assert!(h.platform.banned(Snowflake::new(9)));
    assert_eq!(h.scheduler.pending_timers().await, 0);

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(h.platform.banned(Snowflake::new(9)));
    assert!(h
        .coordinator
        .active_action(Snowflake::new(9), ActionType::Ban)
        .await
        .expect("query")
        .is_some());
}

#[tokio::test]
async fn test_kick_requires_presence() {
    let h = harness().await;

    let err = h
        .coordinator
        .apply(request(ActionType::Kick, 7, None))
        .await
        .expect_err("absent target");
    assert!(matches!(err, ModerationError::AbsentTarget));

    // aborted applies leave no record
    let history = h
        .coordinator
        .actions_for_target(ActionKind::User, Snowflake::new(7))
        .await
        .expect("query");
    assert!(history.is_empty());

    h.platform.add_member(Snowflake::new(7));
    let action = h
        .coordinator
        .apply(request(ActionType::Kick, 7, None))
        .await
        .expect("apply");
    assert_eq!(action.expiration, 0);
    assert!(!h.platform.member(Snowflake::new(7)));
}

#[tokio::test]
async fn test_warn_is_one_shot() {
    let h = harness().await;
    h.platform.add_member(Snowflake::new(7));

    let action = h
        .coordinator
        .apply(request(ActionType::Warn, 7, None))
        .await
        .expect("apply");

    assert_eq!(action.expiration, 0);
    assert!(h
        .coordinator
        .active_action(Snowflake::new(7), ActionType::Warn)
        .await
        .expect("query")
        .is_none());

    let err = h
        .coordinator
        .suspend(ActionType::Warn, Snowflake::new(7), Snowflake::new(1), None)
        .await
        .expect_err("one-shot");
    assert!(matches!(err, ModerationError::NotSuspendable));
}

#[tokio::test]
async fn test_duplicate_apply_rejected() {
    let h = harness().await;
    h.platform.add_member(Snowflake::new(9));

    h.coordinator
        .apply(request(ActionType::Ban, 9, Some("perm")))
        .await
        .expect("apply");

    let err = h
        .coordinator
        .apply(request(ActionType::Ban, 9, Some("1d")))
        .await
        .expect_err("already banned");
    assert!(matches!(err, ModerationError::AlreadyActive { .. }));
}

#[tokio::test]
async fn test_suspend_then_second_suspend_fails() {
    let h = harness().await;
    h.platform.add_member(Snowflake::new(7));

    let action = h
        .coordinator
        .apply(request(ActionType::Mute, 7, Some("perm")))
        .await
        .expect("apply");

    h.coordinator
        .suspend(
            ActionType::Mute,
            Snowflake::new(7),
            Snowflake::new(2),
            Some("appealed"),
        )
        .await
        .expect("suspend");

    assert!(!h.platform.marker(Snowflake::new(7), MarkerRole::Mute));
    let fetched = h
        .coordinator
        .action(action.id)
        .await
        .expect("query")
        .expect("exists");
    assert_eq!(
        fetched.suspension.expect("suspended").suspender_id,
        Snowflake::new(2)
    );

    // no record, no live marker: nothing left to revert
    let err = h
        .coordinator
        .suspend(ActionType::Mute, Snowflake::new(7), Snowflake::new(2), None)
        .await
        .expect_err("not active");
    assert!(matches!(err, ModerationError::NotActive { .. }));
}

#[tokio::test]
async fn test_suspend_reverts_external_ban() {
    let h = harness().await;
    // banned outside the bot, no persisted record
    h.platform.force_ban(Snowflake::new(9));

    h.coordinator
        .suspend(ActionType::Ban, Snowflake::new(9), Snowflake::new(1), None)
        .await
        .expect("revert beyond db");

    assert!(!h.platform.banned(Snowflake::new(9)));

    let published = h.sink.published();
    assert_eq!(published.len(), 1);
    assert!(published[0].reversal);
    assert_eq!(published[0].action_id, None);
}

#[tokio::test]
async fn test_suspend_unmanaged_lock_rejected() {
    let h = harness().await;
    h.platform.add_text_channel(Snowflake::new(100), 0);

    // lock cannot be reverted from live state alone
    let err = h
        .coordinator
        .suspend(ActionType::Lock, Snowflake::new(100), Snowflake::new(1), None)
        .await
        .expect_err("unmanaged");
    assert!(matches!(err, ModerationError::NotManaged { .. }));
}

#[tokio::test]
async fn test_auxiliary_mute_round_trip() {
    let h = harness().await;
    h.platform.add_member(Snowflake::new(7));

    let action = h
        .coordinator
        .apply(request(ActionType::RequestsMute, 7, Some("1h")))
        .await
        .expect("apply");
    assert!(h.platform.marker(Snowflake::new(7), MarkerRole::RequestsMute));
    // the ordinary mute marker is untouched
    assert!(!h.platform.marker(Snowflake::new(7), MarkerRole::Mute));

    let active = h
        .coordinator
        .active_action(Snowflake::new(7), ActionType::RequestsMute)
        .await
        .expect("query")
        .expect("active");
    assert_eq!(active.id, action.id);

    h.coordinator
        .suspend(
            ActionType::RequestsMute,
            Snowflake::new(7),
            Snowflake::new(2),
            None,
        )
        .await
        .expect("suspend");
    assert!(!h.platform.marker(Snowflake::new(7), MarkerRole::RequestsMute));
}

#[tokio::test]
async fn test_auxiliary_mute_reverts_external_marker() {
    let h = harness().await;
    let target = Snowflake::new(7);
    h.platform.add_member(target);
    // granted outside the bot, no persisted record
    h.platform.grant_marker(target, MarkerRole::SupportMute);

    h.coordinator
        .suspend(ActionType::SupportMute, target, Snowflake::new(1), None)
        .await
        .expect("revert beyond db");
    assert!(!h.platform.marker(target, MarkerRole::SupportMute));
}

#[tokio::test]
async fn test_identity_resolves_to_all_accounts() {
    let h = harness().await;
    let target = Snowflake::new(7);
    h.resolver
        .map_accounts(target, vec![Snowflake::new(71), Snowflake::new(72)]);
    h.platform.add_member(Snowflake::new(71));
    h.platform.add_member(Snowflake::new(72));

    h.coordinator
        .apply(request(ActionType::Mute, 7, Some("perm")))
        .await
        .expect("apply");

    assert!(h.platform.marker(Snowflake::new(71), MarkerRole::Mute));
    assert!(h.platform.marker(Snowflake::new(72), MarkerRole::Mute));

    h.coordinator
        .suspend(ActionType::Mute, target, Snowflake::new(1), None)
        .await
        .expect("suspend");
    assert!(!h.platform.marker(Snowflake::new(71), MarkerRole::Mute));
    assert!(!h.platform.marker(Snowflake::new(72), MarkerRole::Mute));
}

#[tokio::test]
async fn test_invalid_duration_rejected() {
    let h = harness_with_config(SchedulerConfig::default()).await;
    h.platform.add_member(Snowflake::new(7));

    let err = h
        .coordinator
        .apply(request(ActionType::Mute, 7, Some("soon")))
        .await
        .expect_err("invalid duration");
    assert!(matches!(err, ModerationError::InvalidDuration(_)));

    let err = h
        .coordinator
        .apply(request(ActionType::Mute, 7, None))
        .await
        .expect_err("missing duration");
    assert!(matches!(err, ModerationError::ZeroDuration));
}
