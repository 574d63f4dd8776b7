//! In-memory doubles for the platform client, identity resolver, and
//! announcement sink

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;

use warden_core::traits::{Announcement, IdentityResolver, NotificationSink, PlatformClient};
use warden_core::types::{ChannelPerms, MarkerRole};
use warden_core::{PlatformError, PlatformResult, Snowflake};

#[derive(Default)]
struct PlatformState {
    members: HashSet<i64>,
    banned: HashSet<i64>,
    markers: HashMap<i64, HashSet<MarkerRole>>,
    deny_masks: HashMap<i64, i64>,
    /// Present keys are text channels; value is the current slowmode delay
    slowmode: HashMap<i64, i64>,
    /// Number of upcoming revert calls that fail with a transient error
    revert_failures: u32,
    calls: HashMap<&'static str, u32>,
}

impl PlatformState {
    fn count(&mut self, name: &'static str) {
        *self.calls.entry(name).or_insert(0) += 1;
    }

    fn inject_revert_failure(&mut self) -> PlatformResult<()> {
        if self.revert_failures > 0 {
            self.revert_failures -= 1;
            return Err(PlatformError::Unavailable("injected failure".to_string()));
        }
        Ok(())
    }
}

/// Mutable fake of the moderated platform
#[derive(Default)]
pub struct MockPlatform {
    state: Mutex<PlatformState>,
}

impl MockPlatform {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_member(&self, user: Snowflake) {
        self.state.lock().members.insert(user.into_inner());
    }

    pub fn remove_member(&self, user: Snowflake) {
        self.state.lock().members.remove(&user.into_inner());
    }

    /// Register a text channel with its current slowmode delay
    pub fn add_text_channel(&self, channel: Snowflake, slowmode_delay: i64) {
        self.state
            .lock()
            .slowmode
            .insert(channel.into_inner(), slowmode_delay);
    }

    pub fn set_deny_mask(&self, channel: Snowflake, mask: ChannelPerms) {
        self.state
            .lock()
            .deny_masks
            .insert(channel.into_inner(), mask.bits());
    }

    /// Apply a ban outside the bot's own flows
    pub fn force_ban(&self, user: Snowflake) {
        let mut state = self.state.lock();
        state.members.remove(&user.into_inner());
        state.banned.insert(user.into_inner());
    }

    /// Grant a marker outside the bot's own flows
    pub fn grant_marker(&self, user: Snowflake, marker: MarkerRole) {
        self.state
            .lock()
            .markers
            .entry(user.into_inner())
            .or_default()
            .insert(marker);
    }

    /// Drop a marker outside the bot's own flows
    pub fn strip_marker(&self, user: Snowflake, marker: MarkerRole) {
        if let Some(markers) = self.state.lock().markers.get_mut(&user.into_inner()) {
            markers.remove(&marker);
        }
    }

    /// Make the next `n` revert calls (unban, marker removal, overlay and
    /// slowmode writes) fail with a transient error
    pub fn fail_reverts(&self, n: u32) {
        self.state.lock().revert_failures = n;
    }

    #[must_use]
    pub fn banned(&self, user: Snowflake) -> bool {
        self.state.lock().banned.contains(&user.into_inner())
    }

    #[must_use]
    pub fn member(&self, user: Snowflake) -> bool {
        self.state.lock().members.contains(&user.into_inner())
    }

    #[must_use]
    pub fn marker(&self, user: Snowflake, marker: MarkerRole) -> bool {
        self.state
            .lock()
            .markers
            .get(&user.into_inner())
            .is_some_and(|m| m.contains(&marker))
    }

    #[must_use]
    pub fn slowmode_of(&self, channel: Snowflake) -> Option<i64> {
        self.state.lock().slowmode.get(&channel.into_inner()).copied()
    }

    #[must_use]
    pub fn deny_mask_of(&self, channel: Snowflake) -> ChannelPerms {
        ChannelPerms::from_bits_truncate(
            self.state
                .lock()
                .deny_masks
                .get(&channel.into_inner())
                .copied()
                .unwrap_or(0),
        )
    }

    #[must_use]
    pub fn call_count(&self, name: &str) -> u32 {
        self.state.lock().calls.get(name).copied().unwrap_or(0)
    }
}

#[async_trait]
impl PlatformClient for MockPlatform {
    async fn ban_user(&self, user: Snowflake, _reason: Option<&str>) -> PlatformResult<()> {
        let mut state = self.state.lock();
        state.count("ban_user");
        state.members.remove(&user.into_inner());
        state.banned.insert(user.into_inner());
        Ok(())
    }

    async fn unban_user(&self, user: Snowflake, _reason: Option<&str>) -> PlatformResult<()> {
        let mut state = self.state.lock();
        state.count("unban_user");
        state.inject_revert_failure()?;
        state.banned.remove(&user.into_inner());
        Ok(())
    }

    async fn is_banned(&self, user: Snowflake) -> PlatformResult<bool> {
        Ok(self.state.lock().banned.contains(&user.into_inner()))
    }

    async fn kick_user(&self, user: Snowflake, _reason: Option<&str>) -> PlatformResult<()> {
        let mut state = self.state.lock();
        state.count("kick_user");
        if state.members.remove(&user.into_inner()) {
            Ok(())
        } else {
            Err(PlatformError::TargetVanished)
        }
    }

    async fn is_member(&self, user: Snowflake) -> PlatformResult<bool> {
        Ok(self.state.lock().members.contains(&user.into_inner()))
    }

    async fn add_marker(
        &self,
        user: Snowflake,
        marker: MarkerRole,
        _reason: Option<&str>,
    ) -> PlatformResult<()> {
        let mut state = self.state.lock();
        state.count("add_marker");
        if !state.members.contains(&user.into_inner()) {
            return Err(PlatformError::TargetVanished);
        }
        state.markers.entry(user.into_inner()).or_default().insert(marker);
        Ok(())
    }

    async fn remove_marker(
        &self,
        user: Snowflake,
        marker: MarkerRole,
        _reason: Option<&str>,
    ) -> PlatformResult<()> {
        let mut state = self.state.lock();
        state.count("remove_marker");
        state.inject_revert_failure()?;
        if !state.members.contains(&user.into_inner()) {
            return Err(PlatformError::TargetVanished);
        }
        if let Some(markers) = state.markers.get_mut(&user.into_inner()) {
            markers.remove(&marker);
        }
        Ok(())
    }

    async fn has_marker(&self, user: Snowflake, marker: MarkerRole) -> PlatformResult<bool> {
        Ok(self.marker(user, marker))
    }

    async fn channel_deny_mask(&self, channel: Snowflake) -> PlatformResult<ChannelPerms> {
        Ok(self.deny_mask_of(channel))
    }

    async fn update_channel_deny_mask(
        &self,
        channel: Snowflake,
        mask: ChannelPerms,
        _reason: Option<&str>,
    ) -> PlatformResult<()> {
        let mut state = self.state.lock();
        state.count("update_channel_deny_mask");
        state.inject_revert_failure()?;
        state.deny_masks.insert(channel.into_inner(), mask.bits());
        Ok(())
    }

    async fn slowmode_delay(&self, channel: Snowflake) -> PlatformResult<Option<i64>> {
        Ok(self.slowmode_of(channel))
    }

    async fn set_slowmode_delay(
        &self,
        channel: Snowflake,
        seconds: i64,
        _reason: Option<&str>,
    ) -> PlatformResult<()> {
        let mut state = self.state.lock();
        state.count("set_slowmode_delay");
        state.inject_revert_failure()?;
        state.slowmode.insert(channel.into_inner(), seconds);
        Ok(())
    }
}

/// Identity resolver backed by an explicit account map; unmapped targets
/// resolve to themselves
#[derive(Default)]
pub struct MockResolver {
    accounts: Mutex<HashMap<i64, Vec<i64>>>,
}

impl MockResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map_accounts(&self, target: Snowflake, accounts: Vec<Snowflake>) {
        self.accounts.lock().insert(
            target.into_inner(),
            accounts.into_iter().map(Snowflake::into_inner).collect(),
        );
    }
}

#[async_trait]
impl IdentityResolver for MockResolver {
    async fn resolve_accounts(&self, target: Snowflake) -> PlatformResult<Vec<Snowflake>> {
        Ok(self
            .accounts
            .lock()
            .get(&target.into_inner())
            .map_or_else(|| vec![target], |ids| ids.iter().copied().map(Snowflake::new).collect()))
    }
}

/// Announcement sink that records everything published to it
#[derive(Default)]
pub struct RecordingSink {
    published: Mutex<Vec<Announcement>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn published(&self) -> Vec<Announcement> {
        self.published.lock().clone()
    }

    /// Announcements fired by the scheduler rather than an operator
    #[must_use]
    pub fn automatic(&self) -> Vec<Announcement> {
        self.published
            .lock()
            .iter()
            .filter(|a| a.automatic)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn publish(&self, announcement: &Announcement) -> PlatformResult<()> {
        self.published.lock().push(announcement.clone());
        Ok(())
    }
}
