//! Expiration scheduler
//!
//! Owns a bounded, in-memory set of timers for actions expiring within a
//! near horizon, refreshed periodically from the store. Fires expirations
//! (external deactivation, then store closure) and retries failures at a
//! fixed interval until they succeed or the action is suspended.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use warden_common::SchedulerSettings;
use warden_core::entities::{Action, ExpiringAction};
use warden_core::time::now_millis;
use warden_core::traits::{Activation, Announcement};
use warden_core::value_objects::ActionId;

use super::context::ModContext;

/// Scheduler timing configuration
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    /// Only expirations within this window get in-memory timers; the
    /// periodic rescan runs at this same interval
    pub horizon: Duration,
    /// Fixed delay between retries of a failed expiration
    pub retry_delay: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            horizon: Duration::from_secs(120 * 60),
            retry_delay: Duration::from_secs(5 * 60),
        }
    }
}

impl From<&SchedulerSettings> for SchedulerConfig {
    fn from(settings: &SchedulerSettings) -> Self {
        Self {
            horizon: Duration::from_secs(settings.horizon_minutes * 60),
            retry_delay: Duration::from_secs(settings.retry_minutes * 60),
        }
    }
}

/// All mutable scheduler state, behind one lock
struct SchedulerInner {
    running: bool,
    timers: HashMap<ActionId, JoinHandle<()>>,
    rescan: Option<JoinHandle<()>>,
}

/// Horizon-bounded expiration scheduler for one moderated community
pub struct ExpirationScheduler {
    ctx: Arc<ModContext>,
    config: SchedulerConfig,
    inner: Mutex<SchedulerInner>,
}

impl ExpirationScheduler {
    /// Create a new scheduler; call [`start`](Self::start) to arm it
    pub fn new(ctx: Arc<ModContext>, config: SchedulerConfig) -> Self {
        Self {
            ctx,
            config,
            inner: Mutex::new(SchedulerInner {
                running: false,
                timers: HashMap::new(),
                rescan: None,
            }),
        }
    }

    fn horizon_ms(&self) -> i64 {
        i64::try_from(self.config.horizon.as_millis()).unwrap_or(i64::MAX)
    }

    /// Start on connect: idempotently re-apply every still-current Active
    /// action, then begin periodic rescans (the first runs immediately).
    #[instrument(skip(self))]
    pub async fn start(self: &Arc<Self>) {
        {
            let mut inner = self.inner.lock().await;
            if inner.running {
                return;
            }
            inner.running = true;
        }

        self.reactivate_all().await;

        let scheduler = Arc::clone(self);
        let horizon = self.config.horizon;
        let handle = tokio::spawn(async move {
            loop {
                scheduler.rescan().await;
                tokio::time::sleep(horizon).await;
            }
        });

        let mut inner = self.inner.lock().await;
        inner.rescan = Some(handle);
        info!("expiration scheduler started");
    }

    /// Stop on disconnect: purely in-memory teardown. The store is
    /// untouched, so the next start reconstructs the same schedule.
    #[instrument(skip(self))]
    pub async fn stop(&self) {
        let mut inner = self.inner.lock().await;
        inner.running = false;
        if let Some(handle) = inner.rescan.take() {
            handle.abort();
        }
        for (_, handle) in inner.timers.drain() {
            handle.abort();
        }
        info!("expiration scheduler stopped");
    }

    /// Consider a freshly created action for scheduling.
    ///
    /// Out-of-horizon and non-expiring actions are ignored; the periodic
    /// rescan picks the former up once they come near.
    pub async fn on_new_action(self: &Arc<Self>, action: &Action) {
        if action.expiration <= 0 {
            return;
        }
        if now_millis() + self.horizon_ms() < action.expiration {
            return;
        }

        let mut inner = self.inner.lock().await;
        if !inner.running {
            return;
        }

        // A rescan or suspension may have closed it between the caller's
        // commit and this lock acquisition
        match self.ctx.store().is_still_expiring(action.id).await {
            Ok(true) => self.schedule_locked(&mut inner, ExpiringAction::from(action)),
            Ok(false) => {}
            Err(e) => {
                warn!(action_id = %action.id, error = %e, "expiring re-check failed");
            }
        }
    }

    /// Cancel the pending timer for a suspended action, if any
    pub async fn on_action_suspension(&self, id: ActionId) {
        let mut inner = self.inner.lock().await;
        if let Some(handle) = inner.timers.remove(&id) {
            handle.abort();
            debug!(action_id = %id, "cancelled timer for suspended action");
        }
    }

    /// Number of armed timers (status queries)
    pub async fn pending_timers(&self) -> usize {
        self.inner.lock().await.timers.len()
    }

    async fn rescan(self: &Arc<Self>) {
        let before = now_millis() + self.horizon_ms();
        let expiring = match self.ctx.store().expiring_actions(before).await {
            Ok(expiring) => expiring,
            Err(e) => {
                warn!(error = %e, "expiration rescan query failed");
                return;
            }
        };

        let mut inner = self.inner.lock().await;
        if !inner.running {
            return;
        }
        for action in expiring {
            self.schedule_locked(&mut inner, action);
        }
    }

    fn schedule_locked(self: &Arc<Self>, inner: &mut SchedulerInner, action: ExpiringAction) {
        if inner.timers.contains_key(&action.id) {
            return;
        }

        let delay = action.expiration - now_millis();
        let scheduler = Arc::clone(self);
        let retry_delay = self.config.retry_delay;
        let id = action.id;

        let handle = tokio::spawn(async move {
            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(u64::try_from(delay).unwrap_or(0))).await;
            }
            while !scheduler.try_expire(&action).await {
                tokio::time::sleep(retry_delay).await;
            }
        });

        inner.timers.insert(id, handle);
        debug!(action_id = %id, delay_ms = delay.max(0), "expiration scheduled");
    }

    /// One expiration attempt. Returns false when it should be retried.
    async fn try_expire(&self, action: &ExpiringAction) -> bool {
        {
            let inner = self.inner.lock().await;
            if !inner.running {
                return true;
            }
        }

        let reset_data = action.data.map(|d| d.reset_data);
        if let Err(e) = action
            .ty
            .deactivate(
                self.ctx.platform(),
                self.ctx.resolver(),
                action.target_id,
                reset_data,
                None,
            )
            .await
        {
            warn!(action_id = %action.id, error = %e, "expiration deactivation failed, retrying");
            return false;
        }

        match self.ctx.store().expire_action(action.id).await {
            Ok(true) => {
                info!(action_id = %action.id, ty = %action.ty, "action expired");
                self.announce(Announcement {
                    action_id: Some(action.id),
                    ty: action.ty,
                    target_id: action.target_id,
                    reversal: true,
                    automatic: true,
                    expiration: 0,
                    reason: None,
                })
                .await;
            }
            Ok(false) => {
                // a concurrent suspension closed it first; nothing to announce
                debug!(action_id = %action.id, "expiration lost race to suspension");
            }
            Err(e) => {
                warn!(action_id = %action.id, error = %e, "expiration store closure failed, retrying");
                return false;
            }
        }

        let mut inner = self.inner.lock().await;
        inner.timers.remove(&action.id);
        true
    }

    /// Idempotently re-apply every Active action that is permanent or not
    /// yet past due, tolerating per-entry failures
    async fn reactivate_all(&self) {
        let active = match self.ctx.store().active_actions().await {
            Ok(active) => active,
            Err(e) => {
                warn!(error = %e, "start-up active sweep failed");
                return;
            }
        };

        let now = now_millis();
        for action in active {
            if action.expiration >= 0 && action.expiration <= now {
                // past due; the first rescan expires it
                continue;
            }

            let data = action.data.map_or(0, |d| d.data);
            match action
                .ty
                .activate(
                    self.ctx.platform(),
                    self.ctx.resolver(),
                    action.target_id,
                    false,
                    data,
                    action.reason.as_deref(),
                )
                .await
            {
                Ok(Activation::Applied { .. }) => {}
                Ok(Activation::NotApplicable) => {
                    warn!(action_id = %action.id, "re-activation no longer applicable");
                }
                Err(e) => {
                    warn!(action_id = %action.id, error = %e, "re-activation failed");
                }
            }
        }
    }

    async fn announce(&self, announcement: Announcement) {
        if let Err(e) = self.ctx.notifier().publish(&announcement).await {
            warn!(error = %e, "failed to publish announcement");
        }
    }
}
