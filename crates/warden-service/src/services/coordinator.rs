//! Action coordinator
//!
//! Orchestrates applying and suspending actions: conflict detection and
//! precedence resolution against the current Active record, external-effect
//! invocation ordering, persistence, and scheduler notification.

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use warden_core::duration::parse_action_duration_ms;
use warden_core::entities::{Action, ActionData, ActiveAction, NewAction};
use warden_core::traits::{Activation, Announcement};
use warden_core::types::{ActionKind, ActionType};
use warden_core::value_objects::{ActionId, Snowflake};
use warden_core::ModerationError;

use super::context::ModContext;
use super::scheduler::ExpirationScheduler;
use super::ServiceResult;

/// Parameters for applying a new action
#[derive(Debug, Clone)]
pub struct ApplyRequest {
    pub ty: ActionType,
    pub target_id: Snowflake,
    pub actor_id: Snowflake,
    /// Graded payload for types whose effect has a magnitude
    pub data: Option<i64>,
    /// Operator duration string, e.g. "30m", "4h30", "perm"
    pub duration: Option<String>,
    pub reason: Option<String>,
}

/// Orchestrates the apply and suspend flows
pub struct ActionCoordinator {
    ctx: Arc<ModContext>,
    scheduler: Arc<ExpirationScheduler>,
}

impl ActionCoordinator {
    /// Create a new ActionCoordinator
    pub fn new(ctx: Arc<ModContext>, scheduler: Arc<ExpirationScheduler>) -> Self {
        Self { ctx, scheduler }
    }

    /// Apply a new action to a target.
    ///
    /// Resolves conflicts with the current Active record for the same
    /// `(target, type)` pair, performs the external effect, persists the
    /// record, and notifies the scheduler. Returns the persisted action;
    /// for a downgrade that collapses into a suspension, the returned
    /// action is the (now suspended) original.
    #[instrument(skip(self, request), fields(ty = %request.ty, target = %request.target_id))]
    pub async fn apply(&self, request: ApplyRequest) -> ServiceResult<Action> {
        let ty = request.ty;
        let data = request.data.unwrap_or(0);

        let mut prev_id = None;
        let mut carried_reset = None;

        if ty.has_duration() {
            if let Some(existing) = self
                .ctx
                .store()
                .active_action(request.target_id, ty)
                .await?
            {
                let existing_data = existing.data.map_or(0, |d| d.data);
                let existing_reset = existing.data.map_or(0, |d| d.reset_data);

                match ty.compare_data(existing_data, data) {
                    Ordering::Equal => {
                        return Err(ModerationError::AlreadyActive {
                            kind: ty.kind(),
                            desc: ty.desc(false),
                        });
                    }
                    Ordering::Greater if !ty.check_data(data, existing_reset) => {
                        // The new value does not exceed the chain's baseline:
                        // a downgrade collapses into a plain suspension of
                        // the existing action
                        let existing_id = existing.id;
                        self.suspend(
                            ty,
                            request.target_id,
                            request.actor_id,
                            request.reason.as_deref(),
                        )
                        .await?;

                        return self.ctx.store().action(existing_id).await?.ok_or_else(|| {
                            ModerationError::Inconsistent(format!(
                                "suspended action {existing_id} has no base record"
                            ))
                        });
                    }
                    _ => {
                        // New action supersedes; the chain's reset baseline
                        // carries forward
                        self.supersede(&existing).await?;
                        prev_id = Some(existing.id);
                        carried_reset = existing.data.map(|d| d.reset_data);
                    }
                }
            } else if ty.kind() == ActionKind::Channel
                && ty
                    .is_active(
                        self.ctx.platform(),
                        self.ctx.resolver(),
                        request.target_id,
                        data,
                    )
                    .await?
            {
                // no record of ours, but the live state already matches
                return Err(ModerationError::AlreadyActive {
                    kind: ty.kind(),
                    desc: ty.desc(false),
                });
            }
        }

        let duration_ms = if ty.has_duration() {
            parse_action_duration_ms(request.duration.as_deref(), true)?
        } else {
            0
        };

        let activation = ty
            .activate(
                self.ctx.platform(),
                self.ctx.resolver(),
                request.target_id,
                false,
                data,
                request.reason.as_deref(),
            )
            .await?;

        let (affected, activation_reset) = match activation {
            Activation::NotApplicable => return Err(ModerationError::NotApplicable),
            Activation::Applied {
                affected,
                reset_data,
            } => (affected, reset_data),
        };

        if ty.requires_target_presence() && affected == 0 {
            return Err(ModerationError::AbsentTarget);
        }

        let action_data = match ty.kind() {
            ActionKind::Channel => Some(ActionData {
                data,
                reset_data: carried_reset.unwrap_or(activation_reset),
            }),
            ActionKind::User => None,
        };

        let action = self
            .ctx
            .store()
            .create_action(NewAction {
                ty,
                target_id: request.target_id,
                actor_id: request.actor_id,
                data: action_data,
                duration_ms,
                reason: request.reason.clone(),
                prev_id,
            })
            .await?;

        // The target may have re-entered the platform between the first
        // activation and the commit; re-invoke so the effect is in place
        // before we return. Failures here are logged, not surfaced.
        if let Err(e) = ty
            .activate(
                self.ctx.platform(),
                self.ctx.resolver(),
                request.target_id,
                false,
                data,
                request.reason.as_deref(),
            )
            .await
        {
            warn!(action_id = %action.id, error = %e, "post-commit re-activation failed");
        }

        self.scheduler.on_new_action(&action).await;

        info!(action_id = %action.id, expiration = action.expiration, "action applied");

        self.announce(Announcement {
            action_id: Some(action.id),
            ty,
            target_id: request.target_id,
            reversal: false,
            automatic: false,
            expiration: action.expiration,
            reason: action.reason.clone(),
        })
        .await;

        Ok(action)
    }

    /// Manually suspend the Active action of `ty` on a target.
    ///
    /// When no persisted record exists (or it is already suspended), types
    /// that can be reverted from observed external state alone still get a
    /// best-effort deactivation; everything else fails as unmanaged.
    #[instrument(skip(self, reason))]
    pub async fn suspend(
        &self,
        ty: ActionType,
        target_id: Snowflake,
        actor_id: Snowflake,
        reason: Option<&str>,
    ) -> ServiceResult<()> {
        if !ty.has_duration() {
            return Err(ModerationError::NotSuspendable);
        }

        let active = self.ctx.store().active_action(target_id, ty).await?;

        let (action_id, reset_data) = match &active {
            Some(active) => {
                let suspended = self
                    .ctx
                    .store()
                    .suspend_action(active.id, actor_id, reason)
                    .await?;

                if suspended {
                    self.scheduler.on_action_suspension(active.id).await;
                } else {
                    // a concurrent path closed it first
                    self.verify_revertable(ty, target_id).await?;
                }

                (Some(active.id), active.data.map(|d| d.reset_data))
            }
            None => {
                self.verify_revertable(ty, target_id).await?;
                (None, None)
            }
        };

        ty.deactivate(
            self.ctx.platform(),
            self.ctx.resolver(),
            target_id,
            reset_data,
            reason,
        )
        .await?;

        info!(?action_id, "action suspended");

        self.announce(Announcement {
            action_id,
            ty,
            target_id,
            reversal: true,
            automatic: false,
            expiration: 0,
            reason: reason.map(String::from),
        })
        .await;

        Ok(())
    }

    /// The current Active action for a target, if any
    pub async fn active_action(
        &self,
        target_id: Snowflake,
        ty: ActionType,
    ) -> ServiceResult<Option<ActiveAction>> {
        self.ctx.store().active_action(target_id, ty).await
    }

    /// Fetch a single action by id
    pub async fn action(&self, id: ActionId) -> ServiceResult<Option<Action>> {
        self.ctx.store().action(id).await
    }

    /// Full history for a target, newest first
    pub async fn actions_for_target(
        &self,
        kind: ActionKind,
        target_id: Snowflake,
    ) -> ServiceResult<Vec<Action>> {
        self.ctx.store().actions_for_target(kind, target_id).await
    }

    /// Close an Active record because a stronger action replaces it. Only
    /// the record is closed; the external effect is overwritten by the
    /// successor's activation.
    async fn supersede(&self, existing: &ActiveAction) -> ServiceResult<()> {
        let suspended = self
            .ctx
            .store()
            .suspend_action(existing.id, warden_core::SYSTEM_ACTOR, Some("superseded"))
            .await?;

        if suspended {
            self.scheduler.on_action_suspension(existing.id).await;
        }

        Ok(())
    }

    async fn verify_revertable(&self, ty: ActionType, target_id: Snowflake) -> ServiceResult<()> {
        if !ty.can_revert_beyond_db() {
            return Err(ModerationError::NotManaged {
                kind: ty.kind(),
                desc: ty.desc(false),
            });
        }

        let live = ty
            .is_active(self.ctx.platform(), self.ctx.resolver(), target_id, 0)
            .await?;

        if live {
            Ok(())
        } else {
            Err(ModerationError::NotActive {
                kind: ty.kind(),
                desc: ty.desc(false),
            })
        }
    }

    /// Sink failures never roll back the action they describe
    async fn announce(&self, announcement: Announcement) {
        if let Err(e) = self.ctx.notifier().publish(&announcement).await {
            warn!(error = %e, "failed to publish announcement");
        }
    }
}
