//! SQLite implementation of ActionStore

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::instrument;

use warden_core::entities::{
    compute_expiration, Action, ActionData, ActiveAction, ExpiringAction, NewAction, Suspension,
    EXPIRATION_NONE,
};
use warden_core::time::now_millis;
use warden_core::traits::{ActionStore, RepoResult};
use warden_core::types::{ActionKind, ActionType};
use warden_core::value_objects::{ActionId, Snowflake};

use crate::models::{ActionRow, ActiveRow, ExpiringRow};

use super::error::map_db_error;

/// SQLite implementation of ActionStore
#[derive(Clone)]
pub struct SqliteActionStore {
    pool: SqlitePool,
}

impl SqliteActionStore {
    /// Create a new SqliteActionStore
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn action_from_row(row: ActionRow) -> RepoResult<Action> {
    let kind = ActionKind::parse(&row.kind)?;
    let ty = ActionType::get(kind, &row.ty)?;

    let data = match (row.data, row.reset_data) {
        (Some(data), Some(reset_data)) => Some(ActionData { data, reset_data }),
        _ => None,
    };

    let suspension = match (row.suspender_id, row.suspended_at) {
        (Some(suspender_id), Some(time)) => Some(Suspension {
            suspender_id: Snowflake::new(suspender_id),
            time,
            reason: row.suspension_reason,
        }),
        _ => None,
    };

    Ok(Action {
        id: ActionId::new(row.id),
        ty,
        target_id: Snowflake::new(row.target_id),
        actor_id: Snowflake::new(row.actor_id),
        created_at: row.created_at,
        expiration: row.expiration,
        reason: row.reason,
        data,
        prev_id: row.prev_id.map(ActionId::new),
        suspension,
    })
}

fn active_from_row(row: ActiveRow) -> RepoResult<ActiveAction> {
    let kind = ActionKind::parse(&row.kind)?;
    let ty = ActionType::get(kind, &row.ty)?;

    let data = match (row.data, row.reset_data) {
        (Some(data), Some(reset_data)) => Some(ActionData { data, reset_data }),
        _ => None,
    };

    Ok(ActiveAction {
        id: ActionId::new(row.id),
        ty,
        target_id: Snowflake::new(row.target_id),
        data,
        expiration: row.expiration,
        reason: row.reason,
    })
}

fn expiring_from_row(row: ExpiringRow) -> RepoResult<ExpiringAction> {
    let kind = ActionKind::parse(&row.kind)?;
    let ty = ActionType::get(kind, &row.ty)?;

    let data = match (row.data, row.reset_data) {
        (Some(data), Some(reset_data)) => Some(ActionData { data, reset_data }),
        _ => None,
    };

    Ok(ExpiringAction {
        id: ActionId::new(row.id),
        ty,
        target_id: Snowflake::new(row.target_id),
        data,
        expiration: row.expiration,
    })
}

const ACTION_SELECT: &str = r"
    SELECT a.id, a.kind, a.type, a.target_id, a.actor_id, a.created_at,
           a.expiration, a.reason, a.prev_id,
           d.data, d.reset_data,
           s.suspender_id, s.time AS suspended_at, s.reason AS suspension_reason
    FROM actions a
    LEFT JOIN action_data d ON d.action_id = a.id
    LEFT JOIN action_suspensions s ON s.action_id = a.id
";

#[async_trait]
impl ActionStore for SqliteActionStore {
    #[instrument(skip(self))]
    async fn create_action(&self, new: NewAction) -> RepoResult<Action> {
        let created_at = now_millis();
        let expiration = if new.ty.has_duration() {
            compute_expiration(created_at, new.duration_ms)
        } else {
            EXPIRATION_NONE
        };

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let result = sqlx::query(
            r"
            INSERT INTO actions (kind, type, target_id, actor_id, created_at, expiration, reason, prev_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(new.ty.kind().id())
        .bind(new.ty.id())
        .bind(new.target_id.into_inner())
        .bind(new.actor_id.into_inner())
        .bind(created_at)
        .bind(expiration)
        .bind(new.reason.as_deref())
        .bind(new.prev_id.map(ActionId::into_inner))
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let id = ActionId::new(result.last_insert_rowid());

        if let Some(data) = new.data {
            sqlx::query(
                r"
                INSERT INTO action_data (action_id, data, reset_data)
                VALUES (?, ?, ?)
                ",
            )
            .bind(id.into_inner())
            .bind(data.data)
            .bind(data.reset_data)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        if new.ty.has_duration() {
            sqlx::query(
                r"
                INSERT OR REPLACE INTO active_actions (kind, type, target_id, action_id)
                VALUES (?, ?, ?, ?)
                ",
            )
            .bind(new.ty.kind().id())
            .bind(new.ty.id())
            .bind(new.target_id.into_inner())
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

            if expiration > 0 {
                sqlx::query(
                    r"
                    INSERT INTO expiring_actions (action_id, expiration)
                    VALUES (?, ?)
                    ",
                )
                .bind(id.into_inner())
                .bind(expiration)
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
            }
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(Action {
            id,
            ty: new.ty,
            target_id: new.target_id,
            actor_id: new.actor_id,
            created_at,
            expiration,
            reason: new.reason,
            data: new.data,
            prev_id: new.prev_id,
            suspension: None,
        })
    }

    #[instrument(skip(self))]
    async fn suspend_action(
        &self,
        id: ActionId,
        suspender_id: Snowflake,
        reason: Option<&str>,
    ) -> RepoResult<bool> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let result = sqlx::query(
            r"
            INSERT OR IGNORE INTO action_suspensions (action_id, suspender_id, time, reason)
            VALUES (?, ?, ?, ?)
            ",
        )
        .bind(id.into_inner())
        .bind(suspender_id.into_inner())
        .bind(now_millis())
        .bind(reason)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        // Already suspended: the one-time sub-record wins, nothing changes
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("DELETE FROM active_actions WHERE action_id = ?")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        sqlx::query("DELETE FROM expiring_actions WHERE action_id = ?")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(true)
    }

    #[instrument(skip(self))]
    async fn expire_action(&self, id: ActionId) -> RepoResult<bool> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let result = sqlx::query("DELETE FROM expiring_actions WHERE action_id = ?")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        // A concurrent suspension or duplicate firing got here first
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("DELETE FROM active_actions WHERE action_id = ?")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(true)
    }

    #[instrument(skip(self))]
    async fn action(&self, id: ActionId) -> RepoResult<Option<Action>> {
        let row = sqlx::query_as::<_, ActionRow>(&format!("{ACTION_SELECT} WHERE a.id = ?"))
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        row.map(action_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn actions_for_target(
        &self,
        kind: ActionKind,
        target_id: Snowflake,
    ) -> RepoResult<Vec<Action>> {
        let rows = sqlx::query_as::<_, ActionRow>(&format!(
            "{ACTION_SELECT} WHERE a.kind = ? AND a.target_id = ? ORDER BY a.id DESC"
        ))
        .bind(kind.id())
        .bind(target_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(action_from_row).collect()
    }

    #[instrument(skip(self))]
    async fn active_action(
        &self,
        target_id: Snowflake,
        ty: ActionType,
    ) -> RepoResult<Option<ActiveAction>> {
        let row = sqlx::query_as::<_, ActiveRow>(
            r"
            SELECT a.id, a.kind, a.type, a.target_id, a.expiration, a.reason,
                   d.data, d.reset_data
            FROM active_actions act
            JOIN actions a ON a.id = act.action_id
            LEFT JOIN action_data d ON d.action_id = a.id
            WHERE act.kind = ? AND act.type = ? AND act.target_id = ?
            ",
        )
        .bind(ty.kind().id())
        .bind(ty.id())
        .bind(target_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(active_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn active_actions(&self) -> RepoResult<Vec<ActiveAction>> {
        let rows = sqlx::query_as::<_, ActiveRow>(
            r"
            SELECT a.id, a.kind, a.type, a.target_id, a.expiration, a.reason,
                   d.data, d.reset_data
            FROM active_actions act
            JOIN actions a ON a.id = act.action_id
            LEFT JOIN action_data d ON d.action_id = a.id
            ORDER BY a.id
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(active_from_row).collect()
    }

    #[instrument(skip(self))]
    async fn expiring_actions(&self, before: i64) -> RepoResult<Vec<ExpiringAction>> {
        let rows = sqlx::query_as::<_, ExpiringRow>(
            r"
            SELECT a.id, a.kind, a.type, a.target_id, e.expiration,
                   d.data, d.reset_data
            FROM expiring_actions e
            JOIN actions a ON a.id = e.action_id
            LEFT JOIN action_data d ON d.action_id = a.id
            WHERE e.expiration < ?
            ORDER BY e.expiration
            ",
        )
        .bind(before)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(expiring_from_row).collect()
    }

    #[instrument(skip(self))]
    async fn is_still_expiring(&self, id: ActionId) -> RepoResult<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM expiring_actions WHERE action_id = ?)",
        )
        .bind(id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }
}
