//! Action database models

use sqlx::FromRow;

/// Full action row joined with its optional data and suspension sub-records
#[derive(Debug, Clone, FromRow)]
pub struct ActionRow {
    pub id: i64,
    pub kind: String,
    #[sqlx(rename = "type")]
    pub ty: String,
    pub target_id: i64,
    pub actor_id: i64,
    pub created_at: i64,
    pub expiration: i64,
    pub reason: Option<String>,
    pub prev_id: Option<i64>,
    pub data: Option<i64>,
    pub reset_data: Option<i64>,
    pub suspender_id: Option<i64>,
    pub suspended_at: Option<i64>,
    pub suspension_reason: Option<String>,
}

/// Row of the Active index joined with the action it points at
#[derive(Debug, Clone, FromRow)]
pub struct ActiveRow {
    pub id: i64,
    pub kind: String,
    #[sqlx(rename = "type")]
    pub ty: String,
    pub target_id: i64,
    pub expiration: i64,
    pub reason: Option<String>,
    pub data: Option<i64>,
    pub reset_data: Option<i64>,
}

/// Row of the Expiring index joined with the action it points at
#[derive(Debug, Clone, FromRow)]
pub struct ExpiringRow {
    pub id: i64,
    pub kind: String,
    #[sqlx(rename = "type")]
    pub ty: String,
    pub target_id: i64,
    pub expiration: i64,
    pub data: Option<i64>,
    pub reset_data: Option<i64>,
}
