//! SQLite connection pool management and schema setup

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use warden_common::DatabaseConfig;

/// Create a new SQLite connection pool from configuration
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Create an in-memory pool for tests.
///
/// Limited to one connection so every handle sees the same database.
pub async fn create_memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
}

const SCHEMA: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS actions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        kind TEXT NOT NULL,
        type TEXT NOT NULL,
        target_id INTEGER NOT NULL,
        actor_id INTEGER NOT NULL,
        created_at INTEGER NOT NULL,
        expiration INTEGER NOT NULL,
        reason TEXT,
        prev_id INTEGER REFERENCES actions(id)
    )
    ",
    r"
    CREATE INDEX IF NOT EXISTS idx_actions_target ON actions(kind, target_id)
    ",
    r"
    CREATE TABLE IF NOT EXISTS action_data (
        action_id INTEGER PRIMARY KEY REFERENCES actions(id),
        data INTEGER NOT NULL,
        reset_data INTEGER NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS action_suspensions (
        action_id INTEGER PRIMARY KEY REFERENCES actions(id),
        suspender_id INTEGER NOT NULL,
        time INTEGER NOT NULL,
        reason TEXT
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS active_actions (
        kind TEXT NOT NULL,
        type TEXT NOT NULL,
        target_id INTEGER NOT NULL,
        action_id INTEGER NOT NULL REFERENCES actions(id),
        PRIMARY KEY (kind, type, target_id)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS expiring_actions (
        action_id INTEGER PRIMARY KEY REFERENCES actions(id),
        expiration INTEGER NOT NULL
    )
    ",
    r"
    CREATE INDEX IF NOT EXISTS idx_expiring_expiration ON expiring_actions(expiration)
    ",
];

/// Create all tables and indices if they do not exist yet
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
