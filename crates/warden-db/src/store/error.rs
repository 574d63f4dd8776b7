//! Error handling utilities for the store

use sqlx::Error as SqlxError;
use warden_core::ModerationError;

/// Convert a SQLx error to a ModerationError
pub fn map_db_error(e: SqlxError) -> ModerationError {
    ModerationError::Database(e.to_string())
}
