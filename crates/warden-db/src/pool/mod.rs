//! Connection pool management

mod sqlite;

pub use sqlite::{create_memory_pool, create_pool, init_schema};
pub use sqlx::SqlitePool;
