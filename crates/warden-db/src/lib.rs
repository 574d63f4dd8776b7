//! # warden-db
//!
//! Database layer implementing the action store trait with SQLite via SQLx.
//!
//! ## Overview
//!
//! This crate provides the SQLite implementation of the `ActionStore` trait
//! defined in `warden-core`. It handles:
//!
//! - Connection pool management and schema setup
//! - Database models with SQLx `FromRow` derives
//! - The store implementation with transactional mutations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use warden_common::DatabaseConfig;
//! use warden_db::{create_pool, init_schema, SqliteActionStore};
//!
//! async fn example(config: &DatabaseConfig) -> Result<(), sqlx::Error> {
//!     let pool = create_pool(config).await?;
//!     init_schema(&pool).await?;
//!     let store = SqliteActionStore::new(pool);
//!
//!     // Use the store...
//!     Ok(())
//! }
//! ```

pub mod models;
pub mod pool;
pub mod store;

// Re-export commonly used types
pub use pool::{create_memory_pool, create_pool, init_schema, SqlitePool};
pub use store::SqliteActionStore;
