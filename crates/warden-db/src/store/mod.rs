//! Store implementations

mod error;
mod sqlite;

pub use error::map_db_error;
pub use sqlite::SqliteActionStore;
