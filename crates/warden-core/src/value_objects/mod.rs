//! Value objects - identifier newtypes shared across the domain

mod action_id;
mod snowflake;

pub use action_id::ActionId;
pub use snowflake::{Snowflake, SnowflakeParseError, SYSTEM_ACTOR};
