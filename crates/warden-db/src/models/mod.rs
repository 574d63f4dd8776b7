//! Database models

mod action;

pub use action::{ActionRow, ActiveRow, ExpiringRow};
