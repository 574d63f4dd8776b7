//! Domain entities - persisted moderation action records and their
//! derived projections

mod action;

pub use action::{
    compute_expiration, Action, ActionData, ActiveAction, ExpiringAction, NewAction, Suspension,
    EXPIRATION_NONE, EXPIRATION_PERMANENT,
};
