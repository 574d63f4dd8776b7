//! # warden-service
//!
//! Application layer orchestrating the action lifecycle: the coordinator
//! (apply/suspend with conflict resolution) and the expiration scheduler
//! (horizon-bounded timers with retry).

pub mod services;

// Re-export commonly used types at crate root
pub use services::{
    ActionCoordinator, ApplyRequest, ExpirationScheduler, ModContext, SchedulerConfig,
    ServiceResult,
};
