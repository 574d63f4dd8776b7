//! Services module

mod context;
mod coordinator;
mod scheduler;

pub use context::ModContext;
pub use coordinator::{ActionCoordinator, ApplyRequest};
pub use scheduler::{ExpirationScheduler, SchedulerConfig};

use warden_core::ModerationError;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ModerationError>;
