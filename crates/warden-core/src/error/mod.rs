//! Domain errors - error types for the moderation core

mod moderation_error;
mod platform_error;

pub use moderation_error::ModerationError;
pub use platform_error::PlatformError;
