//! Errors raised by the external platform client

use thiserror::Error;

/// Failure of a platform primitive (ban, role edit, channel update, ...).
///
/// These are always catchable: a platform call may fail transiently and be
/// retried, but it never panics the caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlatformError {
    /// The concrete entity disappeared between resolution and the call.
    /// Multi-account loops tolerate this variant silently.
    #[error("Target entity no longer exists")]
    TargetVanished,

    /// The platform could not be reached or timed out
    #[error("Platform unavailable: {0}")]
    Unavailable(String),

    /// The platform rejected the request (missing permission, invalid state)
    #[error("Platform request denied: {0}")]
    Denied(String),
}
