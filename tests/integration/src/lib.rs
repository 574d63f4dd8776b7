//! Integration test utilities for the moderation lifecycle
//!
//! Provides an in-memory mock platform, identity resolver, and recording
//! announcement sink, plus a harness wiring them to a real SQLite-backed
//! store, coordinator, and scheduler.

pub mod harness;
pub mod mocks;

pub use harness::*;
pub use mocks::*;
