//! # warden-common
//!
//! Shared utilities: configuration loading and telemetry setup.

pub mod config;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    AppSettings, ConfigError, DatabaseConfig, Environment, ModerationSettings, SchedulerSettings,
    WardenConfig,
};
pub use telemetry::{init_tracing, init_tracing_with_config, try_init_tracing, TracingConfig};
