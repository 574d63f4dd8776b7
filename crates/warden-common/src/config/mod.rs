//! Configuration module

mod app_config;

pub use app_config::{
    AppSettings, ConfigError, DatabaseConfig, Environment, ModerationSettings, SchedulerSettings,
    WardenConfig,
};
