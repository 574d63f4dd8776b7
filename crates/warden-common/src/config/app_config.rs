//! Application configuration structs
//!
//! Loads configuration from environment variables and an optional .env file.

use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WardenConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub scheduler: SchedulerSettings,
    pub moderation: ModerationSettings,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Expiration scheduler settings
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerSettings {
    /// Only actions expiring within this many minutes get in-memory timers
    #[serde(default = "default_horizon_minutes")]
    pub horizon_minutes: u64,
    /// Delay before retrying a failed expiration
    #[serde(default = "default_retry_minutes")]
    pub retry_minutes: u64,
}

/// Moderation behavior settings
#[derive(Debug, Clone, Deserialize)]
pub struct ModerationSettings {
    /// The guild this instance moderates
    pub guild_id: i64,
    /// Appended to direct notifications for appealable actions
    #[serde(default = "default_appeal_message")]
    pub appeal_message: String,
}

// Default value functions
fn default_app_name() -> String {
    "warden".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_max_connections() -> u32 {
    5
}

fn default_horizon_minutes() -> u64 {
    120
}

fn default_retry_minutes() -> u64 {
    5
}

fn default_appeal_message() -> String {
    "Contact the moderation team to appeal this action.".to_string()
}

impl WardenConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_max_connections),
            },
            scheduler: SchedulerSettings {
                horizon_minutes: env::var("EXPIRATION_HORIZON_MINUTES")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_horizon_minutes),
                retry_minutes: env::var("EXPIRATION_RETRY_MINUTES")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_retry_minutes),
            },
            moderation: ModerationSettings {
                guild_id: env::var("GUILD_ID")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .ok_or(ConfigError::MissingVar("GUILD_ID"))?,
                appeal_message: env::var("APPEAL_MESSAGE")
                    .unwrap_or_else(|_| default_appeal_message()),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
