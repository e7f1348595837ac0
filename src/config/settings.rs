//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub bot: BotSettings,
    pub telegram: TelegramSettings,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

/// Bot deployment configuration
///
/// Mirrors one `bot_configs` row; `main` makes sure a matching row exists
/// at startup so the poller has something to iterate over.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotSettings {
    pub name: String,
    pub token: String,
    /// Bot owner; always passes the authorization gate
    pub owner_id: Option<i64>,
    /// Chat whose membership defines the global team roster
    pub team_group_chat_id: Option<i64>,
    /// Chat that receives setup / security alerts
    pub alerts_chat_id: Option<i64>,
    /// Append a security audit row on rejected bot additions
    pub audit_enabled: bool,
}

/// Telegram transport configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelegramSettings {
    pub api_url: String,
    pub poll_interval_seconds: u64,
    pub long_poll_timeout_seconds: u64,
    pub request_timeout_seconds: u64,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("GROUPGUARD").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::GroupGuardError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot: BotSettings {
                name: "default".to_string(),
                token: String::new(),
                owner_id: None,
                team_group_chat_id: None,
                alerts_chat_id: None,
                audit_enabled: true,
            },
            telegram: TelegramSettings {
                api_url: "https://api.telegram.org".to_string(),
                poll_interval_seconds: 30,
                long_poll_timeout_seconds: 25,
                request_timeout_seconds: 30,
            },
            database: DatabaseConfig {
                url: "groupguard.db".to_string(),
                max_connections: 5,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "./logs".to_string(),
            },
        }
    }
}
