//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{GroupGuardError, Result};

use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_telegram_config(&settings.telegram)?;
    validate_database_config(&settings.database)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotSettings) -> Result<()> {
    if config.name.is_empty() {
        return Err(GroupGuardError::Config(
            "Bot configuration name is required".to_string(),
        ));
    }

    if config.token.is_empty() {
        return Err(GroupGuardError::Config("Bot token is required".to_string()));
    }

    // Bot API tokens look like "<bot_id>:<secret>"; the numeric prefix is
    // what the setup machine uses for the bot's own admin-status check.
    match config.token.split_once(':') {
        Some((id, _)) if id.parse::<i64>().is_ok() => {}
        _ => {
            return Err(GroupGuardError::Config(
                "Bot token must start with the numeric bot id followed by ':'".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validate Telegram transport configuration
fn validate_telegram_config(config: &super::TelegramSettings) -> Result<()> {
    if config.api_url.is_empty() {
        return Err(GroupGuardError::Config(
            "Telegram API URL is required".to_string(),
        ));
    }

    if url::Url::parse(&config.api_url).is_err() {
        return Err(GroupGuardError::Config(format!(
            "Invalid Telegram API URL: {}",
            config.api_url
        )));
    }

    if config.poll_interval_seconds == 0 {
        return Err(GroupGuardError::Config(
            "Poll interval must be greater than 0".to_string(),
        ));
    }

    if config.request_timeout_seconds <= config.long_poll_timeout_seconds {
        return Err(GroupGuardError::Config(
            "Request timeout must exceed the long poll timeout".to_string(),
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(GroupGuardError::Config(
            "Database URL is required".to_string(),
        ));
    }

    if config.max_connections == 0 {
        return Err(GroupGuardError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(GroupGuardError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(GroupGuardError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_fail_without_token() {
        let settings = Settings::default();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_valid_settings_pass() {
        let mut settings = Settings::default();
        settings.bot.token = "123456:test-secret".to_string();
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_token_without_bot_id_rejected() {
        let mut settings = Settings::default();
        settings.bot.token = "not-a-token".to_string();
        assert!(validate_settings(&settings).is_err());
    }
}
