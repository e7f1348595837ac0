//! Configuration management module
//!
//! This module handles loading and validating application settings

pub mod settings;
pub mod validation;

pub use settings::{BotSettings, DatabaseConfig, LoggingConfig, Settings, TelegramSettings};
