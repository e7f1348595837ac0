//! GroupGuard Telegram Bot
//!
//! A monitoring bot for Telegram groups. This library ingests updates from
//! the Bot API, reconciles them into a persistent model of groups, members
//! and messages, and drives the setup workflow for bringing the bot online
//! in new groups behind an authorization gate.

pub mod config;
pub mod database;
pub mod models;
pub mod services;
pub mod telegram;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{GroupGuardError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use services::ServiceFactory;
pub use telegram::{HttpTelegramApi, TelegramApi};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
