//! Error handling for GroupGuard
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the GroupGuard application
#[derive(Error, Debug)]
pub enum GroupGuardError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] TelegramError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bot configuration not found: {config_id}")]
    ConfigNotFound { config_id: i64 },

    #[error("Group not found: chat {chat_id}")]
    GroupNotFound { chat_id: i64 },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Telegram Bot API specific errors
#[derive(Error, Debug)]
pub enum TelegramError {
    #[error("Telegram request failed: {0}")]
    RequestFailed(String),

    #[error("Telegram request timed out")]
    Timeout,

    #[error("Telegram API rejected the call: {0}")]
    ApiError(String),

    #[error("Invalid Telegram response: {0}")]
    InvalidResponse(String),
}

/// Result type alias for GroupGuard operations
pub type Result<T> = std::result::Result<T, GroupGuardError>;

/// Result type alias for Telegram API operations
pub type TelegramResult<T> = std::result::Result<T, TelegramError>;

impl GroupGuardError {
    /// Check if the error is recoverable on a later poll cycle
    pub fn is_recoverable(&self) -> bool {
        match self {
            GroupGuardError::Database(_) => false,
            GroupGuardError::Migration(_) => false,
            GroupGuardError::Telegram(_) => true,
            GroupGuardError::Config(_) => false,
            GroupGuardError::ConfigNotFound { .. } => false,
            GroupGuardError::GroupNotFound { .. } => false,
            GroupGuardError::InvalidStateTransition { .. } => false,
            GroupGuardError::Http(_) => true,
            GroupGuardError::Serialization(_) => false,
            GroupGuardError::Io(_) => true,
            GroupGuardError::InvalidInput(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telegram_errors_are_recoverable() {
        let err = GroupGuardError::Telegram(TelegramError::Timeout);
        assert!(err.is_recoverable());

        let err = GroupGuardError::InvalidStateTransition {
            from: "complete".to_string(),
            to: "pending".to_string(),
        };
        assert!(!err.is_recoverable());
    }
}
