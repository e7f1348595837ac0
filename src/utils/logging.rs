//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging
//! utilities for the GroupGuard application.

use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file writer on drop; the caller must
/// keep it alive for the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "groupguard.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log a security event (rejected bot addition, forced departure)
pub fn log_security_event(config_id: i64, user_id: i64, chat_id: i64, event: &str) {
    warn!(
        config_id = config_id,
        user_id = user_id,
        chat_id = chat_id,
        event = event,
        "Security event recorded"
    );
}

/// Log a poll cycle summary
pub fn log_poll_cycle(config_id: i64, updates: usize, last_update_id: i64) {
    info!(
        config_id = config_id,
        updates = updates,
        last_update_id = last_update_id,
        "Poll cycle completed"
    );
}

/// Log a group lifecycle event
pub fn log_group_event(chat_id: i64, event: &str, user_id: Option<i64>) {
    info!(
        chat_id = chat_id,
        event = event,
        user_id = user_id,
        "Group event occurred"
    );
}
