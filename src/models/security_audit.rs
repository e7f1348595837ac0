//! Security audit model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Append-only record of a rejected bot-add attempt.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SecurityAuditEntry {
    pub id: i64,
    pub config_id: i64,
    pub telegram_id: i64,
    pub display_name: String,
    pub username: Option<String>,
    pub chat_id: i64,
    pub group_title: String,
    pub attempt_type: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSecurityAuditRequest {
    pub config_id: i64,
    pub telegram_id: i64,
    pub display_name: String,
    pub username: Option<String>,
    pub chat_id: i64,
    pub group_title: String,
    pub attempt_type: String,
}
