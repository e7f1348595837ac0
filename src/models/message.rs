//! Message model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One stored Telegram message; (message_id, group_id) is unique and rows
/// are immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: i64,
    pub group_id: i64,
    pub member_id: Option<i64>,
    pub message_id: i64,
    pub text: String,
    pub sent_at: DateTime<Utc>,
    pub is_reply: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMessageRequest {
    pub group_id: i64,
    pub member_id: Option<i64>,
    pub message_id: i64,
    pub text: String,
    pub sent_at: DateTime<Utc>,
    pub is_reply: bool,
}
