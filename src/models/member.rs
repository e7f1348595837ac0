//! Group member model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One user's membership in one group; (telegram_id, group_id) is unique.
///
/// Team membership is not stored here; it is a read-time lookup against the
/// global team registry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Member {
    pub id: i64,
    pub group_id: i64,
    pub telegram_id: i64,
    pub display_name: String,
    pub username: Option<String>,
    pub is_bot: bool,
    pub is_active: bool,
    pub joined_at: DateTime<Utc>,
    pub left_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMemberRequest {
    pub group_id: i64,
    pub telegram_id: i64,
    pub display_name: String,
    pub username: Option<String>,
    pub is_bot: bool,
}
