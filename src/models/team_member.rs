//! Team member registry model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Global registry of users recognized as internal staff, keyed uniquely
/// by Telegram user id. Rows are deactivated when the user leaves the team
/// source group, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TeamMember {
    pub id: i64,
    pub telegram_id: i64,
    pub display_name: String,
    pub username: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeamMemberRequest {
    pub telegram_id: i64,
    pub display_name: String,
    pub username: Option<String>,
}
