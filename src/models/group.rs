//! Group model and setup lifecycle state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Setup lifecycle of a monitored group.
///
/// `Failed` is a declared terminal state; nothing transitions into it
/// automatically today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SetupStatus {
    Pending,
    Complete,
    Failed,
}

impl SetupStatus {
    /// Whether a guarded transition from `self` to `next` is allowed.
    pub fn can_transition_to(self, next: SetupStatus) -> bool {
        matches!(
            (self, next),
            (SetupStatus::Pending, SetupStatus::Complete)
                | (SetupStatus::Pending, SetupStatus::Failed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SetupStatus::Pending => "pending",
            SetupStatus::Complete => "complete",
            SetupStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for SetupStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Telegram group chat monitored by one bot configuration.
///
/// (chat_id, config_id) is unique.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Group {
    pub id: i64,
    pub config_id: i64,
    pub chat_id: i64,
    pub title: String,
    pub chat_type: String,
    pub setup_status: SetupStatus,
    pub setup_started_at: Option<DateTime<Utc>>,
    pub setup_completed_at: Option<DateTime<Utc>>,
    pub setup_duration_minutes: Option<i64>,
    pub added_by_telegram_id: Option<i64>,
    pub invite_link: Option<String>,
    pub invite_link_created_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGroupRequest {
    pub config_id: i64,
    pub chat_id: i64,
    pub title: String,
    pub chat_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_guard() {
        assert!(SetupStatus::Pending.can_transition_to(SetupStatus::Complete));
        assert!(SetupStatus::Pending.can_transition_to(SetupStatus::Failed));
        assert!(!SetupStatus::Complete.can_transition_to(SetupStatus::Pending));
        assert!(!SetupStatus::Complete.can_transition_to(SetupStatus::Complete));
        assert!(!SetupStatus::Failed.can_transition_to(SetupStatus::Complete));
    }
}
