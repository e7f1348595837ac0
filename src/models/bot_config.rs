//! Bot configuration model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One bot deployment: token, polling offset and monitor wiring.
///
/// `last_update_id` is monotonically non-decreasing; 0 means no update has
/// been processed yet.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BotConfig {
    pub id: i64,
    pub name: String,
    pub bot_token: String,
    pub is_active: bool,
    pub last_update_id: i64,
    pub owner_telegram_id: Option<i64>,
    pub team_group_chat_id: Option<i64>,
    pub alerts_chat_id: Option<i64>,
    pub audit_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BotConfig {
    /// The bot's own user id, parsed from the `<bot_id>:<secret>` token shape.
    pub fn bot_user_id(&self) -> Option<i64> {
        self.bot_token
            .split_once(':')
            .and_then(|(id, _)| id.parse::<i64>().ok())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBotConfigRequest {
    pub name: String,
    pub bot_token: String,
    pub owner_telegram_id: Option<i64>,
    pub team_group_chat_id: Option<i64>,
    pub alerts_chat_id: Option<i64>,
    pub audit_enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_token(token: &str) -> BotConfig {
        BotConfig {
            id: 1,
            name: "test".to_string(),
            bot_token: token.to_string(),
            is_active: true,
            last_update_id: 0,
            owner_telegram_id: None,
            team_group_chat_id: None,
            alerts_chat_id: None,
            audit_enabled: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_bot_user_id_from_token() {
        assert_eq!(
            config_with_token("123456:ABC-secret").bot_user_id(),
            Some(123456)
        );
        assert_eq!(config_with_token("garbage").bot_user_id(), None);
        assert_eq!(config_with_token("abc:def").bot_user_id(), None);
    }
}
