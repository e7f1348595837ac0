//! Bot configuration repository implementation

use chrono::Utc;

use crate::database::connection::DatabasePool;
use crate::models::bot_config::{BotConfig, CreateBotConfigRequest};
use crate::utils::errors::GroupGuardError;

const COLUMNS: &str = "id, name, bot_token, is_active, last_update_id, owner_telegram_id, \
     team_group_chat_id, alerts_chat_id, audit_enabled, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct BotConfigRepository {
    pool: DatabasePool,
}

impl BotConfigRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Create a new bot configuration
    pub async fn create(&self, request: CreateBotConfigRequest) -> Result<BotConfig, GroupGuardError> {
        let now = Utc::now();
        let config = sqlx::query_as::<_, BotConfig>(&format!(
            r#"
            INSERT INTO bot_configs
                (name, bot_token, owner_telegram_id, team_group_chat_id, alerts_chat_id,
                 audit_enabled, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(request.name)
        .bind(request.bot_token)
        .bind(request.owner_telegram_id)
        .bind(request.team_group_chat_id)
        .bind(request.alerts_chat_id)
        .bind(request.audit_enabled)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(config)
    }

    /// Find configuration by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<BotConfig>, GroupGuardError> {
        let config = sqlx::query_as::<_, BotConfig>(&format!(
            "SELECT {COLUMNS} FROM bot_configs WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(config)
    }

    /// Find configuration by name
    pub async fn find_by_name(&self, name: &str) -> Result<Option<BotConfig>, GroupGuardError> {
        let config = sqlx::query_as::<_, BotConfig>(&format!(
            "SELECT {COLUMNS} FROM bot_configs WHERE name = ?"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(config)
    }

    /// List all active configurations
    pub async fn list_active(&self) -> Result<Vec<BotConfig>, GroupGuardError> {
        let configs = sqlx::query_as::<_, BotConfig>(&format!(
            "SELECT {COLUMNS} FROM bot_configs WHERE is_active = TRUE ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(configs)
    }

    /// Advance the stored polling offset.
    ///
    /// The guard keeps the offset monotonically non-decreasing even when a
    /// batch arrives out of order; returns whether the row moved forward.
    pub async fn advance_last_update_id(
        &self,
        id: i64,
        update_id: i64,
    ) -> Result<bool, GroupGuardError> {
        let result = sqlx::query(
            r#"
            UPDATE bot_configs
            SET last_update_id = ?2, updated_at = ?3
            WHERE id = ?1 AND last_update_id < ?2
            "#,
        )
        .bind(id)
        .bind(update_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
