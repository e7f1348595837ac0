//! Security audit repository implementation

use chrono::Utc;

use crate::database::connection::DatabasePool;
use crate::models::security_audit::{CreateSecurityAuditRequest, SecurityAuditEntry};
use crate::utils::errors::GroupGuardError;

const COLUMNS: &str = "id, config_id, telegram_id, display_name, username, chat_id, group_title, \
     attempt_type, occurred_at";

#[derive(Debug, Clone)]
pub struct SecurityAuditRepository {
    pool: DatabasePool,
}

impl SecurityAuditRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Append one audit entry
    pub async fn create(
        &self,
        request: CreateSecurityAuditRequest,
    ) -> Result<SecurityAuditEntry, GroupGuardError> {
        let entry = sqlx::query_as::<_, SecurityAuditEntry>(&format!(
            r#"
            INSERT INTO security_audit
                (config_id, telegram_id, display_name, username, chat_id, group_title,
                 attempt_type, occurred_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(request.config_id)
        .bind(request.telegram_id)
        .bind(&request.display_name)
        .bind(&request.username)
        .bind(request.chat_id)
        .bind(&request.group_title)
        .bind(&request.attempt_type)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    /// List entries for a configuration, newest first
    pub async fn list_for_config(
        &self,
        config_id: i64,
    ) -> Result<Vec<SecurityAuditEntry>, GroupGuardError> {
        let entries = sqlx::query_as::<_, SecurityAuditEntry>(&format!(
            "SELECT {COLUMNS} FROM security_audit WHERE config_id = ? ORDER BY occurred_at DESC"
        ))
        .bind(config_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
