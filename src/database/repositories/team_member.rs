//! Team member registry repository implementation
//!
//! The registry is process-wide shared state across bot configurations, so
//! every write is a single transactional statement.

use chrono::Utc;

use crate::database::connection::DatabasePool;
use crate::models::team_member::{CreateTeamMemberRequest, TeamMember};
use crate::utils::errors::GroupGuardError;

const COLUMNS: &str = "id, telegram_id, display_name, username, is_active, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct TeamMemberRepository {
    pool: DatabasePool,
}

impl TeamMemberRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Find a team member by Telegram user id
    pub async fn find_by_telegram_id(
        &self,
        telegram_id: i64,
    ) -> Result<Option<TeamMember>, GroupGuardError> {
        let member = sqlx::query_as::<_, TeamMember>(&format!(
            "SELECT {COLUMNS} FROM team_members WHERE telegram_id = ?"
        ))
        .bind(telegram_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    /// Find an active team member by Telegram user id
    pub async fn find_active_by_telegram_id(
        &self,
        telegram_id: i64,
    ) -> Result<Option<TeamMember>, GroupGuardError> {
        let member = sqlx::query_as::<_, TeamMember>(&format!(
            "SELECT {COLUMNS} FROM team_members WHERE telegram_id = ? AND is_active = TRUE"
        ))
        .bind(telegram_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    /// Reactivate-or-create in one statement, keyed by telegram_id
    pub async fn upsert_active(
        &self,
        request: CreateTeamMemberRequest,
    ) -> Result<TeamMember, GroupGuardError> {
        let now = Utc::now();
        let member = sqlx::query_as::<_, TeamMember>(&format!(
            r#"
            INSERT INTO team_members (telegram_id, display_name, username, is_active, created_at, updated_at)
            VALUES (?, ?, ?, TRUE, ?, ?)
            ON CONFLICT (telegram_id) DO UPDATE
            SET is_active = TRUE, updated_at = excluded.updated_at
            RETURNING {COLUMNS}
            "#
        ))
        .bind(request.telegram_id)
        .bind(&request.display_name)
        .bind(&request.username)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(member)
    }

    /// Deactivate a team member; registry rows are never deleted
    pub async fn deactivate(&self, telegram_id: i64) -> Result<Option<TeamMember>, GroupGuardError> {
        let member = sqlx::query_as::<_, TeamMember>(&format!(
            r#"
            UPDATE team_members
            SET is_active = FALSE, updated_at = ?2
            WHERE telegram_id = ?1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(telegram_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }
}
