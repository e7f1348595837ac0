//! Group repository implementation

use chrono::{DateTime, Utc};

use crate::database::connection::DatabasePool;
use crate::models::group::{CreateGroupRequest, Group};
use crate::utils::errors::GroupGuardError;

const COLUMNS: &str = "id, config_id, chat_id, title, chat_type, setup_status, \
     setup_started_at, setup_completed_at, setup_duration_minutes, added_by_telegram_id, \
     invite_link, invite_link_created_at, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct GroupRepository {
    pool: DatabasePool,
}

impl GroupRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Find group by (chat_id, config_id)
    pub async fn find_by_chat_id(
        &self,
        config_id: i64,
        chat_id: i64,
    ) -> Result<Option<Group>, GroupGuardError> {
        let group = sqlx::query_as::<_, Group>(&format!(
            "SELECT {COLUMNS} FROM groups WHERE chat_id = ? AND config_id = ?"
        ))
        .bind(chat_id)
        .bind(config_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    /// Find an existing group or create it in the default `pending` state.
    ///
    /// Race-safe under the (chat_id, config_id) unique constraint: a
    /// concurrent insert turns into a re-read instead of an error.
    pub async fn find_or_create(&self, request: CreateGroupRequest) -> Result<Group, GroupGuardError> {
        if let Some(group) = self
            .find_by_chat_id(request.config_id, request.chat_id)
            .await?
        {
            return Ok(group);
        }

        let now = Utc::now();
        let inserted = sqlx::query_as::<_, Group>(&format!(
            r#"
            INSERT INTO groups (config_id, chat_id, title, chat_type, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT (chat_id, config_id) DO NOTHING
            RETURNING {COLUMNS}
            "#
        ))
        .bind(request.config_id)
        .bind(request.chat_id)
        .bind(&request.title)
        .bind(&request.chat_type)
        .bind(now)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some(group) => {
                tracing::info!(
                    chat_id = group.chat_id,
                    title = %group.title,
                    "Created new Telegram group"
                );
                Ok(group)
            }
            // Lost the race; the row exists now
            None => self
                .find_by_chat_id(request.config_id, request.chat_id)
                .await?
                .ok_or(GroupGuardError::GroupNotFound {
                    chat_id: request.chat_id,
                }),
        }
    }

    /// Delete a group row (cascades to members and messages)
    pub async fn delete(&self, id: i64) -> Result<(), GroupGuardError> {
        sqlx::query("DELETE FROM groups WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Find a recently created group under the same config with the same
    /// title but a different chat id. Used by the supergroup-conversion
    /// cleanup heuristic.
    pub async fn find_conversion_duplicate(
        &self,
        config_id: i64,
        title: &str,
        current_chat_id: i64,
        created_after: DateTime<Utc>,
    ) -> Result<Option<Group>, GroupGuardError> {
        let group = sqlx::query_as::<_, Group>(&format!(
            r#"
            SELECT {COLUMNS} FROM groups
            WHERE config_id = ? AND title = ? AND chat_id != ? AND created_at > ?
            ORDER BY created_at DESC
            LIMIT 1
            "#
        ))
        .bind(config_id)
        .bind(title)
        .bind(current_chat_id)
        .bind(created_after)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    /// Enter the setup workflow: mark `pending` and record who added the bot
    pub async fn begin_setup(
        &self,
        id: i64,
        added_by_telegram_id: i64,
    ) -> Result<Group, GroupGuardError> {
        let now = Utc::now();
        let group = sqlx::query_as::<_, Group>(&format!(
            r#"
            UPDATE groups
            SET setup_status = 'pending',
                setup_started_at = ?2,
                setup_completed_at = NULL,
                setup_duration_minutes = NULL,
                added_by_telegram_id = ?3,
                updated_at = ?2
            WHERE id = ?1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(now)
        .bind(added_by_telegram_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(group)
    }

    /// Guarded pending -> complete transition.
    ///
    /// Returns `None` when the row was not in `pending` (for instance a
    /// redelivered promotion update), leaving it untouched.
    pub async fn complete_setup(
        &self,
        id: i64,
        invite_link: Option<&str>,
        setup_duration_minutes: i64,
    ) -> Result<Option<Group>, GroupGuardError> {
        let now = Utc::now();
        let group = sqlx::query_as::<_, Group>(&format!(
            r#"
            UPDATE groups
            SET setup_status = 'complete',
                setup_completed_at = ?2,
                setup_duration_minutes = ?3,
                invite_link = COALESCE(?4, invite_link),
                invite_link_created_at = CASE WHEN ?4 IS NULL THEN invite_link_created_at ELSE ?2 END,
                updated_at = ?2
            WHERE id = ?1 AND setup_status = 'pending'
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(now)
        .bind(setup_duration_minutes)
        .bind(invite_link)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    /// Count groups for a configuration
    pub async fn count(&self, config_id: i64) -> Result<i64, GroupGuardError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM groups WHERE config_id = ?")
            .bind(config_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
