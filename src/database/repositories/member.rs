//! Member repository implementation

use chrono::Utc;

use crate::database::connection::DatabasePool;
use crate::models::member::{CreateMemberRequest, Member};
use crate::utils::errors::GroupGuardError;

const COLUMNS: &str =
    "id, group_id, telegram_id, display_name, username, is_bot, is_active, joined_at, left_at";

#[derive(Debug, Clone)]
pub struct MemberRepository {
    pool: DatabasePool,
}

impl MemberRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Find member by (telegram_id, group_id)
    pub async fn find_by_telegram_id(
        &self,
        group_id: i64,
        telegram_id: i64,
    ) -> Result<Option<Member>, GroupGuardError> {
        let member = sqlx::query_as::<_, Member>(&format!(
            "SELECT {COLUMNS} FROM members WHERE telegram_id = ? AND group_id = ?"
        ))
        .bind(telegram_id)
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    /// Find an existing member or create an active one.
    ///
    /// Race-safe under the (telegram_id, group_id) unique constraint.
    pub async fn find_or_create(
        &self,
        request: CreateMemberRequest,
    ) -> Result<Member, GroupGuardError> {
        if let Some(member) = self
            .find_by_telegram_id(request.group_id, request.telegram_id)
            .await?
        {
            return Ok(member);
        }

        let inserted = sqlx::query_as::<_, Member>(&format!(
            r#"
            INSERT INTO members (group_id, telegram_id, display_name, username, is_bot, joined_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT (telegram_id, group_id) DO NOTHING
            RETURNING {COLUMNS}
            "#
        ))
        .bind(request.group_id)
        .bind(request.telegram_id)
        .bind(&request.display_name)
        .bind(&request.username)
        .bind(request.is_bot)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some(member) => {
                tracing::info!(
                    telegram_id = member.telegram_id,
                    group_id = member.group_id,
                    name = %member.display_name,
                    "Created new member"
                );
                Ok(member)
            }
            None => self
                .find_by_telegram_id(request.group_id, request.telegram_id)
                .await?
                .ok_or_else(|| {
                    GroupGuardError::InvalidInput(format!(
                        "member {} vanished during upsert",
                        request.telegram_id
                    ))
                }),
        }
    }

    /// Reactivate a member who rejoined: clears the leave timestamp
    pub async fn reactivate(&self, id: i64) -> Result<Member, GroupGuardError> {
        let member = sqlx::query_as::<_, Member>(&format!(
            r#"
            UPDATE members
            SET is_active = TRUE, left_at = NULL
            WHERE id = ?
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(member)
    }

    /// Mark a member inactive with a leave timestamp
    pub async fn deactivate(&self, id: i64) -> Result<Member, GroupGuardError> {
        let member = sqlx::query_as::<_, Member>(&format!(
            r#"
            UPDATE members
            SET is_active = FALSE, left_at = ?2
            WHERE id = ?1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(member)
    }

    /// Count members in a group
    pub async fn count(&self, group_id: i64) -> Result<i64, GroupGuardError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM members WHERE group_id = ?")
            .bind(group_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
