//! Message repository implementation

use chrono::Utc;

use crate::database::connection::DatabasePool;
use crate::models::message::{CreateMessageRequest, Message};
use crate::utils::errors::GroupGuardError;

const COLUMNS: &str = "id, group_id, member_id, message_id, text, sent_at, is_reply, created_at";

#[derive(Debug, Clone)]
pub struct MessageRepository {
    pool: DatabasePool,
}

impl MessageRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Find message by (message_id, group_id)
    pub async fn find_by_message_id(
        &self,
        group_id: i64,
        message_id: i64,
    ) -> Result<Option<Message>, GroupGuardError> {
        let message = sqlx::query_as::<_, Message>(&format!(
            "SELECT {COLUMNS} FROM messages WHERE message_id = ? AND group_id = ?"
        ))
        .bind(message_id)
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(message)
    }

    /// Store a message at most once.
    ///
    /// A redelivered or concurrently stored message returns the existing
    /// row unchanged.
    pub async fn store(&self, request: CreateMessageRequest) -> Result<Message, GroupGuardError> {
        if let Some(existing) = self
            .find_by_message_id(request.group_id, request.message_id)
            .await?
        {
            tracing::debug!(
                message_id = request.message_id,
                group_id = request.group_id,
                "Message already exists, skipping"
            );
            return Ok(existing);
        }

        let inserted = sqlx::query_as::<_, Message>(&format!(
            r#"
            INSERT INTO messages (group_id, member_id, message_id, text, sent_at, is_reply, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (message_id, group_id) DO NOTHING
            RETURNING {COLUMNS}
            "#
        ))
        .bind(request.group_id)
        .bind(request.member_id)
        .bind(request.message_id)
        .bind(&request.text)
        .bind(request.sent_at)
        .bind(request.is_reply)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some(message) => Ok(message),
            None => self
                .find_by_message_id(request.group_id, request.message_id)
                .await?
                .ok_or_else(|| {
                    GroupGuardError::InvalidInput(format!(
                        "message {} vanished during upsert",
                        request.message_id
                    ))
                }),
        }
    }

    /// Count messages in a group
    pub async fn count(&self, group_id: i64) -> Result<i64, GroupGuardError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM messages WHERE group_id = ?")
            .bind(group_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
