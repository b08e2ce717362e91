//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::instrument;

use ember_core::entities::{Message, Reaction};
use ember_core::traits::{MessageRepository, RepoResult};
use ember_core::value_objects::Snowflake;

use crate::models::{MessageModel, MESSAGE_COLUMNS};

use super::error::{map_db_error, message_not_found};

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Create a new PgMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>> {
        let result = sqlx::query_as::<_, MessageModel>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Message::try_from).transpose()
    }

    #[instrument(skip(self, message))]
    async fn create(&self, message: &Message) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO messages (
                id, conversation_id, sender_id, content, kind, status, sent_at,
                media_url, media_info, reply_to, reactions
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(message.id.into_inner())
        .bind(message.conversation_id.into_inner())
        .bind(message.sender_id.into_inner())
        .bind(&message.content)
        .bind(message.kind.as_str())
        .bind(message.status.as_str())
        .bind(message.sent_at)
        .bind(&message.media_url)
        .bind(message.media_info.as_ref().map(Json))
        .bind(message.reply_to.as_ref().map(Json))
        .bind(Json(&message.reactions))
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, content))]
    async fn update_content(
        &self,
        id: Snowflake,
        content: &str,
        edited_at: DateTime<Utc>,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET content = $2, is_edited = TRUE, edited_at = $3
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(id.into_inner())
        .bind(content)
        .bind(edited_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(message_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self, placeholder))]
    async fn soft_delete(
        &self,
        id: Snowflake,
        placeholder: &str,
        deleted_at: DateTime<Utc>,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET content = $2, is_deleted = TRUE, deleted_at = $3
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(id.into_inner())
        .bind(placeholder)
        .bind(deleted_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(message_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self, reactions))]
    async fn set_reactions(&self, id: Snowflake, reactions: &[Reaction]) -> RepoResult<()> {
        let result = sqlx::query("UPDATE messages SET reactions = $2 WHERE id = $1")
            .bind(id.into_inner())
            .bind(Json(reactions))
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(message_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self, message_ids))]
    async fn mark_read(
        &self,
        conversation_id: Snowflake,
        message_ids: &[Snowflake],
        reader_id: Snowflake,
    ) -> RepoResult<u64> {
        if message_ids.is_empty() {
            return Ok(0);
        }

        let ids: Vec<i64> = message_ids.iter().map(|s| s.into_inner()).collect();

        // The reader can never mark their own messages
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET status = 'read'
            WHERE conversation_id = $1 AND id = ANY($2) AND sender_id <> $3
            "#,
        )
        .bind(conversation_id.into_inner())
        .bind(&ids)
        .bind(reader_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn list_page(
        &self,
        conversation_id: Snowflake,
        before: Option<DateTime<Utc>>,
        limit: i64,
    ) -> RepoResult<Vec<Message>> {
        let results = match before {
            Some(before) => {
                sqlx::query_as::<_, MessageModel>(&format!(
                    r#"
                    SELECT {MESSAGE_COLUMNS} FROM messages
                    WHERE conversation_id = $1 AND is_deleted = FALSE AND sent_at < $2
                    ORDER BY sent_at DESC, id DESC
                    LIMIT $3
                    "#
                ))
                .bind(conversation_id.into_inner())
                .bind(before)
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, MessageModel>(&format!(
                    r#"
                    SELECT {MESSAGE_COLUMNS} FROM messages
                    WHERE conversation_id = $1 AND is_deleted = FALSE
                    ORDER BY sent_at DESC, id DESC
                    LIMIT $2
                    "#
                ))
                .bind(conversation_id.into_inner())
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(map_db_error)?;

        results.into_iter().map(Message::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgMessageRepository>();
    }
}
