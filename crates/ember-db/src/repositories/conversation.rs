//! PostgreSQL implementation of ConversationRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::instrument;

use ember_core::entities::{Conversation, PinnedMessage};
use ember_core::traits::{ConversationRepository, RepoResult};
use ember_core::value_objects::Snowflake;

use crate::models::{ConversationModel, CONVERSATION_COLUMNS};

use super::error::{conversation_not_found, map_db_error};

/// PostgreSQL implementation of ConversationRepository
#[derive(Clone)]
pub struct PgConversationRepository {
    pool: PgPool,
}

impl PgConversationRepository {
    /// Create a new PgConversationRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn select(where_clause: &str) -> String {
        format!("SELECT {CONVERSATION_COLUMNS} FROM conversations WHERE {where_clause}")
    }
}

#[async_trait]
impl ConversationRepository for PgConversationRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Conversation>> {
        let result = sqlx::query_as::<_, ConversationModel>(&Self::select("id = $1"))
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(Conversation::from))
    }

    #[instrument(skip(self))]
    async fn find_by_match(&self, match_id: Snowflake) -> RepoResult<Option<Conversation>> {
        let result = sqlx::query_as::<_, ConversationModel>(&Self::select("match_id = $1"))
            .bind(match_id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(Conversation::from))
    }

    #[instrument(skip(self))]
    async fn find_for_user(&self, user_id: Snowflake) -> RepoResult<Vec<Conversation>> {
        let results = sqlx::query_as::<_, ConversationModel>(&format!(
            r#"
            SELECT {CONVERSATION_COLUMNS} FROM conversations
            WHERE user1_id = $1 OR user2_id = $1
            ORDER BY updated_at DESC
            "#
        ))
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Conversation::from).collect())
    }

    #[instrument(skip(self))]
    async fn ids_for_user(&self, user_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            "SELECT id FROM conversations WHERE user1_id = $1 OR user2_id = $1",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(|(id,)| Snowflake::new(id)).collect())
    }

    #[instrument(skip(self, preview))]
    async fn record_message(
        &self,
        id: Snowflake,
        recipient_id: Snowflake,
        message_id: Snowflake,
        preview: &str,
        sender_id: Snowflake,
        sent_at: DateTime<Utc>,
    ) -> RepoResult<()> {
        // Cache overwrite and unread increment in one statement
        let result = sqlx::query(
            r#"
            UPDATE conversations SET
                last_message_id = $2,
                last_message_content = $3,
                last_message_sender_id = $4,
                last_message_at = $5,
                updated_at = NOW(),
                user1_unread_count = user1_unread_count
                    + CASE WHEN user1_id = $6 THEN 1 ELSE 0 END,
                user2_unread_count = user2_unread_count
                    + CASE WHEN user2_id = $6 THEN 1 ELSE 0 END
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .bind(message_id.into_inner())
        .bind(preview)
        .bind(sender_id.into_inner())
        .bind(sent_at)
        .bind(recipient_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(conversation_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn reset_unread(&self, id: Snowflake, user_id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE conversations SET
                user1_unread_count = CASE WHEN user1_id = $2 THEN 0 ELSE user1_unread_count END,
                user2_unread_count = CASE WHEN user2_id = $2 THEN 0 ELSE user2_unread_count END
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(conversation_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_mute(
        &self,
        id: Snowflake,
        user_id: Snowflake,
        muted_until: Option<DateTime<Utc>>,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE conversations SET
                user1_muted_until = CASE WHEN user1_id = $2 THEN $3 ELSE user1_muted_until END,
                user2_muted_until = CASE WHEN user2_id = $2 THEN $3 ELSE user2_muted_until END
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .bind(user_id.into_inner())
        .bind(muted_until)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(conversation_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self, pinned))]
    async fn set_pinned(&self, id: Snowflake, pinned: &[PinnedMessage]) -> RepoResult<()> {
        let result = sqlx::query("UPDATE conversations SET pinned_messages = $2 WHERE id = $1")
            .bind(id.into_inner())
            .bind(Json(pinned))
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(conversation_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        sqlx::query("DELETE FROM conversations WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_by_match(&self, match_id: Snowflake) -> RepoResult<()> {
        sqlx::query("DELETE FROM conversations WHERE match_id = $1")
            .bind(match_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgConversationRepository>();
    }
}
