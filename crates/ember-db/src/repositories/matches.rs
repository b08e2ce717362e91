//! PostgreSQL implementation of MatchRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use ember_core::entities::{Conversation, Match};
use ember_core::error::DomainError;
use ember_core::traits::{CreatedMatch, MatchRepository, RepoResult};
use ember_core::value_objects::Snowflake;

use crate::models::{ConversationModel, MatchModel, CONVERSATION_COLUMNS};

use super::error::{map_db_error, match_not_found};

const MATCH_COLUMNS: &str = "id, user1_id, user2_id, matched_at, is_active, user1_seen, user2_seen";

/// PostgreSQL implementation of MatchRepository
#[derive(Clone)]
pub struct PgMatchRepository {
    pool: PgPool,
}

impl PgMatchRepository {
    /// Create a new PgMatchRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MatchRepository for PgMatchRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Match>> {
        let result = sqlx::query_as::<_, MatchModel>(&format!(
            "SELECT {MATCH_COLUMNS} FROM matches WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Match::from))
    }

    #[instrument(skip(self))]
    async fn find_active_between(
        &self,
        user_a: Snowflake,
        user_b: Snowflake,
    ) -> RepoResult<Option<Match>> {
        let result = sqlx::query_as::<_, MatchModel>(&format!(
            r#"
            SELECT {MATCH_COLUMNS} FROM matches
            WHERE is_active
              AND LEAST(user1_id, user2_id) = LEAST($1, $2)
              AND GREATEST(user1_id, user2_id) = GREATEST($1, $2)
            "#
        ))
        .bind(user_a.into_inner())
        .bind(user_b.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Match::from))
    }

    #[instrument(skip(self, record, conversation))]
    async fn create_with_conversation(
        &self,
        record: &Match,
        conversation: &Conversation,
    ) -> RepoResult<CreatedMatch> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // The partial unique index on the normalized pair serializes
        // concurrent mutual likes: the loser's insert affects zero rows
        // once the winner's transaction commits.
        let inserted = sqlx::query(
            r#"
            INSERT INTO matches (id, user1_id, user2_id, matched_at, is_active, user1_seen, user2_seen)
            VALUES ($1, $2, $3, $4, TRUE, FALSE, FALSE)
            ON CONFLICT ((LEAST(user1_id, user2_id)), (GREATEST(user1_id, user2_id)))
                WHERE is_active
                DO NOTHING
            "#,
        )
        .bind(record.id.into_inner())
        .bind(record.user1_id.into_inner())
        .bind(record.user2_id.into_inner())
        .bind(record.matched_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?
        .rows_affected();

        if inserted == 0 {
            tx.rollback().await.map_err(map_db_error)?;

            let existing = self
                .find_active_between(record.user1_id, record.user2_id)
                .await?
                .ok_or_else(|| {
                    DomainError::DatabaseError(
                        "active match disappeared during concurrent creation".to_string(),
                    )
                })?;
            let conversation = self.conversation_for(existing.id).await?;

            return Ok(CreatedMatch {
                record: existing,
                conversation,
                created: false,
            });
        }

        sqlx::query(
            r#"
            INSERT INTO conversations (id, match_id, user1_id, user2_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(conversation.id.into_inner())
        .bind(conversation.match_id.into_inner())
        .bind(conversation.user1_id.into_inner())
        .bind(conversation.user2_id.into_inner())
        .bind(conversation.created_at)
        .bind(conversation.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(CreatedMatch {
            record: record.clone(),
            conversation: conversation.clone(),
            created: true,
        })
    }

    #[instrument(skip(self))]
    async fn find_for_user(&self, user_id: Snowflake) -> RepoResult<Vec<Match>> {
        let results = sqlx::query_as::<_, MatchModel>(&format!(
            r#"
            SELECT {MATCH_COLUMNS} FROM matches
            WHERE is_active AND (user1_id = $1 OR user2_id = $1)
            ORDER BY matched_at DESC
            "#
        ))
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Match::from).collect())
    }

    #[instrument(skip(self))]
    async fn deactivate(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("UPDATE matches SET is_active = FALSE WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(match_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn deactivate_between(
        &self,
        user_a: Snowflake,
        user_b: Snowflake,
    ) -> RepoResult<Option<Match>> {
        let result = sqlx::query_as::<_, MatchModel>(&format!(
            r#"
            UPDATE matches SET is_active = FALSE
            WHERE is_active
              AND LEAST(user1_id, user2_id) = LEAST($1, $2)
              AND GREATEST(user1_id, user2_id) = GREATEST($1, $2)
            RETURNING {MATCH_COLUMNS}
            "#
        ))
        .bind(user_a.into_inner())
        .bind(user_b.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Match::from))
    }

    #[instrument(skip(self))]
    async fn mark_seen(&self, id: Snowflake, user_id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE matches SET
                user1_seen = CASE WHEN user1_id = $2 THEN TRUE ELSE user1_seen END,
                user2_seen = CASE WHEN user2_id = $2 THEN TRUE ELSE user2_seen END
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(match_not_found(id));
        }

        Ok(())
    }
}

impl PgMatchRepository {
    /// Fetch the conversation owned by a match
    async fn conversation_for(&self, match_id: Snowflake) -> RepoResult<Conversation> {
        let result = sqlx::query_as::<_, ConversationModel>(&format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations WHERE match_id = $1"
        ))
        .bind(match_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Conversation::from).ok_or_else(|| {
            DomainError::DatabaseError(format!("match {match_id} has no conversation"))
        })
    }
}
