//! PostgreSQL implementation of BlockRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use ember_core::entities::Block;
use ember_core::error::DomainError;
use ember_core::traits::{BlockRepository, RepoResult};
use ember_core::value_objects::Snowflake;

use crate::models::BlockModel;

use super::error::{map_db_error, map_unique_violation};

const BLOCK_COLUMNS: &str = "id, blocker_id, blocked_id, created_at";

/// PostgreSQL implementation of BlockRepository
#[derive(Clone)]
pub struct PgBlockRepository {
    pool: PgPool,
}

impl PgBlockRepository {
    /// Create a new PgBlockRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlockRepository for PgBlockRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        blocker_id: Snowflake,
        blocked_id: Snowflake,
    ) -> RepoResult<Option<Block>> {
        let result = sqlx::query_as::<_, BlockModel>(&format!(
            "SELECT {BLOCK_COLUMNS} FROM blocks WHERE blocker_id = $1 AND blocked_id = $2"
        ))
        .bind(blocker_id.into_inner())
        .bind(blocked_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Block::from))
    }

    #[instrument(skip(self, block))]
    async fn create(&self, block: &Block) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO blocks (id, blocker_id, blocked_id, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(block.id.into_inner())
        .bind(block.blocker_id.into_inner())
        .bind(block.blocked_id.into_inner())
        .bind(block.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::AlreadyBlocked))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        sqlx::query("DELETE FROM blocks WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn exists_between(&self, user_a: Snowflake, user_b: Snowflake) -> RepoResult<bool> {
        let exists: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM blocks
                WHERE (blocker_id = $1 AND blocked_id = $2)
                   OR (blocker_id = $2 AND blocked_id = $1)
            )
            "#,
        )
        .bind(user_a.into_inner())
        .bind(user_b.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(exists.0)
    }

    #[instrument(skip(self))]
    async fn involving(&self, user_id: Snowflake) -> RepoResult<Vec<Block>> {
        let results = sqlx::query_as::<_, BlockModel>(&format!(
            "SELECT {BLOCK_COLUMNS} FROM blocks WHERE blocker_id = $1 OR blocked_id = $1"
        ))
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Block::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_by_blocker(&self, blocker_id: Snowflake) -> RepoResult<Vec<Block>> {
        let results = sqlx::query_as::<_, BlockModel>(&format!(
            "SELECT {BLOCK_COLUMNS} FROM blocks WHERE blocker_id = $1 ORDER BY created_at DESC"
        ))
        .bind(blocker_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Block::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgBlockRepository>();
    }
}
