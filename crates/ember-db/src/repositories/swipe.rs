//! PostgreSQL implementation of SwipeRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use ember_core::entities::Swipe;
use ember_core::error::DomainError;
use ember_core::traits::{RepoResult, SwipeRepository};
use ember_core::value_objects::Snowflake;

use crate::models::SwipeModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of SwipeRepository
#[derive(Clone)]
pub struct PgSwipeRepository {
    pool: PgPool,
}

impl PgSwipeRepository {
    /// Create a new PgSwipeRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SwipeRepository for PgSwipeRepository {
    #[instrument(skip(self))]
    async fn find_pair(
        &self,
        swiper_id: Snowflake,
        swiped_id: Snowflake,
    ) -> RepoResult<Option<Swipe>> {
        let result = sqlx::query_as::<_, SwipeModel>(
            r#"
            SELECT id, swiper_id, swiped_id, kind, created_at
            FROM swipes
            WHERE swiper_id = $1 AND swiped_id = $2
            "#,
        )
        .bind(swiper_id.into_inner())
        .bind(swiped_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Swipe::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_positive_from(
        &self,
        swiper_id: Snowflake,
        swiped_id: Snowflake,
    ) -> RepoResult<Option<Swipe>> {
        let result = sqlx::query_as::<_, SwipeModel>(
            r#"
            SELECT id, swiper_id, swiped_id, kind, created_at
            FROM swipes
            WHERE swiper_id = $1 AND swiped_id = $2 AND kind IN ('like', 'super_like')
            "#,
        )
        .bind(swiper_id.into_inner())
        .bind(swiped_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Swipe::try_from).transpose()
    }

    #[instrument(skip(self, swipe))]
    async fn create(&self, swipe: &Swipe) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO swipes (id, swiper_id, swiped_id, kind, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(swipe.id.into_inner())
        .bind(swipe.swiper_id.into_inner())
        .bind(swipe.swiped_id.into_inner())
        .bind(swipe.kind.as_str())
        .bind(swipe.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::AlreadySwiped))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        sqlx::query("DELETE FROM swipes WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_latest_by_swiper(&self, swiper_id: Snowflake) -> RepoResult<Option<Swipe>> {
        let result = sqlx::query_as::<_, SwipeModel>(
            r#"
            SELECT id, swiper_id, swiped_id, kind, created_at
            FROM swipes
            WHERE swiper_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(swiper_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Swipe::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn swiped_ids(&self, swiper_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        let rows: Vec<(i64,)> =
            sqlx::query_as("SELECT swiped_id FROM swipes WHERE swiper_id = $1")
                .bind(swiper_id.into_inner())
                .fetch_all(&self.pool)
                .await
                .map_err(map_db_error)?;

        Ok(rows.into_iter().map(|(id,)| Snowflake::new(id)).collect())
    }
}
