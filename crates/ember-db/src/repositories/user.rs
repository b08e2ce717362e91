//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::instrument;

use ember_core::entities::User;
use ember_core::traits::{CandidateQuery, RepoResult, UserRepository};
use ember_core::value_objects::Snowflake;

use crate::models::{UserModel, USER_COLUMNS};

use super::error::{map_db_error, map_unique_violation, user_not_found};
use ember_core::error::DomainError;

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PgUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn select(where_clause: &str) -> String {
        format!("SELECT {USER_COLUMNS} FROM users WHERE {where_clause}")
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(&Self::select("id = $1"))
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(User::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(&Self::select("email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(User::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await
                .map_err(map_db_error)?;

        Ok(exists.0)
    }

    #[instrument(skip(self, user))]
    async fn create(&self, user: &User) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, email, password_hash, name, age, gender, looking_for, bio,
                interests, photos, location, min_age, max_age, max_distance,
                show_distance, show_online_status, discovery_enabled, is_online,
                is_verified, last_active, super_likes_remaining,
                super_likes_reset_at, is_premium, premium_expires_at,
                created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26
            )
            "#,
        )
        .bind(user.id.into_inner())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(user.age)
        .bind(user.gender.as_str())
        .bind(user.looking_for.as_str())
        .bind(&user.bio)
        .bind(&user.interests)
        .bind(Json(&user.photos))
        .bind(user.location.as_ref().map(Json))
        .bind(user.preferences.min_age)
        .bind(user.preferences.max_age)
        .bind(user.preferences.max_distance)
        .bind(user.preferences.show_distance)
        .bind(user.preferences.show_online_status)
        .bind(user.discovery_enabled)
        .bind(user.is_online)
        .bind(user.is_verified)
        .bind(user.last_active)
        .bind(user.super_likes_remaining)
        .bind(user.super_likes_reset_at)
        .bind(user.is_premium)
        .bind(user.premium_expires_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::EmailAlreadyExists))?;

        Ok(())
    }

    #[instrument(skip(self, user))]
    async fn update(&self, user: &User) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                email = $2, password_hash = $3, name = $4, age = $5,
                gender = $6, looking_for = $7, bio = $8, interests = $9,
                photos = $10, location = $11, min_age = $12, max_age = $13,
                max_distance = $14, show_distance = $15,
                show_online_status = $16, discovery_enabled = $17,
                is_verified = $18, super_likes_remaining = $19,
                super_likes_reset_at = $20, is_premium = $21,
                premium_expires_at = $22, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user.id.into_inner())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(user.age)
        .bind(user.gender.as_str())
        .bind(user.looking_for.as_str())
        .bind(&user.bio)
        .bind(&user.interests)
        .bind(Json(&user.photos))
        .bind(user.location.as_ref().map(Json))
        .bind(user.preferences.min_age)
        .bind(user.preferences.max_age)
        .bind(user.preferences.max_distance)
        .bind(user.preferences.show_distance)
        .bind(user.preferences.show_online_status)
        .bind(user.discovery_enabled)
        .bind(user.is_verified)
        .bind(user.super_likes_remaining)
        .bind(user.super_likes_reset_at)
        .bind(user.is_premium)
        .bind(user.premium_expires_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(user.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_presence(
        &self,
        id: Snowflake,
        online: bool,
        last_active: DateTime<Utc>,
    ) -> RepoResult<()> {
        sqlx::query("UPDATE users SET is_online = $2, last_active = $3 WHERE id = $1")
            .bind(id.into_inner())
            .bind(online)
            .bind(last_active)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn consume_super_like(&self, id: Snowflake) -> RepoResult<bool> {
        // Conditional decrement; concurrent requests cannot overspend
        let result = sqlx::query(
            r#"
            UPDATE users
            SET super_likes_remaining = super_likes_remaining - 1, updated_at = NOW()
            WHERE id = $1 AND super_likes_remaining > 0
            "#,
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn refill_super_likes(
        &self,
        id: Snowflake,
        remaining: i32,
        reset_at: DateTime<Utc>,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET super_likes_remaining = $2, super_likes_reset_at = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .bind(remaining)
        .bind(reset_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_premium(&self, id: Snowflake, is_premium: bool) -> RepoResult<()> {
        sqlx::query("UPDATE users SET is_premium = $2, updated_at = NOW() WHERE id = $1")
            .bind(id.into_inner())
            .bind(is_premium)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_candidates(&self, query: &CandidateQuery) -> RepoResult<Vec<User>> {
        let results = sqlx::query_as::<_, UserModel>(&Self::select(
            "gender = $1 AND looking_for = $2 AND age >= $3 AND age <= $4 AND discovery_enabled",
        ))
        .bind(query.gender.as_str())
        .bind(query.looking_for.as_str())
        .bind(query.min_age)
        .bind(query.max_age)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(User::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgUserRepository>();
    }
}
