//! Authentication service
//!
//! Registration, login, and token refresh. Tokens are stateless JWT pairs;
//! the refresh flow re-validates that the subject still exists.

use ember_common::auth::TokenPair;
use ember_common::{hash_password, validate_password_strength, verify_password, AppError};
use ember_core::entities::User;
use ember_core::{DomainError, Snowflake};
use tracing::{info, instrument};

use crate::dto::RegisterRequest;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new account and issue a token pair
    #[instrument(skip(self, request))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<(User, TokenPair)> {
        let email = request.email.trim().to_lowercase();

        if self.ctx.user_repo().email_exists(&email).await? {
            return Err(DomainError::EmailAlreadyExists.into());
        }

        validate_password_strength(&request.password)?;
        let password_hash = hash_password(&request.password)?;

        let mut user = User::new(
            self.ctx.generate_id(),
            email,
            password_hash,
            request.name,
            request.age,
            request.gender,
            request.looking_for,
        );
        user.bio = request.bio;
        user.interests = request.interests;

        self.ctx.user_repo().create(&user).await?;

        let tokens = self.ctx.jwt_service().generate_token_pair(user.id)?;

        info!(user_id = %user.id, "User registered");

        Ok((user, tokens))
    }

    /// Log in with email and password
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> ServiceResult<(User, TokenPair)> {
        let email = email.trim().to_lowercase();

        let user = self
            .ctx
            .user_repo()
            .find_by_email(&email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        // Social-only accounts have no password to check
        if user.password_hash.is_empty() || !verify_password(password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials.into());
        }

        let tokens = self.ctx.jwt_service().generate_token_pair(user.id)?;

        info!(user_id = %user.id, "User logged in");

        Ok((user, tokens))
    }

    /// Mint a fresh token pair from a valid refresh token
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh(&self, refresh_token: &str) -> ServiceResult<TokenPair> {
        let claims = self.ctx.jwt_service().validate_refresh_token(refresh_token)?;
        let user_id = claims.user_id()?;

        // A deleted account invalidates its refresh tokens
        if self.ctx.user_repo().find_by_id(user_id).await?.is_none() {
            return Err(AppError::InvalidToken.into());
        }

        Ok(self.ctx.jwt_service().generate_token_pair(user_id)?)
    }

    /// Resolve an access token to its user ID (used by the WebSocket upgrade)
    pub fn authenticate_access_token(&self, token: &str) -> ServiceResult<Snowflake> {
        let claims = self.ctx.jwt_service().validate_access_token(token)?;
        Ok(claims.user_id()?)
    }
}
