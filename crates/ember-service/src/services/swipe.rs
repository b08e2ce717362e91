//! Swipe service
//!
//! Records swipes, detects mutual likes, and drives the match transition.

use chrono::{DateTime, Datelike, Days, TimeZone, Utc};
use ember_core::entities::{Conversation, Match, Swipe, SwipeKind, DAILY_SUPER_LIKES};
use ember_core::{DomainError, Snowflake};
use tracing::{info, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Result of a like or super-like
#[derive(Debug, Clone)]
pub struct SwipeOutcome {
    pub is_match: bool,
    pub matched: Option<Match>,
    pub conversation: Option<Conversation>,
}

impl SwipeOutcome {
    fn no_match() -> Self {
        Self {
            is_match: false,
            matched: None,
            conversation: None,
        }
    }
}

/// Result of a super-like, including the remaining daily allowance
#[derive(Debug, Clone)]
pub struct SuperLikeOutcome {
    pub outcome: SwipeOutcome,
    pub remaining: i32,
}

/// Swipe service
pub struct SwipeService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SwipeService<'a> {
    /// Create a new SwipeService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Like a user (swipe right)
    #[instrument(skip(self))]
    pub async fn like(&self, swiper_id: Snowflake, target_id: Snowflake) -> ServiceResult<SwipeOutcome> {
        self.check_new_pair(swiper_id, target_id).await?;
        self.require_target(target_id).await?;

        let swipe = Swipe::new(self.ctx.generate_id(), swiper_id, target_id, SwipeKind::Like);
        self.ctx.swipe_repo().create(&swipe).await?;

        self.detect_match(swiper_id, target_id).await
    }

    /// Pass on a user (swipe left)
    #[instrument(skip(self))]
    pub async fn pass(&self, swiper_id: Snowflake, target_id: Snowflake) -> ServiceResult<()> {
        self.check_new_pair(swiper_id, target_id).await?;

        let swipe = Swipe::new(self.ctx.generate_id(), swiper_id, target_id, SwipeKind::Pass);
        self.ctx.swipe_repo().create(&swipe).await?;

        Ok(())
    }

    /// Super-like a user, consuming one unit of the daily quota
    #[instrument(skip(self))]
    pub async fn super_like(
        &self,
        swiper_id: Snowflake,
        target_id: Snowflake,
    ) -> ServiceResult<SuperLikeOutcome> {
        let swiper = self
            .ctx
            .user_repo()
            .find_by_id(swiper_id)
            .await?
            .ok_or(DomainError::UserNotFound(swiper_id))?;

        // Refill lazily when the stored reset timestamp has passed
        let now = Utc::now();
        if swiper.super_likes_reset_at.is_none_or(|reset| reset < now) {
            self.ctx
                .user_repo()
                .refill_super_likes(swiper_id, DAILY_SUPER_LIKES, next_utc_midnight(now))
                .await?;
        }

        self.check_new_pair(swiper_id, target_id).await?;
        self.require_target(target_id).await?;

        // Conditional decrement: concurrent requests cannot overspend
        if !self.ctx.user_repo().consume_super_like(swiper_id).await? {
            return Err(DomainError::SuperLikeQuotaExhausted.into());
        }

        let swipe = Swipe::new(
            self.ctx.generate_id(),
            swiper_id,
            target_id,
            SwipeKind::SuperLike,
        );
        self.ctx.swipe_repo().create(&swipe).await?;

        let outcome = self.detect_match(swiper_id, target_id).await?;

        let remaining = self
            .ctx
            .user_repo()
            .find_by_id(swiper_id)
            .await?
            .map_or(0, |u| u.super_likes_remaining);

        Ok(SuperLikeOutcome { outcome, remaining })
    }

    /// Undo the most recent swipe (premium only)
    #[instrument(skip(self))]
    pub async fn undo_last(&self, user_id: Snowflake) -> ServiceResult<Swipe> {
        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;

        let now = Utc::now();
        if !user.is_premium {
            return Err(DomainError::PremiumRequired.into());
        }
        if user.premium_expires_at.is_some_and(|exp| exp < now) {
            // Lazily flip the flag when the subscription has lapsed
            self.ctx.user_repo().set_premium(user_id, false).await?;
            return Err(DomainError::PremiumExpired.into());
        }

        let last_swipe = self
            .ctx
            .swipe_repo()
            .find_latest_by_swiper(user_id)
            .await?
            .ok_or(DomainError::NoSwipeToUndo)?;

        if last_swipe.kind.is_positive() {
            if let Some(undone) = self
                .ctx
                .match_repo()
                .deactivate_between(user_id, last_swipe.swiped_id)
                .await?
            {
                self.ctx
                    .conversation_repo()
                    .delete_by_match(undone.id)
                    .await?;

                info!(match_id = %undone.id, "Match undone by swipe undo");
            }
        }

        self.ctx.swipe_repo().delete(last_swipe.id).await?;

        info!(swipe_id = %last_swipe.id, user_id = %user_id, "Swipe undone");

        Ok(last_swipe)
    }

    /// Fail with a conflict when the ordered pair has already been swiped
    async fn check_new_pair(&self, swiper_id: Snowflake, target_id: Snowflake) -> ServiceResult<()> {
        if swiper_id == target_id {
            return Err(DomainError::SelfSwipe.into());
        }

        if self
            .ctx
            .swipe_repo()
            .find_pair(swiper_id, target_id)
            .await?
            .is_some()
        {
            return Err(DomainError::AlreadySwiped.into());
        }

        Ok(())
    }

    async fn require_target(&self, target_id: Snowflake) -> ServiceResult<()> {
        self.ctx
            .user_repo()
            .find_by_id(target_id)
            .await?
            .ok_or(DomainError::UserNotFound(target_id))?;
        Ok(())
    }

    /// Check for a reciprocal like and create the match + conversation
    async fn detect_match(
        &self,
        swiper_id: Snowflake,
        target_id: Snowflake,
    ) -> ServiceResult<SwipeOutcome> {
        let mutual = self
            .ctx
            .swipe_repo()
            .find_positive_from(target_id, swiper_id)
            .await?;

        if mutual.is_none() {
            return Ok(SwipeOutcome::no_match());
        }

        let record = Match::new(self.ctx.generate_id(), swiper_id, target_id);
        let conversation =
            Conversation::new(self.ctx.generate_id(), record.id, swiper_id, target_id);

        // Idempotent per unordered pair: a concurrent mutual like adopts the
        // winner's match instead of creating a second one
        let created = self
            .ctx
            .match_repo()
            .create_with_conversation(&record, &conversation)
            .await?;

        if created.created {
            info!(
                match_id = %created.record.id,
                user1 = %swiper_id,
                user2 = %target_id,
                "Match created"
            );
        }

        Ok(SwipeOutcome {
            is_match: true,
            matched: Some(created.record),
            conversation: Some(created.conversation),
        })
    }
}

/// Midnight UTC of the next day
fn next_utc_midnight(now: DateTime<Utc>) -> DateTime<Utc> {
    let tomorrow = now.date_naive() + Days::new(1);
    Utc.with_ymd_and_hms(tomorrow.year(), tomorrow.month(), tomorrow.day(), 0, 0, 0)
        .single()
        .unwrap_or(now)
}
