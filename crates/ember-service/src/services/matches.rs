//! Match service
//!
//! Listing, seen-state, and unmatching.

use ember_core::entities::{Match, User};
use ember_core::{DomainError, Snowflake};
use tracing::{info, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Denormalized last-message info attached to a match listing
#[derive(Debug, Clone)]
pub struct LastMessage {
    pub id: Snowflake,
    pub content: String,
    pub sender_id: Snowflake,
    pub sent_at: chrono::DateTime<chrono::Utc>,
}

/// A match with the counterpart user and conversation preview
#[derive(Debug, Clone)]
pub struct MatchSummary {
    pub record: Match,
    pub other_user: User,
    pub is_new: bool,
    pub last_message: Option<LastMessage>,
}

/// Match service
pub struct MatchService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MatchService<'a> {
    /// Create a new MatchService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Active matches for a user, newest first
    ///
    /// `new_only` keeps only matches the user has not yet seen. Pagination is
    /// applied after filtering; `total` is the post-filter count.
    #[instrument(skip(self))]
    pub async fn get_matches(
        &self,
        user_id: Snowflake,
        limit: usize,
        offset: usize,
        new_only: bool,
    ) -> ServiceResult<(Vec<MatchSummary>, usize)> {
        let matches = self.ctx.match_repo().find_for_user(user_id).await?;

        let mut results = Vec::new();
        for record in matches {
            let other_id = record.other_user_id(user_id);
            // Skip matches whose counterpart account no longer exists
            let Some(other_user) = self.ctx.user_repo().find_by_id(other_id).await? else {
                continue;
            };

            let is_new = record.is_new_for(user_id);
            if new_only && !is_new {
                continue;
            }

            let conversation = self.ctx.conversation_repo().find_by_match(record.id).await?;
            let last_message = conversation.and_then(|conv| {
                match (
                    conv.last_message_id,
                    conv.last_message_content,
                    conv.last_message_sender_id,
                    conv.last_message_at,
                ) {
                    (Some(id), Some(content), Some(sender_id), Some(sent_at)) => Some(LastMessage {
                        id,
                        content,
                        sender_id,
                        sent_at,
                    }),
                    _ => None,
                }
            });

            results.push(MatchSummary {
                record,
                other_user,
                is_new,
                last_message,
            });
        }

        let total = results.len();
        let page = results.into_iter().skip(offset).take(limit).collect();

        Ok((page, total))
    }

    /// Mark a match as seen by the caller
    #[instrument(skip(self))]
    pub async fn mark_seen(&self, user_id: Snowflake, match_id: Snowflake) -> ServiceResult<()> {
        let record = self.require_participant(user_id, match_id).await?;
        self.ctx.match_repo().mark_seen(record.id, user_id).await?;
        Ok(())
    }

    /// Unmatch: deactivate the match and delete its conversation
    #[instrument(skip(self))]
    pub async fn unmatch(&self, user_id: Snowflake, match_id: Snowflake) -> ServiceResult<()> {
        let record = self.require_participant(user_id, match_id).await?;

        self.ctx.match_repo().deactivate(record.id).await?;
        self.ctx.conversation_repo().delete_by_match(record.id).await?;

        info!(match_id = %match_id, user_id = %user_id, "Unmatched");

        Ok(())
    }

    async fn require_participant(
        &self,
        user_id: Snowflake,
        match_id: Snowflake,
    ) -> ServiceResult<Match> {
        let record = self
            .ctx
            .match_repo()
            .find_by_id(match_id)
            .await?
            .ok_or(DomainError::MatchNotFound(match_id))?;

        if !record.has_participant(user_id) {
            return Err(DomainError::NotMatchParticipant.into());
        }

        Ok(record)
    }
}
