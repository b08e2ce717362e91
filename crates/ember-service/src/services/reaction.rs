//! Reaction service
//!
//! At most one reaction per user per message, last-write-wins.

use chrono::Utc;
use ember_core::entities::{Message, Reaction};
use ember_core::{DomainError, Snowflake};
use tracing::instrument;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Reaction service
pub struct ReactionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionService<'a> {
    /// Create a new ReactionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Add (or replace) the caller's reaction on a message
    #[instrument(skip(self))]
    pub async fn add_reaction(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
        emoji: String,
    ) -> ServiceResult<Message> {
        let mut message = self.require_member_message(message_id, user_id).await?;

        // Replace any prior reaction by the same user
        message.reactions.retain(|r| r.user_id != user_id);
        message.reactions.push(Reaction {
            emoji,
            user_id,
            created_at: Utc::now(),
        });

        self.ctx
            .message_repo()
            .set_reactions(message.id, &message.reactions)
            .await?;

        Ok(message)
    }

    /// Remove the caller's reaction; absent reactions are a no-op success
    #[instrument(skip(self))]
    pub async fn remove_reaction(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Message> {
        let mut message = self.require_member_message(message_id, user_id).await?;

        let before = message.reactions.len();
        message.reactions.retain(|r| r.user_id != user_id);

        if message.reactions.len() != before {
            self.ctx
                .message_repo()
                .set_reactions(message.id, &message.reactions)
                .await?;
        }

        Ok(message)
    }

    /// Fetch a message and verify the caller participates in its conversation
    async fn require_member_message(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Message> {
        let message = self
            .ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?;

        let conversation = self
            .ctx
            .conversation_repo()
            .find_by_id(message.conversation_id)
            .await?
            .ok_or(DomainError::ConversationNotFound(message.conversation_id))?;

        if !conversation.has_participant(user_id) {
            return Err(DomainError::NotParticipant.into());
        }

        Ok(message)
    }
}
