//! Conversation service
//!
//! Listing, membership checks, read-marking, pins, and mutes.

use chrono::{Duration, Utc};
use ember_core::entities::{Conversation, PinnedMessage, User, MAX_PINNED_MESSAGES};
use ember_core::{DomainError, Snowflake};
use tracing::{info, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::matches::LastMessage;

/// A conversation with the counterpart user and the caller's view of it
#[derive(Debug, Clone)]
pub struct ConversationSummary {
    pub conversation: Conversation,
    pub other_user: User,
    pub unread_count: i32,
    pub last_message: Option<LastMessage>,
    pub is_muted: bool,
    pub muted_until: Option<chrono::DateTime<chrono::Utc>>,
}

/// Conversation service
pub struct ConversationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ConversationService<'a> {
    /// Create a new ConversationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Conversations for a user, most recently active first
    #[instrument(skip(self))]
    pub async fn get_conversations(
        &self,
        user_id: Snowflake,
        limit: usize,
        offset: usize,
    ) -> ServiceResult<(Vec<ConversationSummary>, usize)> {
        let conversations = self.ctx.conversation_repo().find_for_user(user_id).await?;
        let now = Utc::now();

        let mut results = Vec::new();
        for conversation in conversations {
            let other_id = conversation.other_user_id(user_id);
            let Some(other_user) = self.ctx.user_repo().find_by_id(other_id).await? else {
                continue;
            };

            let last_message = match (
                conversation.last_message_id,
                conversation.last_message_content.clone(),
                conversation.last_message_sender_id,
                conversation.last_message_at,
            ) {
                (Some(id), Some(content), Some(sender_id), Some(sent_at)) => Some(LastMessage {
                    id,
                    content,
                    sender_id,
                    sent_at,
                }),
                _ => None,
            };

            let unread_count = conversation.unread_count_for(user_id);
            let is_muted = conversation.is_muted_for(user_id, now);
            let muted_until = conversation.muted_until_for(user_id).filter(|_| is_muted);

            results.push(ConversationSummary {
                conversation,
                other_user,
                unread_count,
                last_message,
                is_muted,
                muted_until,
            });
        }

        let total = results.len();
        let page = results.into_iter().skip(offset).take(limit).collect();

        Ok((page, total))
    }

    /// Fetch a conversation, verifying the caller participates in it
    #[instrument(skip(self))]
    pub async fn get_conversation(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Conversation> {
        let conversation = self
            .ctx
            .conversation_repo()
            .find_by_id(conversation_id)
            .await?
            .ok_or(DomainError::ConversationNotFound(conversation_id))?;

        if !conversation.has_participant(user_id) {
            return Err(DomainError::NotParticipant.into());
        }

        Ok(conversation)
    }

    /// Fetch the conversation belonging to a match
    #[instrument(skip(self))]
    pub async fn get_conversation_by_match(
        &self,
        match_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Conversation> {
        let conversation = self
            .ctx
            .conversation_repo()
            .find_by_match(match_id)
            .await?
            .ok_or(DomainError::MatchNotFound(match_id))?;

        if !conversation.has_participant(user_id) {
            return Err(DomainError::NotParticipant.into());
        }

        Ok(conversation)
    }

    /// Mark messages as read and reset the caller's unread counter
    ///
    /// Only messages in the given set, belonging to the conversation, and not
    /// sent by the caller are flipped. The unread counter resets regardless of
    /// whether any message ID matched.
    #[instrument(skip(self, message_ids))]
    pub async fn mark_read(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
        message_ids: &[Snowflake],
    ) -> ServiceResult<u64> {
        let conversation = self.get_conversation(conversation_id, user_id).await?;

        let updated = self
            .ctx
            .message_repo()
            .mark_read(conversation.id, message_ids, user_id)
            .await?;

        self.ctx
            .conversation_repo()
            .reset_unread(conversation.id, user_id)
            .await?;

        Ok(updated)
    }

    /// Pin a message to the conversation
    #[instrument(skip(self))]
    pub async fn pin_message(
        &self,
        conversation_id: Snowflake,
        message_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Conversation> {
        let mut conversation = self.get_conversation(conversation_id, user_id).await?;

        let message = self
            .ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .filter(|m| m.conversation_id == conversation.id)
            .ok_or(DomainError::MessageNotFound(message_id))?;

        if conversation.is_pinned(message_id) {
            return Err(DomainError::AlreadyPinned.into());
        }
        if conversation.pinned_messages.len() >= MAX_PINNED_MESSAGES {
            return Err(DomainError::PinLimitReached {
                max: MAX_PINNED_MESSAGES,
            }
            .into());
        }

        conversation.pinned_messages.push(PinnedMessage {
            message_id,
            content: message.preview(),
            pinned_by: user_id,
            pinned_at: Utc::now(),
        });

        self.ctx
            .conversation_repo()
            .set_pinned(conversation.id, &conversation.pinned_messages)
            .await?;

        info!(conversation_id = %conversation_id, message_id = %message_id, "Message pinned");

        Ok(conversation)
    }

    /// Unpin a message; unpinning an absent ID is a no-op success
    #[instrument(skip(self))]
    pub async fn unpin_message(
        &self,
        conversation_id: Snowflake,
        message_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Conversation> {
        let mut conversation = self.get_conversation(conversation_id, user_id).await?;

        let before = conversation.pinned_messages.len();
        conversation
            .pinned_messages
            .retain(|p| p.message_id != message_id);

        if conversation.pinned_messages.len() != before {
            self.ctx
                .conversation_repo()
                .set_pinned(conversation.id, &conversation.pinned_messages)
                .await?;
        }

        Ok(conversation)
    }

    /// Mute, remute, or unmute the conversation for the caller
    ///
    /// `Some(0)` clears the mute, `None` mutes indefinitely, a positive value
    /// mutes for that many hours.
    #[instrument(skip(self))]
    pub async fn mute_conversation(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
        duration_hours: Option<i64>,
    ) -> ServiceResult<Conversation> {
        let mut conversation = self.get_conversation(conversation_id, user_id).await?;

        let now = Utc::now();
        let muted_until = match duration_hours {
            Some(0) => None,
            Some(hours) if hours > 0 => Some(now + Duration::hours(hours)),
            Some(_) => {
                return Err(DomainError::ValidationError(
                    "Mute duration cannot be negative".to_string(),
                )
                .into())
            }
            None => Some(Conversation::mute_forever_expiry(now)),
        };

        self.ctx
            .conversation_repo()
            .set_mute(conversation.id, user_id, muted_until)
            .await?;

        if conversation.user1_id == user_id {
            conversation.user1_muted_until = muted_until;
        } else {
            conversation.user2_muted_until = muted_until;
        }

        Ok(conversation)
    }
}
