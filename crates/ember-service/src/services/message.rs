//! Message service
//!
//! Message lifecycle: send (with reply snapshots), paginate, edit, delete.

use chrono::Utc;
use ember_core::entities::{
    truncate_chars, MediaInfo, Message, MessageKind, ReplyPreview, DELETED_PLACEHOLDER,
    PREVIEW_MAX_CHARS,
};
use ember_core::{DomainError, Snowflake};
use tracing::{info, instrument, warn};

use super::context::ServiceContext;
use super::conversation::ConversationService;
use super::error::ServiceResult;

/// Input for sending a message
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub content: String,
    pub kind: MessageKind,
    pub media_url: Option<String>,
    pub media_info: Option<MediaInfo>,
    pub reply_to_id: Option<Snowflake>,
}

impl NewMessage {
    /// A plain text message
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: MessageKind::Text,
            media_url: None,
            media_info: None,
            reply_to_id: None,
        }
    }
}

/// Message service
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    /// Create a new MessageService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Send a message in a conversation
    ///
    /// Persists the message, snapshots the reply preview when replying, and
    /// updates the conversation's last-message cache plus the recipient's
    /// unread counter in one repository call.
    #[instrument(skip(self, input))]
    pub async fn send_message(
        &self,
        conversation_id: Snowflake,
        sender_id: Snowflake,
        input: NewMessage,
    ) -> ServiceResult<Message> {
        let conversation = ConversationService::new(self.ctx)
            .get_conversation(conversation_id, sender_id)
            .await?;

        let reply_to = match input.reply_to_id {
            Some(reply_id) => self.snapshot_reply(conversation.id, reply_id).await?,
            None => None,
        };

        let mut message = Message::new(
            self.ctx.generate_id(),
            conversation.id,
            sender_id,
            input.content,
            input.kind,
        );
        message.media_url = input.media_url;
        message.media_info = input.media_info;
        message.reply_to = reply_to;

        self.ctx.message_repo().create(&message).await?;

        let recipient_id = conversation.other_user_id(sender_id);
        self.ctx
            .conversation_repo()
            .record_message(
                conversation.id,
                recipient_id,
                message.id,
                &message.preview(),
                sender_id,
                message.sent_at,
            )
            .await?;

        info!(
            message_id = %message.id,
            conversation_id = %conversation.id,
            kind = %message.kind,
            "Message sent"
        );

        Ok(message)
    }

    /// Messages in a conversation, oldest first
    ///
    /// `before` is an exclusive upper bound (that message's timestamp). One
    /// extra row is fetched to compute `has_more`.
    #[instrument(skip(self))]
    pub async fn get_messages(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
        limit: i64,
        before: Option<Snowflake>,
    ) -> ServiceResult<(Vec<Message>, bool)> {
        let conversation = ConversationService::new(self.ctx)
            .get_conversation(conversation_id, user_id)
            .await?;

        let before_ts = match before {
            Some(id) => self
                .ctx
                .message_repo()
                .find_by_id(id)
                .await?
                .map(|m| m.sent_at),
            None => None,
        };

        let limit = limit.clamp(1, 100);
        let mut messages = self
            .ctx
            .message_repo()
            .list_page(conversation.id, before_ts, limit + 1)
            .await?;

        let has_more = messages.len() as i64 > limit;
        if has_more {
            messages.truncate(limit as usize);
        }

        // Repository returns newest first; flip to chronological order
        messages.reverse();

        Ok((messages, has_more))
    }

    /// Edit a text message within the edit window
    #[instrument(skip(self, new_content))]
    pub async fn edit_message(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
        new_content: String,
    ) -> ServiceResult<Message> {
        let mut message = self.require_message(message_id).await?;

        if message.sender_id != user_id {
            return Err(DomainError::NotMessageSender.into());
        }
        if message.kind != MessageKind::Text {
            return Err(DomainError::NotEditableKind.into());
        }

        let now = Utc::now();
        if !message.editable_at(now) {
            return Err(DomainError::EditWindowExpired.into());
        }

        self.ctx
            .message_repo()
            .update_content(message.id, &new_content, now)
            .await?;

        message.content = new_content;
        message.is_edited = true;
        message.edited_at = Some(now);

        info!(message_id = %message_id, "Message edited");

        Ok(message)
    }

    /// Soft-delete a message
    ///
    /// `for_everyone` is accepted for API compatibility but both paths behave
    /// identically: the content is replaced with a placeholder for all
    /// participants.
    #[instrument(skip(self))]
    pub async fn delete_message(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
        for_everyone: bool,
    ) -> ServiceResult<Message> {
        let mut message = self.require_message(message_id).await?;

        if message.sender_id != user_id {
            return Err(DomainError::NotMessageSender.into());
        }

        let now = Utc::now();
        self.ctx
            .message_repo()
            .soft_delete(message.id, DELETED_PLACEHOLDER, now)
            .await?;

        message.content = DELETED_PLACEHOLDER.to_string();
        message.is_deleted = true;
        message.deleted_at = Some(now);

        info!(message_id = %message_id, for_everyone, "Message deleted");

        Ok(message)
    }

    async fn require_message(&self, message_id: Snowflake) -> ServiceResult<Message> {
        Ok(self
            .ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?)
    }

    /// Capture an immutable preview of the replied-to message
    async fn snapshot_reply(
        &self,
        conversation_id: Snowflake,
        reply_id: Snowflake,
    ) -> ServiceResult<Option<ReplyPreview>> {
        let Some(original) = self.ctx.message_repo().find_by_id(reply_id).await? else {
            warn!(reply_id = %reply_id, "Replied-to message not found");
            return Ok(None);
        };

        if original.conversation_id != conversation_id {
            return Err(DomainError::ValidationError(
                "Replied-to message must be in the same conversation".to_string(),
            )
            .into());
        }

        let sender_name = self
            .ctx
            .user_repo()
            .find_by_id(original.sender_id)
            .await?
            .map_or_else(|| "Deleted user".to_string(), |u| u.name);

        Ok(Some(ReplyPreview {
            message_id: original.id,
            sender_id: original.sender_id,
            sender_name,
            content: truncate_chars(&original.content, PREVIEW_MAX_CHARS),
            kind: original.kind,
        }))
    }
}
