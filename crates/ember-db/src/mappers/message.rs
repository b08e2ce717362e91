//! Message entity <-> model mapper

use ember_core::entities::{Message, MessageKind, MessageStatus};
use ember_core::error::DomainError;
use ember_core::value_objects::Snowflake;

use crate::models::MessageModel;

impl TryFrom<MessageModel> for Message {
    type Error = DomainError;

    fn try_from(model: MessageModel) -> Result<Self, Self::Error> {
        Ok(Message {
            id: Snowflake::new(model.id),
            conversation_id: Snowflake::new(model.conversation_id),
            sender_id: Snowflake::new(model.sender_id),
            content: model.content,
            kind: MessageKind::from_str_opt(&model.kind).ok_or_else(|| {
                DomainError::DatabaseError(format!("invalid message kind: {}", model.kind))
            })?,
            status: MessageStatus::from_str_opt(&model.status).ok_or_else(|| {
                DomainError::DatabaseError(format!("invalid message status: {}", model.status))
            })?,
            sent_at: model.sent_at,
            media_url: model.media_url,
            media_info: model.media_info.map(|m| m.0),
            reply_to: model.reply_to.map(|r| r.0),
            reactions: model.reactions.0,
            is_edited: model.is_edited,
            edited_at: model.edited_at,
            is_deleted: model.is_deleted,
            deleted_at: model.deleted_at,
        })
    }
}
