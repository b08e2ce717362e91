//! Conversation entity <-> model mapper

use ember_core::entities::Conversation;
use ember_core::value_objects::Snowflake;

use crate::models::ConversationModel;

impl From<ConversationModel> for Conversation {
    fn from(model: ConversationModel) -> Self {
        Conversation {
            id: Snowflake::new(model.id),
            match_id: Snowflake::new(model.match_id),
            user1_id: Snowflake::new(model.user1_id),
            user2_id: Snowflake::new(model.user2_id),
            last_message_id: model.last_message_id.map(Snowflake::new),
            last_message_content: model.last_message_content,
            last_message_sender_id: model.last_message_sender_id.map(Snowflake::new),
            last_message_at: model.last_message_at,
            user1_unread_count: model.user1_unread_count,
            user2_unread_count: model.user2_unread_count,
            pinned_messages: model.pinned_messages.0,
            user1_muted_until: model.user1_muted_until,
            user2_muted_until: model.user2_muted_until,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
