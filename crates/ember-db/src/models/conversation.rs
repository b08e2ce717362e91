//! Conversation database model

use chrono::{DateTime, Utc};
use ember_core::entities::PinnedMessage;
use sqlx::types::Json;
use sqlx::FromRow;

/// Database model for the conversations table
#[derive(Debug, Clone, FromRow)]
pub struct ConversationModel {
    pub id: i64,
    pub match_id: i64,
    pub user1_id: i64,
    pub user2_id: i64,
    pub last_message_id: Option<i64>,
    pub last_message_content: Option<String>,
    pub last_message_sender_id: Option<i64>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub user1_unread_count: i32,
    pub user2_unread_count: i32,
    pub pinned_messages: Json<Vec<PinnedMessage>>,
    pub user1_muted_until: Option<DateTime<Utc>>,
    pub user2_muted_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column list shared by every conversation SELECT
pub const CONVERSATION_COLUMNS: &str = "id, match_id, user1_id, user2_id, last_message_id, \
    last_message_content, last_message_sender_id, last_message_at, user1_unread_count, \
    user2_unread_count, pinned_messages, user1_muted_until, user2_muted_until, \
    created_at, updated_at";
