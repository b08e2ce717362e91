//! Message database model

use chrono::{DateTime, Utc};
use ember_core::entities::{MediaInfo, Reaction, ReplyPreview};
use sqlx::types::Json;
use sqlx::FromRow;

/// Database model for the messages table
#[derive(Debug, Clone, FromRow)]
pub struct MessageModel {
    pub id: i64,
    pub conversation_id: i64,
    pub sender_id: i64,
    pub content: String,
    pub kind: String,
    pub status: String,
    pub sent_at: DateTime<Utc>,
    pub media_url: Option<String>,
    pub media_info: Option<Json<MediaInfo>>,
    pub reply_to: Option<Json<ReplyPreview>>,
    pub reactions: Json<Vec<Reaction>>,
    pub is_edited: bool,
    pub edited_at: Option<DateTime<Utc>>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Column list shared by every message SELECT
pub const MESSAGE_COLUMNS: &str = "id, conversation_id, sender_id, content, kind, status, \
    sent_at, media_url, media_info, reply_to, reactions, is_edited, edited_at, \
    is_deleted, deleted_at";
