//! Message entity - a chat message with reactions, replies, and soft deletion

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Window during which a text message may still be edited
pub const EDIT_WINDOW_HOURS: i64 = 48;

/// Maximum length of content previews (conversation cache, reply snapshots)
pub const PREVIEW_MAX_CHARS: usize = 100;

/// Content substituted into soft-deleted messages
pub const DELETED_PLACEHOLDER: &str = "This message was deleted";

/// Kind of message payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Text,
    Image,
    Video,
    Audio,
    Voice,
    Gif,
    Sticker,
    File,
}

impl MessageKind {
    /// Stable string form used in storage and on the wire
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Voice => "voice",
            Self::Gif => "gif",
            Self::Sticker => "sticker",
            Self::File => "file",
        }
    }

    /// Parse from the stored string form
    #[must_use]
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "text" => Some(Self::Text),
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            "audio" => Some(Self::Audio),
            "voice" => Some(Self::Voice),
            "gif" => Some(Self::Gif),
            "sticker" => Some(Self::Sticker),
            "file" => Some(Self::File),
            _ => None,
        }
    }

    /// Fixed preview label shown in conversation lists for non-text kinds
    #[must_use]
    pub const fn preview_label(self) -> Option<&'static str> {
        match self {
            Self::Text => None,
            Self::Image => Some("\u{1F4F7} Photo"),
            Self::Video => Some("\u{1F3A5} Video"),
            Self::Audio => Some("\u{1F3B5} Audio"),
            Self::Voice => Some("\u{1F3A4} Voice message"),
            Self::Gif => Some("GIF"),
            Self::Sticker => Some("Sticker"),
            Self::File => Some("\u{1F4CE} File"),
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery status of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    Sending,
    Sent,
    Delivered,
    Read,
    Failed,
}

impl MessageStatus {
    /// Stable string form used in storage and on the wire
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sending => "sending",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Read => "read",
            Self::Failed => "failed",
        }
    }

    /// Parse from the stored string form
    #[must_use]
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "sending" => Some(Self::Sending),
            "sent" => Some(Self::Sent),
            "delivered" => Some(Self::Delivered),
            "read" => Some(Self::Read),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// A single emoji reaction; at most one per user per message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub emoji: String,
    pub user_id: Snowflake,
    pub created_at: DateTime<Utc>,
}

/// Media metadata for non-text messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MediaInfo {
    /// Duration in seconds (audio/video/voice)
    pub duration: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub thumbnail_url: Option<String>,
    /// Size in bytes
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
}

/// Immutable snapshot of a replied-to message, captured at send time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyPreview {
    pub message_id: Snowflake,
    pub sender_id: Snowflake,
    pub sender_name: String,
    /// Truncated content preview
    pub content: String,
    pub kind: MessageKind,
}

/// Message entity
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: Snowflake,
    pub conversation_id: Snowflake,
    pub sender_id: Snowflake,
    pub content: String,
    pub kind: MessageKind,
    pub status: MessageStatus,
    pub sent_at: DateTime<Utc>,
    pub media_url: Option<String>,
    pub media_info: Option<MediaInfo>,
    pub reply_to: Option<ReplyPreview>,
    pub reactions: Vec<Reaction>,
    pub is_edited: bool,
    pub edited_at: Option<DateTime<Utc>>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Message {
    /// Create a new Message with `Sent` status
    pub fn new(
        id: Snowflake,
        conversation_id: Snowflake,
        sender_id: Snowflake,
        content: String,
        kind: MessageKind,
    ) -> Self {
        Self {
            id,
            conversation_id,
            sender_id,
            content,
            kind,
            status: MessageStatus::Sent,
            sent_at: Utc::now(),
            media_url: None,
            media_info: None,
            reply_to: None,
            reactions: Vec::new(),
            is_edited: false,
            edited_at: None,
            is_deleted: false,
            deleted_at: None,
        }
    }

    /// Whether the message can still be edited at `now`
    ///
    /// Only text messages are editable, and only strictly within
    /// [`EDIT_WINDOW_HOURS`] of `sent_at` (the boundary itself is closed).
    #[must_use]
    pub fn editable_at(&self, now: DateTime<Utc>) -> bool {
        self.kind == MessageKind::Text && now - self.sent_at < Duration::hours(EDIT_WINDOW_HOURS)
    }

    /// The user's current reaction, if any
    #[must_use]
    pub fn reaction_by(&self, user_id: Snowflake) -> Option<&Reaction> {
        self.reactions.iter().find(|r| r.user_id == user_id)
    }

    /// Preview string for conversation lists and reply snapshots
    ///
    /// Text content is truncated to [`PREVIEW_MAX_CHARS`] characters; other
    /// kinds use their fixed label.
    #[must_use]
    pub fn preview(&self) -> String {
        match self.kind.preview_label() {
            Some(label) => label.to_string(),
            None => truncate_chars(&self.content, PREVIEW_MAX_CHARS),
        }
    }
}

/// Truncate a string to at most `max` characters on a char boundary
#[must_use]
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
