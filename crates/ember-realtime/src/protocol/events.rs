//! Wire protocol frames
//!
//! All frames are JSON objects of the form `{"event": ..., "data": ...}`.

use ember_core::Snowflake;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A conversation reference in an inbound frame
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationRef {
    pub conversation_id: Snowflake,
}

/// A live read receipt in an inbound frame
#[derive(Debug, Clone, Deserialize)]
pub struct ReadReceipt {
    pub conversation_id: Snowflake,
    #[serde(default)]
    pub message_ids: Vec<Snowflake>,
}

/// Inbound client frames
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    Ping,
    Typing(ConversationRef),
    StopTyping(ConversationRef),
    MessageRead(ReadReceipt),
    RecordingVoice(ConversationRef),
}

/// Outbound event names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Pong,
    NewMessage,
    MessageEdited,
    MessageDeleted,
    ReactionAdded,
    ReactionRemoved,
    MessagePinned,
    MessageUnpinned,
    NewMatch,
    UserOnline,
    UserOffline,
    UserTyping,
    UserStopTyping,
    UserRecordingVoice,
    MessageStatus,
}

impl EventKind {
    /// Wire name of the event
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pong => "pong",
            Self::NewMessage => "new_message",
            Self::MessageEdited => "message_edited",
            Self::MessageDeleted => "message_deleted",
            Self::ReactionAdded => "reaction_added",
            Self::ReactionRemoved => "reaction_removed",
            Self::MessagePinned => "message_pinned",
            Self::MessageUnpinned => "message_unpinned",
            Self::NewMatch => "new_match",
            Self::UserOnline => "user_online",
            Self::UserOffline => "user_offline",
            Self::UserTyping => "user_typing",
            Self::UserStopTyping => "user_stop_typing",
            Self::UserRecordingVoice => "user_recording_voice",
            Self::MessageStatus => "message_status",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outbound server frame
#[derive(Debug, Clone, Serialize)]
pub struct ServerEvent {
    pub event: EventKind,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub data: Value,
}

impl ServerEvent {
    /// Build a frame with a custom payload
    #[must_use]
    pub fn new(event: EventKind, data: Value) -> Self {
        Self { event, data }
    }

    /// Ping reply
    #[must_use]
    pub fn pong() -> Self {
        Self::new(EventKind::Pong, Value::Null)
    }

    /// A freshly persisted message
    #[must_use]
    pub fn new_message(conversation_id: Snowflake, message: Value) -> Self {
        Self::new(
            EventKind::NewMessage,
            json!({ "conversation_id": conversation_id, "message": message }),
        )
    }

    /// An edited message
    #[must_use]
    pub fn message_edited(conversation_id: Snowflake, message: Value) -> Self {
        Self::new(
            EventKind::MessageEdited,
            json!({ "conversation_id": conversation_id, "message": message }),
        )
    }

    /// A deleted message
    #[must_use]
    pub fn message_deleted(conversation_id: Snowflake, message_id: Snowflake) -> Self {
        Self::new(
            EventKind::MessageDeleted,
            json!({ "conversation_id": conversation_id, "message_id": message_id }),
        )
    }

    /// A reaction added to a message
    #[must_use]
    pub fn reaction_added(
        conversation_id: Snowflake,
        message_id: Snowflake,
        user_id: Snowflake,
        emoji: &str,
    ) -> Self {
        Self::new(
            EventKind::ReactionAdded,
            json!({
                "conversation_id": conversation_id,
                "message_id": message_id,
                "user_id": user_id,
                "emoji": emoji,
            }),
        )
    }

    /// A reaction removed from a message
    #[must_use]
    pub fn reaction_removed(
        conversation_id: Snowflake,
        message_id: Snowflake,
        user_id: Snowflake,
    ) -> Self {
        Self::new(
            EventKind::ReactionRemoved,
            json!({
                "conversation_id": conversation_id,
                "message_id": message_id,
                "user_id": user_id,
            }),
        )
    }

    /// A message pinned to a conversation
    #[must_use]
    pub fn message_pinned(
        conversation_id: Snowflake,
        message_id: Snowflake,
        pinned_by: Snowflake,
    ) -> Self {
        Self::new(
            EventKind::MessagePinned,
            json!({
                "conversation_id": conversation_id,
                "message_id": message_id,
                "pinned_by": pinned_by,
            }),
        )
    }

    /// A message unpinned from a conversation
    #[must_use]
    pub fn message_unpinned(
        conversation_id: Snowflake,
        message_id: Snowflake,
        unpinned_by: Snowflake,
    ) -> Self {
        Self::new(
            EventKind::MessageUnpinned,
            json!({
                "conversation_id": conversation_id,
                "message_id": message_id,
                "unpinned_by": unpinned_by,
            }),
        )
    }

    /// A new match, delivered to the counterpart
    #[must_use]
    pub fn new_match(data: Value) -> Self {
        Self::new(EventKind::NewMatch, data)
    }

    /// Presence transitions
    #[must_use]
    pub fn user_online(user_id: Snowflake) -> Self {
        Self::new(EventKind::UserOnline, json!({ "user_id": user_id }))
    }

    #[must_use]
    pub fn user_offline(user_id: Snowflake) -> Self {
        Self::new(EventKind::UserOffline, json!({ "user_id": user_id }))
    }

    /// Live typing indicators
    #[must_use]
    pub fn user_typing(conversation_id: Snowflake, user_id: Snowflake) -> Self {
        Self::new(
            EventKind::UserTyping,
            json!({ "conversation_id": conversation_id, "user_id": user_id }),
        )
    }

    #[must_use]
    pub fn user_stop_typing(conversation_id: Snowflake, user_id: Snowflake) -> Self {
        Self::new(
            EventKind::UserStopTyping,
            json!({ "conversation_id": conversation_id, "user_id": user_id }),
        )
    }

    #[must_use]
    pub fn user_recording_voice(conversation_id: Snowflake, user_id: Snowflake) -> Self {
        Self::new(
            EventKind::UserRecordingVoice,
            json!({ "conversation_id": conversation_id, "user_id": user_id }),
        )
    }

    /// Live read-status update (distinct from the persisted mark-read call)
    #[must_use]
    pub fn message_status(conversation_id: Snowflake, message_ids: &[Snowflake]) -> Self {
        Self::new(
            EventKind::MessageStatus,
            json!({
                "conversation_id": conversation_id,
                "message_ids": message_ids,
                "status": "read",
            }),
        )
    }

    /// Serialize to JSON text
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
