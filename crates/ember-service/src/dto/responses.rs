//! Response DTOs

use chrono::{DateTime, Utc};
use ember_core::entities::{
    Conversation, Gender, Location, Match, MediaInfo, Message, MessageKind, MessageStatus, Photo,
    PinnedMessage, Reaction, ReplyPreview, User,
};
use ember_core::Snowflake;
use serde::Serialize;

use crate::services::{BlockedUser, Candidate, ConversationSummary, LastMessage, MatchSummary};

/// Pagination envelope
#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub has_more: bool,
}

impl Pagination {
    #[must_use]
    pub fn new(total: usize, limit: usize, offset: usize) -> Self {
        Self {
            total,
            limit,
            offset,
            has_more: offset + limit < total,
        }
    }
}

/// A page of items with its pagination envelope
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(items: Vec<T>, total: usize, limit: usize, offset: usize) -> Self {
        Self {
            items,
            pagination: Pagination::new(total, limit, offset),
        }
    }
}

/// Public view of a user
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Snowflake,
    pub name: String,
    pub age: i32,
    pub gender: Gender,
    pub looking_for: Gender,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub interests: Vec<String>,
    pub photos: Vec<Photo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub is_online: bool,
    pub is_verified: bool,
    pub last_active: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            age: user.age,
            gender: user.gender,
            looking_for: user.looking_for,
            bio: user.bio.clone(),
            interests: user.interests.clone(),
            photos: user.photos.clone(),
            location: user.location.clone(),
            is_online: user.is_online,
            is_verified: user.is_verified,
            last_active: user.last_active,
        }
    }
}

/// The caller's own account, including private fields
#[derive(Debug, Clone, Serialize)]
pub struct PrivateUserResponse {
    #[serde(flatten)]
    pub profile: UserResponse,
    pub email: String,
    pub discovery_enabled: bool,
    pub min_age: i32,
    pub max_age: i32,
    pub max_distance: i32,
    pub show_distance: bool,
    pub show_online_status: bool,
    pub super_likes_remaining: i32,
    pub is_premium: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premium_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for PrivateUserResponse {
    fn from(user: &User) -> Self {
        Self {
            profile: UserResponse::from(user),
            email: user.email.clone(),
            discovery_enabled: user.discovery_enabled,
            min_age: user.preferences.min_age,
            max_age: user.preferences.max_age,
            max_distance: user.preferences.max_distance,
            show_distance: user.preferences.show_distance,
            show_online_status: user.preferences.show_online_status,
            super_likes_remaining: user.super_likes_remaining,
            is_premium: user.is_premium,
            premium_expires_at: user.premium_expires_at,
            created_at: user.created_at,
        }
    }
}

/// Registration/login payload: account plus tokens
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub user: PrivateUserResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl AuthResponse {
    #[must_use]
    pub fn new(user: &User, tokens: ember_common::TokenPair) -> Self {
        Self {
            user: PrivateUserResponse::from(user),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: tokens.token_type,
            expires_in: tokens.expires_in,
        }
    }
}

/// A discovery candidate
#[derive(Debug, Clone, Serialize)]
pub struct CandidateResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_miles: Option<f64>,
    pub common_interests: Vec<String>,
}

impl From<&Candidate> for CandidateResponse {
    fn from(candidate: &Candidate) -> Self {
        Self {
            user: UserResponse::from(&candidate.user),
            distance_miles: candidate.distance_miles,
            common_interests: candidate.common_interests.clone(),
        }
    }
}

/// A match record
#[derive(Debug, Clone, Serialize)]
pub struct MatchResponse {
    pub id: Snowflake,
    pub user1_id: Snowflake,
    pub user2_id: Snowflake,
    pub matched_at: DateTime<Utc>,
    pub is_active: bool,
}

impl From<&Match> for MatchResponse {
    fn from(record: &Match) -> Self {
        Self {
            id: record.id,
            user1_id: record.user1_id,
            user2_id: record.user2_id,
            matched_at: record.matched_at,
            is_active: record.is_active,
        }
    }
}

/// Result of a like/pass/super-like
#[derive(Debug, Clone, Serialize)]
pub struct SwipeResponse {
    pub is_match: bool,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub matched: Option<MatchResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<Snowflake>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub super_likes_remaining: Option<i32>,
}

/// Last-message preview in listings
#[derive(Debug, Clone, Serialize)]
pub struct LastMessageResponse {
    pub id: Snowflake,
    pub content: String,
    pub sender_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

impl From<&LastMessage> for LastMessageResponse {
    fn from(last: &LastMessage) -> Self {
        Self {
            id: last.id,
            content: last.content.clone(),
            sender_id: last.sender_id,
            timestamp: last.sent_at,
        }
    }
}

/// A match with counterpart and preview
#[derive(Debug, Clone, Serialize)]
pub struct MatchSummaryResponse {
    #[serde(rename = "match")]
    pub matched: MatchResponse,
    pub other_user: UserResponse,
    pub is_new: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message: Option<LastMessageResponse>,
}

impl From<&MatchSummary> for MatchSummaryResponse {
    fn from(summary: &MatchSummary) -> Self {
        Self {
            matched: MatchResponse::from(&summary.record),
            other_user: UserResponse::from(&summary.other_user),
            is_new: summary.is_new,
            last_message: summary.last_message.as_ref().map(LastMessageResponse::from),
        }
    }
}

/// A conversation in the caller's inbox
#[derive(Debug, Clone, Serialize)]
pub struct ConversationResponse {
    pub id: Snowflake,
    pub match_id: Snowflake,
    pub other_user: UserResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message: Option<LastMessageResponse>,
    pub unread_count: i32,
    pub pinned_messages: Vec<PinnedMessage>,
    pub is_muted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub muted_until: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl From<&ConversationSummary> for ConversationResponse {
    fn from(summary: &ConversationSummary) -> Self {
        Self {
            id: summary.conversation.id,
            match_id: summary.conversation.match_id,
            other_user: UserResponse::from(&summary.other_user),
            last_message: summary.last_message.as_ref().map(LastMessageResponse::from),
            unread_count: summary.unread_count,
            pinned_messages: summary.conversation.pinned_messages.clone(),
            is_muted: summary.is_muted,
            muted_until: summary.muted_until,
            updated_at: summary.conversation.updated_at,
        }
    }
}

/// A message on the wire
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub id: Snowflake,
    pub conversation_id: Snowflake,
    pub sender_id: Snowflake,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub status: MessageStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_info: Option<MediaInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<ReplyPreview>,
    pub reactions: Vec<Reaction>,
    pub is_edited: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<DateTime<Utc>>,
    pub is_deleted: bool,
}

impl From<&Message> for MessageResponse {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id,
            conversation_id: message.conversation_id,
            sender_id: message.sender_id,
            content: message.content.clone(),
            kind: message.kind,
            status: message.status,
            timestamp: message.sent_at,
            media_url: message.media_url.clone(),
            media_info: message.media_info.clone(),
            reply_to: message.reply_to.clone(),
            reactions: message.reactions.clone(),
            is_edited: message.is_edited,
            edited_at: message.edited_at,
            is_deleted: message.is_deleted,
        }
    }
}

/// A page of messages with the scroll-back flag
#[derive(Debug, Clone, Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<MessageResponse>,
    pub has_more: bool,
}

/// A conversation without the caller-specific inbox fields
#[derive(Debug, Clone, Serialize)]
pub struct ConversationDetailResponse {
    pub id: Snowflake,
    pub match_id: Snowflake,
    pub user1_id: Snowflake,
    pub user2_id: Snowflake,
    pub pinned_messages: Vec<PinnedMessage>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Conversation> for ConversationDetailResponse {
    fn from(conversation: &Conversation) -> Self {
        Self {
            id: conversation.id,
            match_id: conversation.match_id,
            user1_id: conversation.user1_id,
            user2_id: conversation.user2_id,
            pinned_messages: conversation.pinned_messages.clone(),
            updated_at: conversation.updated_at,
        }
    }
}

/// A blocked user in the caller's block list
#[derive(Debug, Clone, Serialize)]
pub struct BlockedUserResponse {
    pub id: Snowflake,
    pub name: String,
    pub blocked_at: DateTime<Utc>,
}

impl From<&BlockedUser> for BlockedUserResponse {
    fn from(blocked: &BlockedUser) -> Self {
        Self {
            id: blocked.user_id,
            name: blocked.name.clone(),
            blocked_at: blocked.blocked_at,
        }
    }
}
