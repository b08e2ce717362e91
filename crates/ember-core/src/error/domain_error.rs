//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    #[error("Match not found: {0}")]
    MatchNotFound(Snowflake),

    #[error("Conversation not found: {0}")]
    ConversationNotFound(Snowflake),

    #[error("Message not found: {0}")]
    MessageNotFound(Snowflake),

    #[error("No swipe to undo")]
    NoSwipeToUndo,

    #[error("User is not blocked")]
    BlockNotFound,

    #[error("Photo not found: {0}")]
    PhotoNotFound(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("No super likes remaining today")]
    SuperLikeQuotaExhausted,

    #[error("Message can no longer be edited")]
    EditWindowExpired,

    #[error("Only text messages can be edited")]
    NotEditableKind,

    #[error("Message is already pinned")]
    AlreadyPinned,

    #[error("Pinned message limit reached: max {max}")]
    PinLimitReached { max: usize },

    #[error("Cannot block yourself")]
    SelfBlock,

    #[error("Cannot swipe on yourself")]
    SelfSwipe,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not a participant of this conversation")]
    NotParticipant,

    #[error("Not a participant of this match")]
    NotMatchParticipant,

    #[error("Only the sender can modify a message")]
    NotMessageSender,

    #[error("Undo requires an active premium subscription")]
    PremiumRequired,

    #[error("Premium subscription has expired")]
    PremiumExpired,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Already swiped on this user")]
    AlreadySwiped,

    #[error("User already blocked")]
    AlreadyBlocked,

    #[error("Email already in use")]
    EmailAlreadyExists,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::MatchNotFound(_) => "UNKNOWN_MATCH",
            Self::ConversationNotFound(_) => "UNKNOWN_CONVERSATION",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",
            Self::NoSwipeToUndo => "NO_SWIPE_TO_UNDO",
            Self::BlockNotFound => "NOT_BLOCKED",
            Self::PhotoNotFound(_) => "UNKNOWN_PHOTO",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::SuperLikeQuotaExhausted => "SUPER_LIKE_QUOTA_EXCEEDED",
            Self::EditWindowExpired => "EDIT_WINDOW_EXPIRED",
            Self::NotEditableKind => "NOT_EDITABLE",
            Self::AlreadyPinned => "ALREADY_PINNED",
            Self::PinLimitReached { .. } => "PIN_LIMIT_REACHED",
            Self::SelfBlock => "SELF_BLOCK",
            Self::SelfSwipe => "SELF_SWIPE",

            // Authorization
            Self::NotParticipant => "NOT_PARTICIPANT",
            Self::NotMatchParticipant => "NOT_PARTICIPANT",
            Self::NotMessageSender => "NOT_MESSAGE_SENDER",
            Self::PremiumRequired => "PREMIUM_REQUIRED",
            Self::PremiumExpired => "PREMIUM_EXPIRED",

            // Conflict
            Self::AlreadySwiped => "ALREADY_SWIPED",
            Self::AlreadyBlocked => "ALREADY_BLOCKED",
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::ExternalServiceError(_) => "EXTERNAL_SERVICE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::MatchNotFound(_)
                | Self::ConversationNotFound(_)
                | Self::MessageNotFound(_)
                | Self::NoSwipeToUndo
                | Self::BlockNotFound
                | Self::PhotoNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidEmail
                | Self::SuperLikeQuotaExhausted
                | Self::EditWindowExpired
                | Self::NotEditableKind
                | Self::AlreadyPinned
                | Self::PinLimitReached { .. }
                | Self::SelfBlock
                | Self::SelfSwipe
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotParticipant
                | Self::NotMatchParticipant
                | Self::NotMessageSender
                | Self::PremiumRequired
                | Self::PremiumExpired
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::AlreadySwiped | Self::AlreadyBlocked | Self::EmailAlreadyExists
        )
    }
}
