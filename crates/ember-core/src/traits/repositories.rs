//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Operations that the concurrency model
//! requires to be atomic (conditional super-like decrement, unread-counter
//! updates, match-plus-conversation creation) are expressed as single
//! repository calls rather than read-then-write sequences.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{
    Block, Conversation, Gender, Match, Message, PinnedMessage, Reaction, Swipe, User,
};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

/// Filter for the discovery candidate pool
#[derive(Debug, Clone)]
pub struct CandidateQuery {
    /// Candidate's gender must equal the seeker's looking-for
    pub gender: Gender,
    /// Candidate's looking-for must equal the seeker's gender
    pub looking_for: Gender,
    pub min_age: i32,
    pub max_age: i32,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Check if email is already taken
    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Create a new user
    async fn create(&self, user: &User) -> RepoResult<()>;

    /// Update an existing user (full profile write)
    async fn update(&self, user: &User) -> RepoResult<()>;

    /// Delete a user
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Set online flag and last-active timestamp
    async fn set_presence(
        &self,
        id: Snowflake,
        online: bool,
        last_active: DateTime<Utc>,
    ) -> RepoResult<()>;

    /// Atomically consume one super like if any remain
    ///
    /// Returns `false` without modifying anything when the counter is
    /// already zero.
    async fn consume_super_like(&self, id: Snowflake) -> RepoResult<bool>;

    /// Refill the super-like counter and advance the reset timestamp
    async fn refill_super_likes(
        &self,
        id: Snowflake,
        remaining: i32,
        reset_at: DateTime<Utc>,
    ) -> RepoResult<()>;

    /// Set the premium flag (used to lazily expire subscriptions)
    async fn set_premium(&self, id: Snowflake, is_premium: bool) -> RepoResult<()>;

    /// Users matching the discovery preference filter with discovery enabled
    async fn find_candidates(&self, query: &CandidateQuery) -> RepoResult<Vec<User>>;
}

// ============================================================================
// Swipe Repository
// ============================================================================

#[async_trait]
pub trait SwipeRepository: Send + Sync {
    /// Find the swipe for an ordered (swiper, swiped) pair
    async fn find_pair(&self, swiper_id: Snowflake, swiped_id: Snowflake)
        -> RepoResult<Option<Swipe>>;

    /// Find a like or super-like from `swiper_id` toward `swiped_id`
    async fn find_positive_from(
        &self,
        swiper_id: Snowflake,
        swiped_id: Snowflake,
    ) -> RepoResult<Option<Swipe>>;

    /// Record a swipe
    async fn create(&self, swipe: &Swipe) -> RepoResult<()>;

    /// Delete a swipe (undo)
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Most recent swipe by a user (created_at desc, id desc tie-break)
    async fn find_latest_by_swiper(&self, swiper_id: Snowflake) -> RepoResult<Option<Swipe>>;

    /// IDs of every user the given user has already swiped on
    async fn swiped_ids(&self, swiper_id: Snowflake) -> RepoResult<Vec<Snowflake>>;
}

// ============================================================================
// Match Repository
// ============================================================================

/// Result of an idempotent match-plus-conversation creation
#[derive(Debug, Clone)]
pub struct CreatedMatch {
    pub record: Match,
    pub conversation: Conversation,
    /// False when a concurrent creation won and the existing pair was adopted
    pub created: bool,
}

#[async_trait]
pub trait MatchRepository: Send + Sync {
    /// Find match by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Match>>;

    /// Find the active match for an unordered user pair
    async fn find_active_between(
        &self,
        user_a: Snowflake,
        user_b: Snowflake,
    ) -> RepoResult<Option<Match>>;

    /// Create a match and its conversation in one transaction
    ///
    /// The store guarantees at most one active match per unordered pair;
    /// when a concurrent creation already exists, the existing match and
    /// conversation are returned with `created = false`.
    async fn create_with_conversation(
        &self,
        record: &Match,
        conversation: &Conversation,
    ) -> RepoResult<CreatedMatch>;

    /// Active matches for a user, newest first
    async fn find_for_user(&self, user_id: Snowflake) -> RepoResult<Vec<Match>>;

    /// Deactivate a match
    async fn deactivate(&self, id: Snowflake) -> RepoResult<()>;

    /// Deactivate the active match between two users, returning it if present
    async fn deactivate_between(
        &self,
        user_a: Snowflake,
        user_b: Snowflake,
    ) -> RepoResult<Option<Match>>;

    /// Mark a match as seen by one participant
    async fn mark_seen(&self, id: Snowflake, user_id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Conversation Repository
// ============================================================================

#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Find conversation by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Conversation>>;

    /// Find the conversation belonging to a match
    async fn find_by_match(&self, match_id: Snowflake) -> RepoResult<Option<Conversation>>;

    /// Conversations involving a user, most recently updated first
    async fn find_for_user(&self, user_id: Snowflake) -> RepoResult<Vec<Conversation>>;

    /// IDs of every conversation involving a user (for live subscriptions)
    async fn ids_for_user(&self, user_id: Snowflake) -> RepoResult<Vec<Snowflake>>;

    /// Record a sent message: overwrite the last-message cache, bump
    /// `updated_at`, and increment the recipient's unread counter, all in
    /// one atomic write
    #[allow(clippy::too_many_arguments)]
    async fn record_message(
        &self,
        id: Snowflake,
        recipient_id: Snowflake,
        message_id: Snowflake,
        preview: &str,
        sender_id: Snowflake,
        sent_at: DateTime<Utc>,
    ) -> RepoResult<()>;

    /// Atomically reset one participant's unread counter to zero
    async fn reset_unread(&self, id: Snowflake, user_id: Snowflake) -> RepoResult<()>;

    /// Set (or clear) one participant's mute expiry
    async fn set_mute(
        &self,
        id: Snowflake,
        user_id: Snowflake,
        muted_until: Option<DateTime<Utc>>,
    ) -> RepoResult<()>;

    /// Replace the pinned-message list
    async fn set_pinned(&self, id: Snowflake, pinned: &[PinnedMessage]) -> RepoResult<()>;

    /// Delete a conversation
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Delete the conversation belonging to a match, if any
    async fn delete_by_match(&self, match_id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Message Repository
// ============================================================================

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Find message by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>>;

    /// Persist a new message
    async fn create(&self, message: &Message) -> RepoResult<()>;

    /// Update content after an edit
    async fn update_content(
        &self,
        id: Snowflake,
        content: &str,
        edited_at: DateTime<Utc>,
    ) -> RepoResult<()>;

    /// Soft-delete: replace content with a placeholder and flag as deleted
    async fn soft_delete(
        &self,
        id: Snowflake,
        placeholder: &str,
        deleted_at: DateTime<Utc>,
    ) -> RepoResult<()>;

    /// Replace the reaction list
    async fn set_reactions(&self, id: Snowflake, reactions: &[Reaction]) -> RepoResult<()>;

    /// Flip status to read for the given messages in a conversation,
    /// excluding any sent by `reader_id`; returns the number updated
    async fn mark_read(
        &self,
        conversation_id: Snowflake,
        message_ids: &[Snowflake],
        reader_id: Snowflake,
    ) -> RepoResult<u64>;

    /// Non-deleted messages in a conversation, newest first, strictly older
    /// than `before` when given
    async fn list_page(
        &self,
        conversation_id: Snowflake,
        before: Option<DateTime<Utc>>,
        limit: i64,
    ) -> RepoResult<Vec<Message>>;
}

// ============================================================================
// Block Repository
// ============================================================================

#[async_trait]
pub trait BlockRepository: Send + Sync {
    /// Find a block for an ordered (blocker, blocked) pair
    async fn find(&self, blocker_id: Snowflake, blocked_id: Snowflake)
        -> RepoResult<Option<Block>>;

    /// Record a block
    async fn create(&self, block: &Block) -> RepoResult<()>;

    /// Remove a block
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Whether a block exists in either direction between two users
    async fn exists_between(&self, user_a: Snowflake, user_b: Snowflake) -> RepoResult<bool>;

    /// All blocks involving a user in either direction
    async fn involving(&self, user_id: Snowflake) -> RepoResult<Vec<Block>>;

    /// Blocks created by a user
    async fn list_by_blocker(&self, blocker_id: Snowflake) -> RepoResult<Vec<Block>>;
}
