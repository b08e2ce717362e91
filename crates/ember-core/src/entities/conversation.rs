//! Conversation entity - per-match chat channel and its aggregate state

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Maximum number of pinned messages per conversation
pub const MAX_PINNED_MESSAGES: usize = 5;

/// Snapshot of a pinned message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinnedMessage {
    pub message_id: Snowflake,
    /// Preview content captured at pin time
    pub content: String,
    pub pinned_by: Snowflake,
    pub pinned_at: DateTime<Utc>,
}

/// Conversation entity
///
/// Tied 1:1 to a match and deleted alongside it. Carries denormalized
/// last-message fields and per-user unread counters so listing conversations
/// never touches the messages table.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    pub id: Snowflake,
    pub match_id: Snowflake,
    pub user1_id: Snowflake,
    pub user2_id: Snowflake,
    pub last_message_id: Option<Snowflake>,
    pub last_message_content: Option<String>,
    pub last_message_sender_id: Option<Snowflake>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub user1_unread_count: i32,
    pub user2_unread_count: i32,
    pub pinned_messages: Vec<PinnedMessage>,
    pub user1_muted_until: Option<DateTime<Utc>>,
    pub user2_muted_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new empty Conversation for a match
    pub fn new(id: Snowflake, match_id: Snowflake, user1_id: Snowflake, user2_id: Snowflake) -> Self {
        let now = Utc::now();
        Self {
            id,
            match_id,
            user1_id,
            user2_id,
            last_message_id: None,
            last_message_content: None,
            last_message_sender_id: None,
            last_message_at: None,
            user1_unread_count: 0,
            user2_unread_count: 0,
            pinned_messages: Vec::new(),
            user1_muted_until: None,
            user2_muted_until: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The other participant's ID
    #[must_use]
    pub fn other_user_id(&self, user_id: Snowflake) -> Snowflake {
        if self.user1_id == user_id {
            self.user2_id
        } else {
            self.user1_id
        }
    }

    /// Whether the given user participates in this conversation
    #[inline]
    #[must_use]
    pub fn has_participant(&self, user_id: Snowflake) -> bool {
        self.user1_id == user_id || self.user2_id == user_id
    }

    /// Unread count for the given participant
    #[must_use]
    pub fn unread_count_for(&self, user_id: Snowflake) -> i32 {
        if self.user1_id == user_id {
            self.user1_unread_count
        } else {
            self.user2_unread_count
        }
    }

    /// Mute expiry for the given participant, if any
    #[must_use]
    pub fn muted_until_for(&self, user_id: Snowflake) -> Option<DateTime<Utc>> {
        if self.user1_id == user_id {
            self.user1_muted_until
        } else {
            self.user2_muted_until
        }
    }

    /// Whether the conversation is muted for the given participant at `now`
    #[must_use]
    pub fn is_muted_for(&self, user_id: Snowflake, now: DateTime<Utc>) -> bool {
        self.muted_until_for(user_id).is_some_and(|until| until > now)
    }

    /// Whether a message is currently pinned
    #[must_use]
    pub fn is_pinned(&self, message_id: Snowflake) -> bool {
        self.pinned_messages.iter().any(|p| p.message_id == message_id)
    }

    /// Expiry used for an indefinite mute
    #[must_use]
    pub fn mute_forever_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
        // "Forever" is a far-future sentinel rather than a nullable flag
        now + Duration::days(365 * 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_conversation() -> Conversation {
        Conversation::new(
            Snowflake::new(100),
            Snowflake::new(10),
            Snowflake::new(1),
            Snowflake::new(2),
        )
    }

    #[test]
    fn test_new_conversation_has_zero_unread() {
        let conv = test_conversation();
        assert_eq!(conv.unread_count_for(Snowflake::new(1)), 0);
        assert_eq!(conv.unread_count_for(Snowflake::new(2)), 0);
    }

    #[test]
    fn test_unread_count_is_per_user() {
        let mut conv = test_conversation();
        conv.user2_unread_count = 3;
        assert_eq!(conv.unread_count_for(Snowflake::new(1)), 0);
        assert_eq!(conv.unread_count_for(Snowflake::new(2)), 3);
    }

    #[test]
    fn test_mute_state() {
        let now = Utc::now();
        let mut conv = test_conversation();
        assert!(!conv.is_muted_for(Snowflake::new(1), now));

        conv.user1_muted_until = Some(now + Duration::hours(8));
        assert!(conv.is_muted_for(Snowflake::new(1), now));
        assert!(!conv.is_muted_for(Snowflake::new(2), now));

        // Expired mutes no longer apply
        conv.user1_muted_until = Some(now - Duration::hours(1));
        assert!(!conv.is_muted_for(Snowflake::new(1), now));
    }

    #[test]
    fn test_mute_forever_is_far_future() {
        let now = Utc::now();
        let forever = Conversation::mute_forever_expiry(now);
        assert!(forever > now + Duration::days(365 * 99));
    }

    #[test]
    fn test_is_pinned() {
        let mut conv = test_conversation();
        assert!(!conv.is_pinned(Snowflake::new(5)));

        conv.pinned_messages.push(PinnedMessage {
            message_id: Snowflake::new(5),
            content: "hello".to_string(),
            pinned_by: Snowflake::new(1),
            pinned_at: Utc::now(),
        });
        assert!(conv.is_pinned(Snowflake::new(5)));
    }
}
