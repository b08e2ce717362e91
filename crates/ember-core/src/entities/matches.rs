//! Match entity - a mutual like between two users

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Match entity
///
/// Symmetric over the user pair; deactivated (never hard-deleted) on unmatch,
/// block, or swipe undo. Each active match owns exactly one conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub id: Snowflake,
    pub user1_id: Snowflake,
    pub user2_id: Snowflake,
    pub matched_at: DateTime<Utc>,
    pub is_active: bool,
    pub user1_seen: bool,
    pub user2_seen: bool,
}

impl Match {
    /// Create a new active Match
    pub fn new(id: Snowflake, user1_id: Snowflake, user2_id: Snowflake) -> Self {
        Self {
            id,
            user1_id,
            user2_id,
            matched_at: Utc::now(),
            is_active: true,
            user1_seen: false,
            user2_seen: false,
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

    /// Whether the given user participates in this match
    #[inline]
    #[must_use]
    pub fn has_participant(&self, user_id: Snowflake) -> bool {
        self.user1_id == user_id || self.user2_id == user_id
    }

    /// Whether this match is still unseen by the given user
    #[must_use]
    pub fn is_new_for(&self, user_id: Snowflake) -> bool {
        if self.user1_id == user_id {
            !self.user1_seen
        } else {
            !self.user2_seen
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_match() -> Match {
        Match::new(Snowflake::new(10), Snowflake::new(1), Snowflake::new(2))
    }

    #[test]
    fn test_other_user_id() {
        let m = test_match();
        assert_eq!(m.other_user_id(Snowflake::new(1)), Snowflake::new(2));
        assert_eq!(m.other_user_id(Snowflake::new(2)), Snowflake::new(1));
    }

    #[test]
    fn test_has_participant() {
        let m = test_match();
        assert!(m.has_participant(Snowflake::new(1)));
        assert!(m.has_participant(Snowflake::new(2)));
        assert!(!m.has_participant(Snowflake::new(3)));
    }

    #[test]
    fn test_new_match_is_unseen_for_both() {
        let mut m = test_match();
        assert!(m.is_new_for(Snowflake::new(1)));
        assert!(m.is_new_for(Snowflake::new(2)));

        m.user1_seen = true;
        assert!(!m.is_new_for(Snowflake::new(1)));
        assert!(m.is_new_for(Snowflake::new(2)));
    }
}
