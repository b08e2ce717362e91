//! Block entity - a directed block between two users

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Block entity
///
/// A block in either direction hides the pair from each other's discovery
/// feed and deactivates any active match between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub id: Snowflake,
    pub blocker_id: Snowflake,
    pub blocked_id: Snowflake,
    pub created_at: DateTime<Utc>,
}

impl Block {
    /// Create a new Block
    pub fn new(id: Snowflake, blocker_id: Snowflake, blocked_id: Snowflake) -> Self {
        Self {
            id,
            blocker_id,
            blocked_id,
            created_at: Utc::now(),
        }
    }
}
