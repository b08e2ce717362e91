//! Swipe entity - a single directional swipe decision

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Kind of swipe decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeKind {
    Like,
    Pass,
    SuperLike,
}

impl SwipeKind {
    /// Stable string form used in storage and on the wire
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Pass => "pass",
            Self::SuperLike => "super_like",
        }
    }

    /// Parse from the stored string form
    #[must_use]
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "like" => Some(Self::Like),
            "pass" => Some(Self::Pass),
            "super_like" => Some(Self::SuperLike),
            _ => None,
        }
    }

    /// Whether this swipe can contribute to a mutual match
    #[inline]
    #[must_use]
    pub const fn is_positive(self) -> bool {
        matches!(self, Self::Like | Self::SuperLike)
    }
}

impl std::fmt::Display for SwipeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Swipe entity
///
/// Immutable once created; the only mutation is deletion by the premium
/// undo operation. At most one swipe exists per ordered (swiper, swiped) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Swipe {
    pub id: Snowflake,
    pub swiper_id: Snowflake,
    pub swiped_id: Snowflake,
    pub kind: SwipeKind,
    pub created_at: DateTime<Utc>,
}

impl Swipe {
    /// Create a new Swipe
    pub fn new(id: Snowflake, swiper_id: Snowflake, swiped_id: Snowflake, kind: SwipeKind) -> Self {
        Self {
            id,
            swiper_id,
            swiped_id,
            kind,
            created_at: Utc::now(),
        }
    }
}
