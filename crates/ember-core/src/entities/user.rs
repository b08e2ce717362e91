//! User entity - identity, dating profile, and runtime presence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Maximum number of profile photos per user
pub const MAX_PHOTOS: usize = 6;

/// Daily super-like allowance
pub const DAILY_SUPER_LIKES: i32 = 3;

/// Gender identity, also used for the looking-for preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    NonBinary,
    Other,
}

impl Gender {
    /// Stable string form used in storage and on the wire
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::NonBinary => "non_binary",
            Self::Other => "other",
        }
    }

    /// Parse from the stored string form
    #[must_use]
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            "non_binary" => Some(Self::NonBinary),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A profile photo; order 0 is shown first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    pub url: String,
    pub is_primary: bool,
    pub order: i32,
}

/// Geographic coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Resolved location with optional reverse-geocoded place names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Location {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub coordinates: Option<Coordinates>,
}

/// Discovery preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub min_age: i32,
    pub max_age: i32,
    /// Maximum candidate distance in miles
    pub max_distance: i32,
    pub show_distance: bool,
    pub show_online_status: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            min_age: 18,
            max_age: 50,
            max_distance: 50,
            show_distance: true,
            show_online_status: true,
        }
    }
}

/// User entity
///
/// `password_hash` is empty for social-only accounts. Photo invariants
/// (at most [`MAX_PHOTOS`], exactly one primary when non-empty) are enforced
/// by the profile service, not the type.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Snowflake,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub age: i32,
    pub gender: Gender,
    pub looking_for: Gender,
    pub bio: Option<String>,
    pub interests: Vec<String>,
    pub photos: Vec<Photo>,
    pub location: Option<Location>,
    pub preferences: Preferences,
    pub discovery_enabled: bool,
    pub is_online: bool,
    pub is_verified: bool,
    pub last_active: DateTime<Utc>,
    pub super_likes_remaining: i32,
    pub super_likes_reset_at: Option<DateTime<Utc>>,
    pub is_premium: bool,
    pub premium_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new User with required registration fields
    pub fn new(
        id: Snowflake,
        email: String,
        password_hash: String,
        name: String,
        age: i32,
        gender: Gender,
        looking_for: Gender,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            email,
            password_hash,
            name,
            age,
            gender,
            looking_for,
            bio: None,
            interests: Vec::new(),
            photos: Vec::new(),
            location: None,
            preferences: Preferences::default(),
            discovery_enabled: true,
            is_online: false,
            is_verified: false,
            last_active: now,
            super_likes_remaining: DAILY_SUPER_LIKES,
            super_likes_reset_at: None,
            is_premium: false,
            premium_expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// URL of the primary photo, falling back to the first photo
    pub fn primary_photo(&self) -> Option<&str> {
        self.photos
            .iter()
            .find(|p| p.is_primary)
            .or_else(|| self.photos.first())
            .map(|p| p.url.as_str())
    }

    /// Coordinates, when a location with coordinates is set
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.location.as_ref().and_then(|l| l.coordinates)
    }

    /// Whether the premium subscription is currently active
    pub fn premium_active(&self, now: DateTime<Utc>) -> bool {
        self.is_premium && self.premium_expires_at.map_or(true, |exp| exp >= now)
    }

    /// Interests shared with another user
    pub fn common_interests(&self, other: &User) -> Vec<String> {
        self.interests
            .iter()
            .filter(|i| other.interests.contains(i))
            .cloned()
            .collect()
    }
}
