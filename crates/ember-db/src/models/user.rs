//! User database model

use chrono::{DateTime, Utc};
use ember_core::entities::{Location, Photo};
use sqlx::types::Json;
use sqlx::FromRow;

/// Database model for the users table
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub looking_for: String,
    pub bio: Option<String>,
    pub interests: Vec<String>,
    pub photos: Json<Vec<Photo>>,
    pub location: Option<Json<Location>>,
    pub min_age: i32,
    pub max_age: i32,
    pub max_distance: i32,
    pub show_distance: bool,
    pub show_online_status: bool,
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

/// Column list shared by every user SELECT
pub const USER_COLUMNS: &str = "id, email, password_hash, name, age, gender, looking_for, bio, \
    interests, photos, location, min_age, max_age, max_distance, show_distance, \
    show_online_status, discovery_enabled, is_online, is_verified, last_active, \
    super_likes_remaining, super_likes_reset_at, is_premium, premium_expires_at, \
    created_at, updated_at";
