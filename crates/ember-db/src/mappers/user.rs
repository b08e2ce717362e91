//! User entity <-> model mapper

use ember_core::entities::{Gender, Preferences, User};
use ember_core::error::DomainError;
use ember_core::value_objects::Snowflake;

use crate::models::UserModel;

fn parse_gender(value: &str, column: &str) -> Result<Gender, DomainError> {
    Gender::from_str_opt(value)
        .ok_or_else(|| DomainError::DatabaseError(format!("invalid {column} value: {value}")))
}

impl TryFrom<UserModel> for User {
    type Error = DomainError;

    fn try_from(model: UserModel) -> Result<Self, Self::Error> {
        Ok(User {
            id: Snowflake::new(model.id),
            email: model.email,
            password_hash: model.password_hash,
            name: model.name,
            age: model.age,
            gender: parse_gender(&model.gender, "gender")?,
            looking_for: parse_gender(&model.looking_for, "looking_for")?,
            bio: model.bio,
            interests: model.interests,
            photos: model.photos.0,
            location: model.location.map(|l| l.0),
            preferences: Preferences {
                min_age: model.min_age,
                max_age: model.max_age,
                max_distance: model.max_distance,
                show_distance: model.show_distance,
                show_online_status: model.show_online_status,
            },
            discovery_enabled: model.discovery_enabled,
            is_online: model.is_online,
            is_verified: model.is_verified,
            last_active: model.last_active,
            super_likes_remaining: model.super_likes_remaining,
            super_likes_reset_at: model.super_likes_reset_at,
            is_premium: model.is_premium,
            premium_expires_at: model.premium_expires_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
