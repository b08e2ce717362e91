//! User service
//!
//! Profile reads/updates, photo management, location, presence, and account
//! deletion.

use chrono::Utc;
use ember_core::entities::{Coordinates, Location, Photo, User, MAX_PHOTOS};
use ember_core::{DomainError, Snowflake};
use tracing::{info, instrument};

use crate::dto::{UpdatePreferencesRequest, UpdateProfileRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    /// Create a new UserService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Fetch the caller's own profile
    #[instrument(skip(self))]
    pub async fn get_profile(&self, user_id: Snowflake) -> ServiceResult<User> {
        self.require_user(user_id).await
    }

    /// Fetch another user's profile
    ///
    /// Blocked pairs (in either direction) see each other as missing.
    #[instrument(skip(self))]
    pub async fn get_user(&self, requester_id: Snowflake, user_id: Snowflake) -> ServiceResult<User> {
        let user = self.require_user(user_id).await?;

        if self
            .ctx
            .block_repo()
            .exists_between(requester_id, user_id)
            .await?
        {
            return Err(DomainError::UserNotFound(user_id).into());
        }

        Ok(user)
    }

    /// Apply profile field updates
    #[instrument(skip(self, update))]
    pub async fn update_profile(
        &self,
        user_id: Snowflake,
        update: UpdateProfileRequest,
    ) -> ServiceResult<User> {
        let mut user = self.require_user(user_id).await?;

        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(age) = update.age {
            user.age = age;
        }
        if let Some(bio) = update.bio {
            user.bio = Some(bio);
        }
        if let Some(gender) = update.gender {
            user.gender = gender;
        }
        if let Some(looking_for) = update.looking_for {
            user.looking_for = looking_for;
        }
        if let Some(interests) = update.interests {
            user.interests = interests;
        }
        if let Some(discovery_enabled) = update.discovery_enabled {
            user.discovery_enabled = discovery_enabled;
        }
        user.updated_at = Utc::now();

        self.ctx.user_repo().update(&user).await?;

        Ok(user)
    }

    /// Apply discovery preference updates
    #[instrument(skip(self, update))]
    pub async fn update_preferences(
        &self,
        user_id: Snowflake,
        update: UpdatePreferencesRequest,
    ) -> ServiceResult<User> {
        let mut user = self.require_user(user_id).await?;

        if let Some(min_age) = update.min_age {
            user.preferences.min_age = min_age;
        }
        if let Some(max_age) = update.max_age {
            user.preferences.max_age = max_age;
        }
        if let Some(max_distance) = update.max_distance {
            user.preferences.max_distance = max_distance;
        }
        if let Some(show_distance) = update.show_distance {
            user.preferences.show_distance = show_distance;
        }
        if let Some(show_online_status) = update.show_online_status {
            user.preferences.show_online_status = show_online_status;
        }

        if user.preferences.min_age > user.preferences.max_age {
            return Err(ServiceError::validation("min_age cannot exceed max_age"));
        }
        user.updated_at = Utc::now();

        self.ctx.user_repo().update(&user).await?;

        Ok(user)
    }

    /// Update location, resolving place names through the geocoder
    #[instrument(skip(self))]
    pub async fn update_location(
        &self,
        user_id: Snowflake,
        latitude: f64,
        longitude: f64,
    ) -> ServiceResult<User> {
        let mut user = self.require_user(user_id).await?;

        let place = self
            .ctx
            .geocoder()
            .reverse_geocode(latitude, longitude)
            .await?;

        user.location = Some(Location {
            city: place.city,
            state: place.state,
            country: place.country,
            coordinates: Some(Coordinates {
                latitude,
                longitude,
            }),
        });
        user.updated_at = Utc::now();

        self.ctx.user_repo().update(&user).await?;

        Ok(user)
    }

    /// Add a profile photo
    ///
    /// The first photo (or one flagged primary) becomes the primary photo and
    /// moves to the front of the ordering.
    #[instrument(skip(self, url))]
    pub async fn add_photo(
        &self,
        user_id: Snowflake,
        url: String,
        is_primary: bool,
    ) -> ServiceResult<Photo> {
        let mut user = self.require_user(user_id).await?;

        if user.photos.len() >= MAX_PHOTOS {
            return Err(ServiceError::validation(format!(
                "Maximum {MAX_PHOTOS} photos allowed"
            )));
        }

        let make_primary = is_primary || user.photos.is_empty();
        let mut order = user.photos.len() as i32;

        if make_primary {
            for photo in &mut user.photos {
                photo.is_primary = false;
                photo.order += 1;
            }
            order = 0;
        }

        let photo = Photo {
            id: format!("photo_{}_{}", user.photos.len() + 1, Utc::now().timestamp()),
            url,
            is_primary: make_primary,
            order,
        };
        user.photos.push(photo.clone());
        user.photos.sort_by_key(|p| p.order);
        user.updated_at = Utc::now();

        self.ctx.user_repo().update(&user).await?;

        Ok(photo)
    }

    /// Delete a profile photo; at least one photo must remain
    #[instrument(skip(self))]
    pub async fn delete_photo(&self, user_id: Snowflake, photo_id: &str) -> ServiceResult<()> {
        let mut user = self.require_user(user_id).await?;

        if user.photos.len() <= 1 {
            return Err(ServiceError::validation("Must have at least one photo"));
        }

        let before = user.photos.len();
        user.photos.retain(|p| p.id != photo_id);
        if user.photos.len() == before {
            return Err(DomainError::PhotoNotFound(photo_id.to_string()).into());
        }

        // Reindex; the first remaining photo becomes primary
        for (i, photo) in user.photos.iter_mut().enumerate() {
            photo.order = i as i32;
            photo.is_primary = i == 0;
        }
        user.updated_at = Utc::now();

        self.ctx.user_repo().update(&user).await?;

        Ok(())
    }

    /// Reorder photos; the ID list must be a permutation of the current set
    #[instrument(skip(self, photo_ids))]
    pub async fn reorder_photos(
        &self,
        user_id: Snowflake,
        photo_ids: &[String],
    ) -> ServiceResult<Vec<Photo>> {
        let mut user = self.require_user(user_id).await?;

        if photo_ids.len() != user.photos.len() {
            return Err(ServiceError::validation("Must include all photo IDs"));
        }

        let mut reordered = Vec::with_capacity(photo_ids.len());
        for (i, photo_id) in photo_ids.iter().enumerate() {
            let Some(mut photo) = user.photos.iter().find(|p| &p.id == photo_id).cloned() else {
                return Err(DomainError::PhotoNotFound(photo_id.clone()).into());
            };
            photo.order = i as i32;
            photo.is_primary = i == 0;
            reordered.push(photo);
        }

        user.photos = reordered.clone();
        user.updated_at = Utc::now();

        self.ctx.user_repo().update(&user).await?;

        Ok(reordered)
    }

    /// Persist a presence transition (called by the realtime layer)
    #[instrument(skip(self))]
    pub async fn set_presence(&self, user_id: Snowflake, online: bool) -> ServiceResult<()> {
        self.ctx
            .user_repo()
            .set_presence(user_id, online, Utc::now())
            .await?;
        Ok(())
    }

    /// Delete the account after verifying the password
    ///
    /// Social-only accounts (empty password hash) skip verification. Related
    /// records are removed by the store's cascade rules.
    #[instrument(skip(self, password))]
    pub async fn delete_account(&self, user_id: Snowflake, password: &str) -> ServiceResult<()> {
        let user = self.require_user(user_id).await?;

        if !user.password_hash.is_empty()
            && !ember_common::verify_password(password, &user.password_hash)?
        {
            return Err(ServiceError::forbidden("Invalid password"));
        }

        self.ctx.user_repo().delete(user_id).await?;

        info!(user_id = %user_id, "Account deleted");

        Ok(())
    }

    async fn require_user(&self, user_id: Snowflake) -> ServiceResult<User> {
        Ok(self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?)
    }
}
