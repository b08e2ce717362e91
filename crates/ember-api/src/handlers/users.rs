//! User and profile handlers

use axum::{
    extract::{Path, State},
    Json,
};
use base64::Engine;
use ember_core::entities::Photo;
use ember_service::{
    AddPhotoRequest, DeleteAccountRequest, PrivateUserResponse, ReorderPhotosRequest,
    UpdateLocationRequest, UpdatePreferencesRequest, UpdateProfileRequest, UserResponse,
    UserService,
};

use crate::extractors::{parse_snowflake, AuthUser, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created, NoContent};
use crate::state::AppState;

/// Get the caller's own account
///
/// GET /users/@me
pub async fn get_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<PrivateUserResponse>> {
    let service = UserService::new(state.service_context());
    let user = service.get_profile(auth.user_id).await?;
    Ok(Json(PrivateUserResponse::from(&user)))
}

/// Update profile fields
///
/// PATCH /users/@me
pub async fn update_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<PrivateUserResponse>> {
    let service = UserService::new(state.service_context());
    let user = service.update_profile(auth.user_id, request).await?;
    Ok(Json(PrivateUserResponse::from(&user)))
}

/// Update discovery preferences
///
/// PATCH /users/@me/preferences
pub async fn update_preferences(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdatePreferencesRequest>,
) -> ApiResult<Json<PrivateUserResponse>> {
    let service = UserService::new(state.service_context());
    let user = service.update_preferences(auth.user_id, request).await?;
    Ok(Json(PrivateUserResponse::from(&user)))
}

/// Update location (reverse geocoded)
///
/// PUT /users/@me/location
pub async fn update_location(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateLocationRequest>,
) -> ApiResult<Json<PrivateUserResponse>> {
    let service = UserService::new(state.service_context());
    let user = service
        .update_location(auth.user_id, request.latitude, request.longitude)
        .await?;
    Ok(Json(PrivateUserResponse::from(&user)))
}

/// Add a profile photo, by direct URL or base64 payload
///
/// POST /users/@me/photos
pub async fn add_photo(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<AddPhotoRequest>,
) -> ApiResult<Created<Json<Photo>>> {
    let url = match (request.url, request.data) {
        (Some(url), _) => url,
        (None, Some(data)) => {
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(data.as_bytes())
                .map_err(|_| ApiError::invalid_query("photo data is not valid base64"))?;

            let content_type = request
                .content_type
                .unwrap_or_else(|| "image/jpeg".to_string());
            let extension = extension_for(&content_type)
                .ok_or_else(|| ApiError::invalid_query("unsupported photo content type"))?;

            let filename = format!("{}.{extension}", uuid::Uuid::new_v4());
            let folder = format!("users/{}", auth.user_id);

            state
                .storage()
                .upload(&bytes, &folder, &filename, &content_type)
                .await?
        }
        (None, None) => {
            return Err(ApiError::invalid_query(
                "either url or data must be provided",
            ))
        }
    };

    let service = UserService::new(state.service_context());
    let photo = service.add_photo(auth.user_id, url, request.is_primary).await?;
    Ok(Created(Json(photo)))
}

/// Delete a profile photo
///
/// DELETE /users/@me/photos/{photo_id}
pub async fn delete_photo(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(photo_id): Path<String>,
) -> ApiResult<NoContent> {
    let service = UserService::new(state.service_context());
    service.delete_photo(auth.user_id, &photo_id).await?;
    Ok(NoContent)
}

/// Reorder profile photos
///
/// PUT /users/@me/photos/order
pub async fn reorder_photos(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<ReorderPhotosRequest>,
) -> ApiResult<Json<Vec<Photo>>> {
    let service = UserService::new(state.service_context());
    let photos = service.reorder_photos(auth.user_id, &request.photo_ids).await?;
    Ok(Json(photos))
}

/// Delete the caller's account
///
/// DELETE /users/@me
pub async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<DeleteAccountRequest>,
) -> ApiResult<NoContent> {
    let service = UserService::new(state.service_context());
    service.delete_account(auth.user_id, &request.password).await?;
    Ok(NoContent)
}

/// View another user's profile
///
/// GET /users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let user_id = parse_snowflake(&user_id, "user_id")?;

    let service = UserService::new(state.service_context());
    let user = service.get_user(auth.user_id, user_id).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// Map a content type to a file extension
fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}
