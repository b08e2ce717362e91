//! Block handlers

use axum::{
    extract::{Path, State},
    Json,
};
use ember_service::{BlockService, BlockedUserResponse};

use crate::extractors::{parse_snowflake, AuthUser};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Block a user
///
/// POST /users/{user_id}/block
pub async fn block_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> ApiResult<Created<NoContent>> {
    let blocked_id = parse_snowflake(&user_id, "user_id")?;

    let service = BlockService::new(state.service_context());
    service.block_user(auth.user_id, blocked_id).await?;
    Ok(Created(NoContent))
}

/// Unblock a user
///
/// DELETE /users/{user_id}/block
pub async fn unblock_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> ApiResult<NoContent> {
    let blocked_id = parse_snowflake(&user_id, "user_id")?;

    let service = BlockService::new(state.service_context());
    service.unblock_user(auth.user_id, blocked_id).await?;
    Ok(NoContent)
}

/// Users the caller has blocked
///
/// GET /blocks
pub async fn get_blocked_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<BlockedUserResponse>>> {
    let service = BlockService::new(state.service_context());
    let blocked = service.blocked_users(auth.user_id).await?;
    Ok(Json(blocked.iter().map(BlockedUserResponse::from).collect()))
}
