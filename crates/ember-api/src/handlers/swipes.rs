//! Swipe handlers
//!
//! Each successful mutual like also pushes `new_match` to the counterpart's
//! live session and subscribes both sides to the new conversation.

use axum::{
    extract::{Path, State},
    Json,
};
use ember_core::entities::{Conversation, Match};
use ember_core::Snowflake;
use ember_service::{
    MatchResponse, SwipeOutcome, SwipeResponse, SwipeService, UserResponse, UserService,
};
use serde::Serialize;
use serde_json::json;

use crate::extractors::{parse_snowflake, AuthUser};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Like a user
///
/// POST /swipes/{user_id}/like
pub async fn like(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> ApiResult<Created<Json<SwipeResponse>>> {
    let target_id = parse_snowflake(&user_id, "user_id")?;

    let service = SwipeService::new(state.service_context());
    let outcome = service.like(auth.user_id, target_id).await?;

    let response = build_swipe_response(&state, auth.user_id, &outcome, None).await?;
    Ok(Created(Json(response)))
}

/// Pass on a user
///
/// POST /swipes/{user_id}/pass
pub async fn pass(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> ApiResult<Created<Json<SwipeResponse>>> {
    let target_id = parse_snowflake(&user_id, "user_id")?;

    let service = SwipeService::new(state.service_context());
    service.pass(auth.user_id, target_id).await?;

    Ok(Created(Json(SwipeResponse {
        is_match: false,
        matched: None,
        conversation_id: None,
        super_likes_remaining: None,
    })))
}

/// Super-like a user
///
/// POST /swipes/{user_id}/super-like
pub async fn super_like(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> ApiResult<Created<Json<SwipeResponse>>> {
    let target_id = parse_snowflake(&user_id, "user_id")?;

    let service = SwipeService::new(state.service_context());
    let result = service.super_like(auth.user_id, target_id).await?;

    let response =
        build_swipe_response(&state, auth.user_id, &result.outcome, Some(result.remaining)).await?;
    Ok(Created(Json(response)))
}

/// Undone swipe payload
#[derive(Debug, Serialize)]
pub struct UndoResponse {
    pub swiped_id: Snowflake,
    #[serde(rename = "type")]
    pub kind: ember_core::SwipeKind,
}

/// Undo the most recent swipe (premium)
///
/// POST /swipes/undo
pub async fn undo(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UndoResponse>> {
    let service = SwipeService::new(state.service_context());
    let swipe = service.undo_last(auth.user_id).await?;

    Ok(Json(UndoResponse {
        swiped_id: swipe.swiped_id,
        kind: swipe.kind,
    }))
}

/// Shared epilogue for like/super-like: build the response and, on a match,
/// notify the counterpart's live session
async fn build_swipe_response(
    state: &AppState,
    actor_id: Snowflake,
    outcome: &SwipeOutcome,
    super_likes_remaining: Option<i32>,
) -> ApiResult<SwipeResponse> {
    let (Some(matched), Some(conversation)) = (&outcome.matched, &outcome.conversation) else {
        return Ok(SwipeResponse {
            is_match: false,
            matched: None,
            conversation_id: None,
            super_likes_remaining,
        });
    };

    notify_match(state, actor_id, matched, conversation).await?;

    Ok(SwipeResponse {
        is_match: true,
        matched: Some(MatchResponse::from(matched)),
        conversation_id: Some(conversation.id),
        super_likes_remaining,
    })
}

async fn notify_match(
    state: &AppState,
    actor_id: Snowflake,
    matched: &Match,
    conversation: &Conversation,
) -> ApiResult<()> {
    let other_id = matched.other_user_id(actor_id);

    let actor = UserService::new(state.service_context())
        .get_profile(actor_id)
        .await?;

    let payload = json!({
        "match": MatchResponse::from(matched),
        "conversation_id": conversation.id,
        "user": UserResponse::from(&actor),
    });

    state
        .notifier()
        .match_created(conversation.id, actor_id, other_id, payload)
        .await;

    Ok(())
}
