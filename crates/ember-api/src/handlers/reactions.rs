//! Reaction handlers

use axum::{
    extract::{Path, State},
    Json,
};
use ember_service::{ReactionRequest, ReactionService};
use serde_json::{json, Value};

use crate::extractors::{parse_snowflake, AuthUser, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Add (or replace) the caller's reaction
///
/// POST /conversations/{conversation_id}/messages/{message_id}/reactions
pub async fn add_reaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((conversation_id, message_id)): Path<(String, String)>,
    ValidatedJson(request): ValidatedJson<ReactionRequest>,
) -> ApiResult<Json<Value>> {
    let conversation_id = parse_snowflake(&conversation_id, "conversation_id")?;
    let message_id = parse_snowflake(&message_id, "message_id")?;

    let service = ReactionService::new(state.service_context());
    let message = service
        .add_reaction(message_id, auth.user_id, request.emoji.clone())
        .await?;

    state
        .notifier()
        .reaction_added(conversation_id, message_id, auth.user_id, &request.emoji)
        .await;

    Ok(Json(json!({ "reactions": message.reactions })))
}

/// Remove the caller's reaction
///
/// DELETE /conversations/{conversation_id}/messages/{message_id}/reactions
pub async fn remove_reaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((conversation_id, message_id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let conversation_id = parse_snowflake(&conversation_id, "conversation_id")?;
    let message_id = parse_snowflake(&message_id, "message_id")?;

    let service = ReactionService::new(state.service_context());
    let message = service.remove_reaction(message_id, auth.user_id).await?;

    state
        .notifier()
        .reaction_removed(conversation_id, message_id, auth.user_id)
        .await;

    Ok(Json(json!({ "reactions": message.reactions })))
}
