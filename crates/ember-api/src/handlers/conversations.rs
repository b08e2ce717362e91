//! Conversation handlers: inbox, read-marking, pins, and mutes

use axum::{
    extract::{Path, State},
    Json,
};
use ember_service::{
    ConversationResponse, ConversationService, MarkReadRequest, MuteConversationRequest,
    Page as PageResponse, PinMessageRequest,
};
use serde_json::{json, Value};

use crate::extractors::{parse_snowflake, AuthUser, Page, ValidatedJson};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// List the caller's conversations
///
/// GET /conversations
pub async fn get_conversations(
    State(state): State<AppState>,
    auth: AuthUser,
    page: Page,
) -> ApiResult<Json<PageResponse<ConversationResponse>>> {
    let service = ConversationService::new(state.service_context());
    let (summaries, total) = service
        .get_conversations(auth.user_id, page.limit, page.offset)
        .await?;

    let items = summaries.iter().map(ConversationResponse::from).collect();
    Ok(Json(PageResponse::new(items, total, page.limit, page.offset)))
}

/// Mark messages as read and clear the caller's unread counter
///
/// POST /conversations/{conversation_id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(conversation_id): Path<String>,
    ValidatedJson(request): ValidatedJson<MarkReadRequest>,
) -> ApiResult<NoContent> {
    let conversation_id = parse_snowflake(&conversation_id, "conversation_id")?;

    let service = ConversationService::new(state.service_context());
    service
        .mark_read(conversation_id, auth.user_id, &request.message_ids)
        .await?;
    Ok(NoContent)
}

/// Pin a message
///
/// POST /conversations/{conversation_id}/pin
pub async fn pin_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(conversation_id): Path<String>,
    ValidatedJson(request): ValidatedJson<PinMessageRequest>,
) -> ApiResult<Json<Value>> {
    let conversation_id = parse_snowflake(&conversation_id, "conversation_id")?;

    let service = ConversationService::new(state.service_context());
    let conversation = service
        .pin_message(conversation_id, request.message_id, auth.user_id)
        .await?;

    state
        .notifier()
        .message_pinned(conversation_id, request.message_id, auth.user_id)
        .await;

    Ok(Json(json!({ "pinned_messages": conversation.pinned_messages })))
}

/// Unpin a message (no-op when not pinned)
///
/// DELETE /conversations/{conversation_id}/pin/{message_id}
pub async fn unpin_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((conversation_id, message_id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let conversation_id = parse_snowflake(&conversation_id, "conversation_id")?;
    let message_id = parse_snowflake(&message_id, "message_id")?;

    let service = ConversationService::new(state.service_context());
    let conversation = service
        .unpin_message(conversation_id, message_id, auth.user_id)
        .await?;

    state
        .notifier()
        .message_unpinned(conversation_id, message_id, auth.user_id)
        .await;

    Ok(Json(json!({ "pinned_messages": conversation.pinned_messages })))
}

/// Mute, remute, or unmute the conversation for the caller
///
/// POST /conversations/{conversation_id}/mute
pub async fn mute_conversation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(conversation_id): Path<String>,
    ValidatedJson(request): ValidatedJson<MuteConversationRequest>,
) -> ApiResult<Json<Value>> {
    let conversation_id = parse_snowflake(&conversation_id, "conversation_id")?;

    let service = ConversationService::new(state.service_context());
    let conversation = service
        .mute_conversation(conversation_id, auth.user_id, request.duration_hours)
        .await?;

    let muted_until = conversation.muted_until_for(auth.user_id);
    Ok(Json(json!({
        "is_muted": muted_until.is_some(),
        "muted_until": muted_until,
    })))
}
