//! Message handlers
//!
//! Persisted operations; each one also fans the corresponding event out to
//! live subscribers through the notifier.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use ember_service::{
    EditMessageRequest, MessageResponse, MessageService, MessagesResponse, NewMessage,
    SendMessageRequest,
};
use serde::Deserialize;

use crate::extractors::{parse_snowflake, AuthUser, MessageCursor, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created};
use crate::state::AppState;

/// Message history, oldest first
///
/// GET /conversations/{conversation_id}/messages
pub async fn get_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(conversation_id): Path<String>,
    cursor: MessageCursor,
) -> ApiResult<Json<MessagesResponse>> {
    let conversation_id = parse_snowflake(&conversation_id, "conversation_id")?;

    let service = MessageService::new(state.service_context());
    let (messages, has_more) = service
        .get_messages(conversation_id, auth.user_id, cursor.limit, cursor.before)
        .await?;

    Ok(Json(MessagesResponse {
        messages: messages.iter().map(MessageResponse::from).collect(),
        has_more,
    }))
}

/// Send a message
///
/// POST /conversations/{conversation_id}/messages
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(conversation_id): Path<String>,
    ValidatedJson(request): ValidatedJson<SendMessageRequest>,
) -> ApiResult<Created<Json<MessageResponse>>> {
    let conversation_id = parse_snowflake(&conversation_id, "conversation_id")?;

    let service = MessageService::new(state.service_context());
    let message = service
        .send_message(
            conversation_id,
            auth.user_id,
            NewMessage {
                content: request.content,
                kind: request.kind,
                media_url: request.media_url,
                media_info: request.media_info,
                reply_to_id: request.reply_to_id,
            },
        )
        .await?;

    let response = MessageResponse::from(&message);
    let payload = serde_json::to_value(&response).map_err(ApiError::internal)?;
    state
        .notifier()
        .message_sent(conversation_id, payload, auth.user_id)
        .await;

    Ok(Created(Json(response)))
}

/// Edit a text message
///
/// PATCH /conversations/{conversation_id}/messages/{message_id}
pub async fn edit_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((conversation_id, message_id)): Path<(String, String)>,
    ValidatedJson(request): ValidatedJson<EditMessageRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let conversation_id = parse_snowflake(&conversation_id, "conversation_id")?;
    let message_id = parse_snowflake(&message_id, "message_id")?;

    let service = MessageService::new(state.service_context());
    let message = service
        .edit_message(message_id, auth.user_id, request.content)
        .await?;

    let response = MessageResponse::from(&message);
    let payload = serde_json::to_value(&response).map_err(ApiError::internal)?;
    state
        .notifier()
        .message_edited(conversation_id, payload, auth.user_id)
        .await;

    Ok(Json(response))
}

/// Deletion mode flag (accepted for compatibility; both modes behave the same)
#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    #[serde(default = "default_for_everyone")]
    pub for_everyone: bool,
}

fn default_for_everyone() -> bool {
    true
}

/// Soft-delete a message
///
/// DELETE /conversations/{conversation_id}/messages/{message_id}
pub async fn delete_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((conversation_id, message_id)): Path<(String, String)>,
    Query(params): Query<DeleteParams>,
) -> ApiResult<Json<MessageResponse>> {
    let conversation_id = parse_snowflake(&conversation_id, "conversation_id")?;
    let message_id = parse_snowflake(&message_id, "message_id")?;

    let service = MessageService::new(state.service_context());
    let message = service
        .delete_message(message_id, auth.user_id, params.for_everyone)
        .await?;

    state
        .notifier()
        .message_deleted(conversation_id, message_id, auth.user_id)
        .await;

    Ok(Json(MessageResponse::from(&message)))
}
