//! WebSocket upgrade handler
//!
//! The access token arrives as a query parameter. Invalid or missing tokens
//! still upgrade, then close immediately with code 4001 so the client can
//! read the reason.

use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use ember_core::Snowflake;
use ember_realtime::{run_session, CloseCode};
use serde::Deserialize;

use crate::state::AppState;

/// WebSocket query parameters
#[derive(Debug, Deserialize)]
pub struct WsParams {
    #[serde(default)]
    pub token: Option<String>,
}

/// Realtime endpoint
///
/// GET /ws?token=...
pub async fn ws_handler(
    State(state): State<AppState>,
    Query(params): Query<WsParams>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let token = params.token.unwrap_or_default();
    ws.on_upgrade(move |socket| handle_socket(socket, state, token))
}

async fn handle_socket(socket: WebSocket, state: AppState, token: String) {
    let Some(user_id) = authenticate(&state, &token).await else {
        close_unauthorized(socket).await;
        return;
    };

    run_session(
        socket,
        user_id,
        state.service_context().clone(),
        state.connection_manager().clone(),
    )
    .await;
}

/// Resolve the token to an existing user, or None
async fn authenticate(state: &AppState, token: &str) -> Option<Snowflake> {
    let claims = state.jwt_service().validate_access_token(token).ok()?;
    let user_id = claims.user_id().ok()?;

    // The subject must still exist
    state
        .service_context()
        .user_repo()
        .find_by_id(user_id)
        .await
        .ok()
        .flatten()
        .map(|user| user.id)
}

async fn close_unauthorized(mut socket: WebSocket) {
    tracing::debug!("WebSocket rejected: unauthorized");
    let _ = socket
        .send(Message::Close(Some(CloseFrame {
            code: CloseCode::Unauthorized.as_u16(),
            reason: CloseCode::Unauthorized.description().into(),
        })))
        .await;
}
