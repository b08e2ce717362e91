//! Route definitions
//!
//! REST routes mounted under /api/v1; the WebSocket endpoint lives at /ws.

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::handlers::{
    auth, blocks, conversations, discovery, health, matches, messages, reactions, swipes, users,
    ws,
};
use crate::state::AppState;

/// Create the main router with all routes (excluding health, which bypasses
/// rate limiting)
pub fn create_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", api_v1_routes())
        .route("/ws", get(ws::ws_handler))
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(discovery_routes())
        .merge(swipe_routes())
        .merge(match_routes())
        .merge(conversation_routes())
        .merge(block_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh_token))
}

/// User and profile routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/@me", get(users::get_current_user))
        .route("/users/@me", patch(users::update_current_user))
        .route("/users/@me", delete(users::delete_account))
        .route("/users/@me/preferences", patch(users::update_preferences))
        .route("/users/@me/location", put(users::update_location))
        .route("/users/@me/photos", post(users::add_photo))
        .route("/users/@me/photos/order", put(users::reorder_photos))
        .route("/users/@me/photos/:photo_id", delete(users::delete_photo))
        .route("/users/:user_id", get(users::get_user))
}

/// Discovery routes
fn discovery_routes() -> Router<AppState> {
    Router::new().route("/discovery", get(discovery::get_candidates))
}

/// Swipe routes
fn swipe_routes() -> Router<AppState> {
    Router::new()
        .route("/swipes/undo", post(swipes::undo))
        .route("/swipes/:user_id/like", post(swipes::like))
        .route("/swipes/:user_id/pass", post(swipes::pass))
        .route("/swipes/:user_id/super-like", post(swipes::super_like))
}

/// Match routes
fn match_routes() -> Router<AppState> {
    Router::new()
        .route("/matches", get(matches::get_matches))
        .route("/matches/:match_id", delete(matches::unmatch))
        .route("/matches/:match_id/seen", post(matches::mark_seen))
        .route(
            "/matches/:match_id/conversation",
            get(matches::get_match_conversation),
        )
}

/// Conversation and message routes
fn conversation_routes() -> Router<AppState> {
    Router::new()
        .route("/conversations", get(conversations::get_conversations))
        .route(
            "/conversations/:conversation_id/messages",
            get(messages::get_messages),
        )
        .route(
            "/conversations/:conversation_id/messages",
            post(messages::send_message),
        )
        .route(
            "/conversations/:conversation_id/messages/:message_id",
            patch(messages::edit_message),
        )
        .route(
            "/conversations/:conversation_id/messages/:message_id",
            delete(messages::delete_message),
        )
        .route(
            "/conversations/:conversation_id/messages/:message_id/reactions",
            post(reactions::add_reaction),
        )
        .route(
            "/conversations/:conversation_id/messages/:message_id/reactions",
            delete(reactions::remove_reaction),
        )
        .route(
            "/conversations/:conversation_id/read",
            post(conversations::mark_read),
        )
        .route(
            "/conversations/:conversation_id/pin",
            post(conversations::pin_message),
        )
        .route(
            "/conversations/:conversation_id/pin/:message_id",
            delete(conversations::unpin_message),
        )
        .route(
            "/conversations/:conversation_id/mute",
            post(conversations::mute_conversation),
        )
}

/// Block routes
fn block_routes() -> Router<AppState> {
    Router::new()
        .route("/blocks", get(blocks::get_blocked_users))
        .route("/users/:user_id/block", post(blocks::block_user))
        .route("/users/:user_id/block", delete(blocks::unblock_user))
}
