//! End-to-end API tests
//!
//! These tests require a running PostgreSQL instance and the
//! DATABASE_URL / JWT_SECRET environment variables. Without them every test
//! exits early as a no-op.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    access_token, assert_status, check_test_env, login_payload, register_payload, user_id,
    TestServer,
};
use reqwest::StatusCode;
use serde_json::json;

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
async fn test_register_and_login() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let payload = register_payload("male", "female", 30);

    let response = server.post("/api/v1/auth/register", &payload).await.unwrap();
    let body = assert_status(response, StatusCode::CREATED).await.unwrap();
    assert!(!access_token(&body).is_empty());
    assert_eq!(body["user"]["email"], payload["email"]);

    // Duplicate registration conflicts
    let response = server.post("/api/v1/auth/register", &payload).await.unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();

    // Login with the same credentials
    let response = server
        .post("/api/v1/auth/login", &login_payload(&payload))
        .await
        .unwrap();
    let body = assert_status(response, StatusCode::OK).await.unwrap();
    let token = access_token(&body);

    // The token authenticates /users/@me
    let response = server.get_auth("/api/v1/users/@me", &token).await.unwrap();
    let me = assert_status(response, StatusCode::OK).await.unwrap();
    assert_eq!(me["email"], payload["email"]);
}

#[tokio::test]
async fn test_requests_without_token_are_unauthorized() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/api/v1/users/@me").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Swipe -> match -> chat flow
// ============================================================================

#[tokio::test]
async fn test_mutual_like_creates_match_and_conversation() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    // Register both users
    let reg_a = register_payload("male", "female", 30);
    let reg_b = register_payload("female", "male", 28);

    let body_a = assert_status(
        server.post("/api/v1/auth/register", &reg_a).await.unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    let body_b = assert_status(
        server.post("/api/v1/auth/register", &reg_b).await.unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();

    let (token_a, id_a) = (access_token(&body_a), user_id(&body_a));
    let (token_b, id_b) = (access_token(&body_b), user_id(&body_b));

    // A likes B: no match yet
    let response = server
        .post_auth_empty(&format!("/api/v1/swipes/{id_b}/like"), &token_a)
        .await
        .unwrap();
    let body = assert_status(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(body["is_match"], false);

    // A cannot like B twice
    let response = server
        .post_auth_empty(&format!("/api/v1/swipes/{id_b}/like"), &token_a)
        .await
        .unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();

    // B likes A back: match plus conversation
    let response = server
        .post_auth_empty(&format!("/api/v1/swipes/{id_a}/like"), &token_b)
        .await
        .unwrap();
    let body = assert_status(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(body["is_match"], true);
    let conversation_id = body["conversation_id"].as_str().unwrap().to_string();

    // Both inboxes show the conversation with zero unread
    let response = server.get_auth("/api/v1/conversations", &token_a).await.unwrap();
    let inbox = assert_status(response, StatusCode::OK).await.unwrap();
    assert_eq!(inbox["items"][0]["id"], conversation_id.as_str());
    assert_eq!(inbox["items"][0]["unread_count"], 0);

    // A sends a message; B's unread count goes to 1
    let response = server
        .post_auth(
            &format!("/api/v1/conversations/{conversation_id}/messages"),
            &token_a,
            &json!({ "content": "hello" }),
        )
        .await
        .unwrap();
    let message = assert_status(response, StatusCode::CREATED).await.unwrap();
    let message_id = message["id"].as_str().unwrap().to_string();

    let response = server.get_auth("/api/v1/conversations", &token_b).await.unwrap();
    let inbox = assert_status(response, StatusCode::OK).await.unwrap();
    assert_eq!(inbox["items"][0]["unread_count"], 1);
    assert_eq!(inbox["items"][0]["last_message"]["content"], "hello");

    // B marks it read; unread resets and the message flips to read
    let response = server
        .post_auth(
            &format!("/api/v1/conversations/{conversation_id}/read"),
            &token_b,
            &json!({ "message_ids": [message_id] }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.ok();

    let response = server.get_auth("/api/v1/conversations", &token_b).await.unwrap();
    let inbox = assert_status(response, StatusCode::OK).await.unwrap();
    assert_eq!(inbox["items"][0]["unread_count"], 0);

    let response = server
        .get_auth(
            &format!("/api/v1/conversations/{conversation_id}/messages"),
            &token_b,
        )
        .await
        .unwrap();
    let history = assert_status(response, StatusCode::OK).await.unwrap();
    assert_eq!(history["messages"][0]["status"], "read");
}

#[tokio::test]
async fn test_discovery_excludes_swiped_users() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let reg_a = register_payload("male", "female", 30);
    let reg_b = register_payload("female", "male", 28);

    let body_a = assert_status(
        server.post("/api/v1/auth/register", &reg_a).await.unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    let body_b = assert_status(
        server.post("/api/v1/auth/register", &reg_b).await.unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();

    let (token_a, _) = (access_token(&body_a), user_id(&body_a));
    let id_b = user_id(&body_b);

    // B appears in A's discovery feed
    let response = server.get_auth("/api/v1/discovery", &token_a).await.unwrap();
    let feed = assert_status(response, StatusCode::OK).await.unwrap();
    let ids: Vec<&str> = feed["items"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|c| c["id"].as_str())
        .collect();
    assert!(ids.contains(&id_b.as_str()));

    // After a pass, B is excluded
    let response = server
        .post_auth_empty(&format!("/api/v1/swipes/{id_b}/pass"), &token_a)
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let response = server.get_auth("/api/v1/discovery", &token_a).await.unwrap();
    let feed = assert_status(response, StatusCode::OK).await.unwrap();
    let ids: Vec<&str> = feed["items"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|c| c["id"].as_str())
        .collect();
    assert!(!ids.contains(&id_b.as_str()));
}
