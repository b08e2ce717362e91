//! Test fixtures and data generators

use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    // Mix in the PID so parallel runs against a shared database don't collide
    let seq = COUNTER.fetch_add(1, Ordering::SeqCst);
    (u64::from(std::process::id()) << 20) | seq
}

/// A registration payload with unique email
pub fn register_payload(gender: &str, looking_for: &str, age: i32) -> Value {
    let suffix = unique_suffix();
    json!({
        "email": format!("test{suffix}@example.com"),
        "password": "TestPass123",
        "name": format!("Test User {suffix}"),
        "age": age,
        "gender": gender,
        "looking_for": looking_for,
        "interests": ["hiking", "coffee"],
    })
}

/// A login payload matching a registration payload
pub fn login_payload(register: &Value) -> Value {
    json!({
        "email": register["email"],
        "password": register["password"],
    })
}

/// Extract the access token from an auth response body
pub fn access_token(body: &Value) -> String {
    body["access_token"]
        .as_str()
        .expect("auth response carries access_token")
        .to_string()
}

/// Extract the user ID from an auth response body
pub fn user_id(body: &Value) -> String {
    body["user"]["id"]
        .as_str()
        .expect("auth response carries user id")
        .to_string()
}
