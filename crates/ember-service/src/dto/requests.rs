//! Request DTOs with validation rules

use ember_core::entities::{Gender, MediaInfo, MessageKind};
use ember_core::Snowflake;
use serde::Deserialize;
use validator::Validate;

fn default_message_kind() -> MessageKind {
    MessageKind::Text
}

/// POST /auth/register
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(min = 2, max = 50))]
    pub name: String,

    #[validate(range(min = 18, max = 100))]
    pub age: i32,

    pub gender: Gender,
    pub looking_for: Gender,

    #[validate(length(max = 500))]
    pub bio: Option<String>,

    #[validate(length(min = 1, max = 10))]
    pub interests: Vec<String>,
}

/// POST /auth/login
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// POST /auth/refresh
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

/// PATCH /users/@me
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 50))]
    pub name: Option<String>,

    #[validate(range(min = 18, max = 100))]
    pub age: Option<i32>,

    #[validate(length(max = 500))]
    pub bio: Option<String>,

    pub gender: Option<Gender>,
    pub looking_for: Option<Gender>,

    #[validate(length(min = 1, max = 10))]
    pub interests: Option<Vec<String>>,

    pub discovery_enabled: Option<bool>,
}

/// PATCH /users/@me/preferences
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePreferencesRequest {
    #[validate(range(min = 18, max = 100))]
    pub min_age: Option<i32>,

    #[validate(range(min = 18, max = 100))]
    pub max_age: Option<i32>,

    #[validate(range(min = 1, max = 500))]
    pub max_distance: Option<i32>,

    pub show_distance: Option<bool>,
    pub show_online_status: Option<bool>,
}

/// PUT /users/@me/location
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateLocationRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

/// POST /users/@me/photos
///
/// Either a direct URL or a base64 payload routed through object storage.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddPhotoRequest {
    #[validate(url)]
    pub url: Option<String>,

    /// Base64-encoded image bytes
    pub data: Option<String>,

    pub content_type: Option<String>,

    #[serde(default)]
    pub is_primary: bool,
}

/// PUT /users/@me/photos/order
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReorderPhotosRequest {
    #[validate(length(min = 1, max = 6))]
    pub photo_ids: Vec<String>,
}

/// DELETE /users/@me
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DeleteAccountRequest {
    #[serde(default)]
    pub password: String,
}

/// POST /conversations/{id}/messages
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 2000))]
    pub content: String,

    #[serde(default = "default_message_kind", rename = "type")]
    pub kind: MessageKind,

    #[validate(url)]
    pub media_url: Option<String>,

    pub media_info: Option<MediaInfo>,

    pub reply_to_id: Option<Snowflake>,
}

/// PATCH /conversations/{id}/messages/{message_id}
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EditMessageRequest {
    #[validate(length(min = 1, max = 2000))]
    pub content: String,
}

/// POST /conversations/{id}/messages/{message_id}/reactions
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReactionRequest {
    #[validate(length(min = 1, max = 16))]
    pub emoji: String,
}

/// POST /conversations/{id}/pin
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PinMessageRequest {
    pub message_id: Snowflake,
}

/// POST /conversations/{id}/mute
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MuteConversationRequest {
    /// 0 clears the mute; omitted mutes indefinitely
    pub duration_hours: Option<i64>,
}

/// POST /conversations/{id}/read
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MarkReadRequest {
    #[serde(default)]
    pub message_ids: Vec<Snowflake>,
}

/// POST /users/{id}/block (empty body) and friends take no payload

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let request = RegisterRequest {
            email: "a@example.com".to_string(),
            password: "Password1".to_string(),
            name: "Alex".to_string(),
            age: 30,
            gender: Gender::Male,
            looking_for: Gender::Female,
            bio: None,
            interests: vec!["hiking".to_string()],
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_register_request_rejects_bad_email() {
        let request = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "Password1".to_string(),
            name: "Alex".to_string(),
            age: 30,
            gender: Gender::Male,
            looking_for: Gender::Female,
            bio: None,
            interests: vec!["hiking".to_string()],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_underage() {
        let request = RegisterRequest {
            email: "a@example.com".to_string(),
            password: "Password1".to_string(),
            name: "Alex".to_string(),
            age: 17,
            gender: Gender::Male,
            looking_for: Gender::Female,
            bio: None,
            interests: vec!["hiking".to_string()],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_send_message_defaults_to_text() {
        let request: SendMessageRequest =
            serde_json::from_str(r#"{"content": "hello"}"#).unwrap();
        assert_eq!(request.kind, MessageKind::Text);
        assert!(request.reply_to_id.is_none());
    }

    #[test]
    fn test_send_message_parses_kind_and_reply() {
        let request: SendMessageRequest = serde_json::from_str(
            r#"{"content": "https://cdn.example.com/a.jpg", "type": "image", "reply_to_id": "42"}"#,
        )
        .unwrap();
        assert_eq!(request.kind, MessageKind::Image);
        assert_eq!(request.reply_to_id, Some(Snowflake::new(42)));
    }
}
