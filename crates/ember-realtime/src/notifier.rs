//! Realtime notifier
//!
//! The REST layer's hook into the connection manager: after a service call
//! persists a change, the corresponding notify method fans the event out to
//! live subscribers. Delivery is best-effort; offline users are skipped.

use std::sync::Arc;

use ember_core::Snowflake;
use serde_json::Value;

use crate::connection::ConnectionManager;
use crate::protocol::ServerEvent;

/// Pushes server events to live connections
#[derive(Clone)]
pub struct RealtimeNotifier {
    manager: Arc<ConnectionManager>,
}

impl RealtimeNotifier {
    /// Create a notifier over the shared connection manager
    #[must_use]
    pub fn new(manager: Arc<ConnectionManager>) -> Self {
        Self { manager }
    }

    /// The underlying connection manager
    #[must_use]
    pub fn manager(&self) -> &Arc<ConnectionManager> {
        &self.manager
    }

    /// A message was sent; notify every subscriber except the sender
    pub async fn message_sent(
        &self,
        conversation_id: Snowflake,
        message: Value,
        sender_id: Snowflake,
    ) {
        self.manager
            .broadcast_to_conversation(
                ServerEvent::new_message(conversation_id, message),
                conversation_id,
                Some(sender_id),
            )
            .await;
    }

    /// A message was edited
    pub async fn message_edited(
        &self,
        conversation_id: Snowflake,
        message: Value,
        editor_id: Snowflake,
    ) {
        self.manager
            .broadcast_to_conversation(
                ServerEvent::message_edited(conversation_id, message),
                conversation_id,
                Some(editor_id),
            )
            .await;
    }

    /// A message was deleted
    pub async fn message_deleted(
        &self,
        conversation_id: Snowflake,
        message_id: Snowflake,
        actor_id: Snowflake,
    ) {
        self.manager
            .broadcast_to_conversation(
                ServerEvent::message_deleted(conversation_id, message_id),
                conversation_id,
                Some(actor_id),
            )
            .await;
    }

    /// A reaction was added
    pub async fn reaction_added(
        &self,
        conversation_id: Snowflake,
        message_id: Snowflake,
        user_id: Snowflake,
        emoji: &str,
    ) {
        self.manager
            .broadcast_to_conversation(
                ServerEvent::reaction_added(conversation_id, message_id, user_id, emoji),
                conversation_id,
                Some(user_id),
            )
            .await;
    }

    /// A reaction was removed
    pub async fn reaction_removed(
        &self,
        conversation_id: Snowflake,
        message_id: Snowflake,
        user_id: Snowflake,
    ) {
        self.manager
            .broadcast_to_conversation(
                ServerEvent::reaction_removed(conversation_id, message_id, user_id),
                conversation_id,
                Some(user_id),
            )
            .await;
    }

    /// A message was pinned
    pub async fn message_pinned(
        &self,
        conversation_id: Snowflake,
        message_id: Snowflake,
        pinned_by: Snowflake,
    ) {
        self.manager
            .broadcast_to_conversation(
                ServerEvent::message_pinned(conversation_id, message_id, pinned_by),
                conversation_id,
                Some(pinned_by),
            )
            .await;
    }

    /// A message was unpinned
    pub async fn message_unpinned(
        &self,
        conversation_id: Snowflake,
        message_id: Snowflake,
        unpinned_by: Snowflake,
    ) {
        self.manager
            .broadcast_to_conversation(
                ServerEvent::message_unpinned(conversation_id, message_id, unpinned_by),
                conversation_id,
                Some(unpinned_by),
            )
            .await;
    }

    /// A match was created: subscribe both live sessions to the new
    /// conversation and push `new_match` to the counterpart
    pub async fn match_created(
        &self,
        conversation_id: Snowflake,
        actor_id: Snowflake,
        other_user_id: Snowflake,
        match_data: Value,
    ) {
        self.manager.add_subscription(actor_id, conversation_id);
        self.manager.add_subscription(other_user_id, conversation_id);

        self.manager
            .send_to_user(ServerEvent::new_match(match_data), other_user_id)
            .await;
    }
}

impl std::fmt::Debug for RealtimeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeNotifier")
            .field("manager", &self.manager)
            .finish()
    }
}
