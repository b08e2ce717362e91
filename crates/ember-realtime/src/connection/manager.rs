//! Connection manager
//!
//! Owns the user → connection registry and the user → conversation
//! subscription map. Constructed once at startup and injected into handlers;
//! never a process-global.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use ember_core::Snowflake;
use tokio::sync::mpsc;

use super::connection::{Connection, Outbound};
use crate::protocol::{CloseCode, ServerEvent};

/// Manages all live WebSocket connections for this process
///
/// A user has at most one registered connection; registering again returns
/// the superseded connection so the caller can close it explicitly.
pub struct ConnectionManager {
    /// Live connection per user
    connections: DashMap<Snowflake, Arc<Connection>>,

    /// Conversation IDs each connected user receives broadcasts for
    subscriptions: DashMap<Snowflake, HashSet<Snowflake>>,
}

impl ConnectionManager {
    /// Create a new connection manager
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            subscriptions: DashMap::new(),
        }
    }

    /// Create a new connection manager wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a connection for a user
    ///
    /// Returns the new connection and, when the user was already connected,
    /// the superseded connection (already asked to close).
    pub fn register(
        &self,
        user_id: Snowflake,
        sender: mpsc::Sender<Outbound>,
    ) -> (Arc<Connection>, Option<Arc<Connection>>) {
        let connection = Connection::new(user_id, sender);

        let superseded = self.connections.insert(user_id, connection.clone());
        self.subscriptions.entry(user_id).or_default();

        if let Some(old) = &superseded {
            old.request_close(CloseCode::Superseded);
            tracing::info!(user_id = %user_id, "Existing connection superseded");
        }

        tracing::debug!(user_id = %user_id, "Connection registered");

        (connection, superseded)
    }

    /// Remove a user's connection and subscriptions
    ///
    /// Only removes the registry entry when it still refers to the given
    /// connection; a superseded connection's cleanup must not evict its
    /// replacement.
    pub fn remove(&self, user_id: Snowflake, connection: &Arc<Connection>) -> bool {
        let removed = self
            .connections
            .remove_if(&user_id, |_, current| Arc::ptr_eq(current, connection))
            .is_some();

        if removed {
            self.subscriptions.remove(&user_id);
            tracing::debug!(user_id = %user_id, "Connection removed");
        }

        removed
    }

    /// Whether a user currently has a live connection
    pub fn is_online(&self, user_id: Snowflake) -> bool {
        self.connections.contains_key(&user_id)
    }

    /// Number of live connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Replace a user's subscription set (connect-time snapshot)
    pub fn set_subscriptions(&self, user_id: Snowflake, conversation_ids: Vec<Snowflake>) {
        self.subscriptions
            .insert(user_id, conversation_ids.into_iter().collect());
    }

    /// Add one conversation to a connected user's live subscription set
    ///
    /// No-op for users without a live session; they pick the conversation up
    /// from the connect-time snapshot instead.
    pub fn add_subscription(&self, user_id: Snowflake, conversation_id: Snowflake) {
        if let Some(mut subscriptions) = self.subscriptions.get_mut(&user_id) {
            subscriptions.insert(conversation_id);
        }
    }

    /// Whether a connected user is subscribed to a conversation
    pub fn is_subscribed(&self, user_id: Snowflake, conversation_id: Snowflake) -> bool {
        self.subscriptions
            .get(&user_id)
            .is_some_and(|set| set.contains(&conversation_id))
    }

    /// Deliver an event to one user; silently dropped when offline
    pub async fn send_to_user(&self, event: ServerEvent, user_id: Snowflake) -> bool {
        let Some(connection) = self.connections.get(&user_id).map(|c| c.clone()) else {
            return false;
        };

        connection.send(event).await.is_ok()
    }

    /// Deliver an event to every connected subscriber of a conversation
    ///
    /// Skips the excluded user (typically the actor) and tolerates
    /// connections disappearing mid-iteration. Returns the delivery count.
    pub async fn broadcast_to_conversation(
        &self,
        event: ServerEvent,
        conversation_id: Snowflake,
        exclude_user: Option<Snowflake>,
    ) -> usize {
        // Snapshot the recipients before sending; map guards must not be
        // held across await points
        let recipients: Vec<Snowflake> = self
            .subscriptions
            .iter()
            .filter(|entry| {
                entry.value().contains(&conversation_id) && Some(*entry.key()) != exclude_user
            })
            .map(|entry| *entry.key())
            .collect();

        let mut sent = 0;
        for user_id in recipients {
            // A recipient may have disconnected since the snapshot; skip
            let Some(connection) = self.connections.get(&user_id).map(|c| c.clone()) else {
                continue;
            };
            if connection.send(event.clone()).await.is_ok() {
                sent += 1;
            }
        }

        tracing::trace!(
            conversation_id = %conversation_id,
            sent = sent,
            "Broadcast delivered"
        );

        sent
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("connections", &self.connections.len())
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}
