//! Individual WebSocket connection
//!
//! Represents one authenticated user's live connection and its state.

use std::sync::Arc;
use std::time::Instant;

use ember_core::Snowflake;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, RwLock};

use crate::protocol::{CloseCode, ServerEvent};

/// Connection lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    /// Socket accepted, token not yet verified
    Connecting,
    /// Token verified, registration pending
    Authenticated,
    /// Registered, subscribed, and receiving broadcasts
    Active,
    /// Connection is closed
    Closed,
}

/// A frame queued for delivery to the socket
#[derive(Debug, Clone)]
pub enum Outbound {
    Event(ServerEvent),
    Close(CloseCode),
}

/// A single authenticated WebSocket connection
pub struct Connection {
    user_id: Snowflake,
    state: RwLock<ConnectionState>,
    sender: mpsc::Sender<Outbound>,
    opened_at: Instant,
}

impl Connection {
    /// Create a new connection in the `Authenticated` state
    pub fn new(user_id: Snowflake, sender: mpsc::Sender<Outbound>) -> Arc<Self> {
        Arc::new(Self {
            user_id,
            state: RwLock::new(ConnectionState::Authenticated),
            sender,
            opened_at: Instant::now(),
        })
    }

    /// The authenticated user
    pub fn user_id(&self) -> Snowflake {
        self.user_id
    }

    /// Get the current state
    pub async fn state(&self) -> ConnectionState {
        *self.state.read().await
    }

    /// Set the connection state
    pub async fn set_state(&self, state: ConnectionState) {
        *self.state.write().await = state;
    }

    /// How long the connection has been open
    pub fn age(&self) -> std::time::Duration {
        self.opened_at.elapsed()
    }

    /// Queue an event for delivery
    ///
    /// Fails when the socket task has gone away; broadcast paths treat that
    /// as a skip.
    pub async fn send(&self, event: ServerEvent) -> Result<(), SendError> {
        self.sender
            .send(Outbound::Event(event))
            .await
            .map_err(|_| SendError::Closed)
    }

    /// Ask the socket task to close with the given code
    ///
    /// Non-blocking; a full or closed queue means the task is already on its
    /// way out.
    pub fn request_close(&self, code: CloseCode) {
        let _ = self.sender.try_send(Outbound::Close(code));
    }

    /// Whether the socket task has dropped its receiver
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Delivery failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SendError {
    #[error("connection closed")]
    Closed,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("user_id", &self.user_id)
            .field("opened_at", &self.opened_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connection_lifecycle() {
        let (tx, _rx) = mpsc::channel(8);
        let conn = Connection::new(Snowflake::new(1), tx);

        assert_eq!(conn.user_id(), Snowflake::new(1));
        assert_eq!(conn.state().await, ConnectionState::Authenticated);

        conn.set_state(ConnectionState::Active).await;
        assert_eq!(conn.state().await, ConnectionState::Active);
    }

    #[tokio::test]
    async fn test_send_delivers_to_channel() {
        let (tx, mut rx) = mpsc::channel(8);
        let conn = Connection::new(Snowflake::new(1), tx);

        conn.send(ServerEvent::pong()).await.unwrap();
        assert!(matches!(rx.recv().await, Some(Outbound::Event(_))));
    }

    #[tokio::test]
    async fn test_send_fails_after_receiver_drops() {
        let (tx, rx) = mpsc::channel(8);
        let conn = Connection::new(Snowflake::new(1), tx);

        drop(rx);
        assert!(conn.is_closed());
        assert_eq!(conn.send(ServerEvent::pong()).await, Err(SendError::Closed));
    }

    #[tokio::test]
    async fn test_request_close_enqueues_close_frame() {
        let (tx, mut rx) = mpsc::channel(8);
        let conn = Connection::new(Snowflake::new(1), tx);

        conn.request_close(CloseCode::Superseded);
        match rx.recv().await {
            Some(Outbound::Close(code)) => assert_eq!(code, CloseCode::Superseded),
            other => panic!("unexpected frame: {other:?}"),
        }
    }
}
