//! WebSocket session loop
//!
//! One task pair per connection: this function drives the inbound stream in
//! arrival order while a spawned pump drains the outbound queue into the
//! socket. Frame-processing failures terminate the session rather than being
//! reported to the client.

use std::sync::Arc;

use axum::extract::ws::{CloseFrame, Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use ember_core::Snowflake;
use ember_service::{ServiceContext, ServiceResult, UserService};

use crate::connection::{Connection, ConnectionManager, ConnectionState, Outbound};
use crate::protocol::{ClientEvent, CloseCode, ServerEvent};

/// Outbound queue depth per connection
const OUTBOUND_BUFFER: usize = 100;

/// Drive an authenticated WebSocket session to completion
///
/// The caller has already validated the access token; this registers the
/// connection, snapshots subscriptions, pumps frames, and cleans up on exit.
pub async fn run_session(
    socket: WebSocket,
    user_id: Snowflake,
    ctx: ServiceContext,
    manager: Arc<ConnectionManager>,
) {
    let (tx, mut rx) = mpsc::channel::<Outbound>(OUTBOUND_BUFFER);
    let (connection, _superseded) = manager.register(user_id, tx);
    connection.set_state(ConnectionState::Active).await;

    tracing::info!(user_id = %user_id, "WebSocket session started");

    // Persist presence and snapshot the subscription set
    let counterparts = match attach(&ctx, &manager, user_id).await {
        Ok(counterparts) => counterparts,
        Err(e) => {
            tracing::warn!(user_id = %user_id, error = %e, "Failed to attach session");
            manager.remove(user_id, &connection);
            return;
        }
    };

    for other in &counterparts {
        manager
            .send_to_user(ServerEvent::user_online(user_id), *other)
            .await;
    }

    let (mut ws_sink, mut ws_stream) = socket.split();

    // Outbound pump: queue -> socket. Ends when every sender is gone or a
    // close frame is flushed.
    let send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            match frame {
                Outbound::Event(event) => {
                    let Ok(json) = event.to_json() else {
                        continue;
                    };
                    if ws_sink.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
                Outbound::Close(code) => {
                    let _ = ws_sink
                        .send(Message::Close(Some(CloseFrame {
                            code: code.as_u16(),
                            reason: code.description().into(),
                        })))
                        .await;
                    break;
                }
            }
        }
        let _ = ws_sink.close().await;
    });

    // Inbound loop: frames are processed strictly in arrival order
    while let Some(frame) = ws_stream.next().await {
        match frame {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientEvent>(&text) {
                Ok(event) => {
                    if let Err(e) = handle_client_event(event, user_id, &connection, &manager).await
                    {
                        tracing::warn!(user_id = %user_id, error = %e, "Frame handling failed");
                        connection.request_close(CloseCode::UnknownError);
                        break;
                    }
                }
                Err(e) => {
                    tracing::debug!(user_id = %user_id, error = %e, "Undecodable frame");
                    connection.request_close(CloseCode::DecodeError);
                    break;
                }
            },
            Ok(Message::Close(_)) => {
                tracing::debug!(user_id = %user_id, "Client closed connection");
                break;
            }
            // Control frames are answered by axum; binary frames are ignored
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(user_id = %user_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    // A superseded connection's cleanup must leave the replacement untouched
    let owned_registry_entry = manager.remove(user_id, &connection);
    connection.set_state(ConnectionState::Closed).await;
    drop(connection);
    let _ = send_task.await;

    if owned_registry_entry {
        if let Err(e) = UserService::new(&ctx).set_presence(user_id, false).await {
            tracing::warn!(user_id = %user_id, error = %e, "Failed to persist offline presence");
        }
        for other in &counterparts {
            manager
                .send_to_user(ServerEvent::user_offline(user_id), *other)
                .await;
        }
    }

    tracing::info!(user_id = %user_id, "WebSocket session ended");
}

/// Mark the user online and snapshot subscriptions; returns conversation
/// counterparts for presence fan-out
async fn attach(
    ctx: &ServiceContext,
    manager: &ConnectionManager,
    user_id: Snowflake,
) -> ServiceResult<Vec<Snowflake>> {
    UserService::new(ctx).set_presence(user_id, true).await?;

    let conversations = ctx.conversation_repo().find_for_user(user_id).await?;
    manager.set_subscriptions(user_id, conversations.iter().map(|c| c.id).collect());

    Ok(conversations
        .iter()
        .map(|c| c.other_user_id(user_id))
        .collect())
}

/// Route one inbound frame
///
/// Live presence signals only; nothing here touches persistence. The
/// persisted read-state transition happens through the REST mark-read call.
async fn handle_client_event(
    event: ClientEvent,
    user_id: Snowflake,
    connection: &Arc<Connection>,
    manager: &ConnectionManager,
) -> ServiceResult<()> {
    match event {
        ClientEvent::Ping => {
            let _ = connection.send(ServerEvent::pong()).await;
        }
        ClientEvent::Typing(payload) => {
            if manager.is_subscribed(user_id, payload.conversation_id) {
                manager
                    .broadcast_to_conversation(
                        ServerEvent::user_typing(payload.conversation_id, user_id),
                        payload.conversation_id,
                        Some(user_id),
                    )
                    .await;
            }
        }
        ClientEvent::StopTyping(payload) => {
            if manager.is_subscribed(user_id, payload.conversation_id) {
                manager
                    .broadcast_to_conversation(
                        ServerEvent::user_stop_typing(payload.conversation_id, user_id),
                        payload.conversation_id,
                        Some(user_id),
                    )
                    .await;
            }
        }
        ClientEvent::MessageRead(payload) => {
            if manager.is_subscribed(user_id, payload.conversation_id) {
                manager
                    .broadcast_to_conversation(
                        ServerEvent::message_status(payload.conversation_id, &payload.message_ids),
                        payload.conversation_id,
                        Some(user_id),
                    )
                    .await;
            }
        }
        ClientEvent::RecordingVoice(payload) => {
            if manager.is_subscribed(user_id, payload.conversation_id) {
                manager
                    .broadcast_to_conversation(
                        ServerEvent::user_recording_voice(payload.conversation_id, user_id),
                        payload.conversation_id,
                        Some(user_id),
                    )
                    .await;
            }
        }
    }

    Ok(())
}
