//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching join/leave commands and forwarding room-filtered push
//! events.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType};
use super::subscription::{RoomMembership, parse_room};
use crate::domain::PushEvent;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads join/leave commands from the client.
/// - Forwards push events for joined rooms from the
///   [`broadcast::Receiver`] to the client.
pub async fn run_connection(socket: WebSocket, mut event_rx: broadcast::Receiver<PushEvent>) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut rooms = RoomMembership::new();

    loop {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = handle_text_message(&text, &mut rooms);
                        if let Some(resp_json) = response
                            && ws_tx.send(Message::text(resp_json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            // Event from EventBus
            event = event_rx.recv() => {
                match event {
                    Ok(push_event) => {
                        if rooms.matches(push_event.user_id()) {
                            let msg = WsMessage {
                                id: uuid::Uuid::new_v4().to_string(),
                                msg_type: WsMessageType::Event,
                                timestamp: chrono::Utc::now(),
                                payload: serde_json::to_value(&push_event).unwrap_or_default(),
                            };
                            let json = serde_json::to_string(&msg).unwrap_or_default();
                            if ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

/// Handles a text message from the client, returning an optional JSON response.
fn handle_text_message(text: &str, rooms: &mut RoomMembership) -> Option<String> {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        let err = WsMessage {
            id: String::new(),
            msg_type: WsMessageType::Error,
            timestamp: chrono::Utc::now(),
            payload: serde_json::json!({
                "code": 400,
                "message": "malformed JSON"
            }),
        };
        return serde_json::to_string(&err).ok();
    };

    let Ok(command) = serde_json::from_value::<WsCommand>(msg.payload.clone()) else {
        let err = WsMessage {
            id: msg.id,
            msg_type: WsMessageType::Error,
            timestamp: chrono::Utc::now(),
            payload: serde_json::json!({
                "code": 404,
                "message": "unknown command"
            }),
        };
        return serde_json::to_string(&err).ok();
    };

    let room = match &command {
        WsCommand::Join { room } | WsCommand::Leave { room } => room.clone(),
    };
    let Some(user_id) = parse_room(&room) else {
        let err = WsMessage {
            id: msg.id,
            msg_type: WsMessageType::Error,
            timestamp: chrono::Utc::now(),
            payload: serde_json::json!({
                "code": 400,
                "message": format!("invalid room name: {room:?}")
            }),
        };
        return serde_json::to_string(&err).ok();
    };

    let payload = match command {
        WsCommand::Join { .. } => {
            rooms.join(user_id);
            serde_json::json!({ "joined": room, "count": rooms.count() })
        }
        WsCommand::Leave { .. } => {
            rooms.leave(user_id);
            serde_json::json!({ "left": room, "count": rooms.count() })
        }
    };
    let response = WsMessage {
        id: msg.id,
        msg_type: WsMessageType::Response,
        timestamp: chrono::Utc::now(),
        payload,
    };
    serde_json::to_string(&response).ok()
}
