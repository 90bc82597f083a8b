//! Minimal WebSocket endpoint.
//!
//! On open the server pushes `CONNECTED` with a fresh id; a `PING` text
//! frame is answered with `PONG`. Everything else is logged and ignored.

use std::sync::Arc;

use axum::extract::ws::{close_code, CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dev::state::DevState;

/// Frames sent by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    Connected { id: String },
    Pong,
}

/// The only part of an inbound frame the server looks at.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientMessage {
    #[serde(rename = "type")]
    pub kind: String,
}

/// Reply for one inbound text frame, if any.
pub fn reply_to(text: &str) -> Option<ServerMessage> {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) if message.kind == "PING" => Some(ServerMessage::Pong),
        Ok(message) => {
            tracing::debug!(kind = %message.kind, "ignoring websocket message");
            None
        }
        Err(e) => {
            tracing::debug!(error = %e, "ignoring malformed websocket message");
            None
        }
    }
}

/// Upgrade the connection, or answer 400 if the request is not a valid
/// WebSocket handshake.
pub async fn upgrade(state: Arc<DevState>, mut parts: Parts) -> Response {
    match WebSocketUpgrade::from_request_parts(&mut parts, &()).await {
        Ok(ws) => ws.on_upgrade(move |socket| handle_socket(socket, state)),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "websocket upgrade failed");
            (StatusCode::BAD_REQUEST, rejection.body_text()).into_response()
        }
    }
}

async fn handle_socket(mut socket: WebSocket, state: Arc<DevState>) {
    // Held until this task ends; the server waits on it during shutdown.
    let mut shutdown = state.subscribe_shutdown();
    let id = Uuid::new_v4().simple().to_string();

    if *shutdown.borrow_and_update() {
        let _ = socket.send(close_message()).await;
        return;
    }

    tracing::debug!(%id, "websocket connected");
    if send(&mut socket, &ServerMessage::Connected { id: id.clone() })
        .await
        .is_err()
    {
        return;
    }

    loop {
        tokio::select! {
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    if let Some(reply) = reply_to(text.as_str()) {
                        if send(&mut socket, &reply).await.is_err() {
                            break;
                        }
                    }
                }
                Some(Ok(Message::Binary(bytes))) => {
                    tracing::debug!(len = bytes.len(), "ignoring binary websocket frame");
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::debug!(%id, error = %e, "websocket error");
                    break;
                }
            },
            _ = shutdown.changed() => {
                let _ = socket.send(close_message()).await;
                break;
            }
        }
    }

    tracing::debug!(%id, "websocket closed");
}

async fn send(socket: &mut WebSocket, message: &ServerMessage) -> Result<(), axum::Error> {
    match serde_json::to_string(message) {
        Ok(text) => socket.send(Message::Text(text.into())).await,
        Err(e) => {
            tracing::warn!(error = %e, "failed to encode websocket message");
            Ok(())
        }
    }
}

fn close_message() -> Message {
    Message::Close(Some(CloseFrame {
        code: close_code::AWAY,
        reason: "server shutting down".into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_encoding() {
        let connected =
            serde_json::to_value(ServerMessage::Connected { id: "abc".into() }).unwrap();
        assert_eq!(connected, serde_json::json!({"type": "CONNECTED", "id": "abc"}));

        let pong = serde_json::to_value(ServerMessage::Pong).unwrap();
        assert_eq!(pong, serde_json::json!({"type": "PONG"}));
    }

    #[test]
    fn test_reply_to_ping() {
        assert_eq!(reply_to(r#"{"type":"PING"}"#), Some(ServerMessage::Pong));
        assert_eq!(reply_to(r#"{"type":"PING","extra":1}"#), Some(ServerMessage::Pong));
    }

    #[test]
    fn test_other_frames_are_ignored() {
        assert_eq!(reply_to(r#"{"type":"CHAT","body":"hi"}"#), None);
        assert_eq!(reply_to("not json"), None);
        assert_eq!(reply_to(r#"{"kind":"PING"}"#), None);
        assert_eq!(reply_to(r#"{"type":"ping"}"#), None);
    }
}
