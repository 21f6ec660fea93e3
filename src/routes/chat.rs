//! Chat routes: room listing, message log and the socket echo stub.

use crate::error::Result;
use crate::models::{ChatMessage, ChatRoom, WireMessage};
use crate::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, Query, State,
    },
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;

/// Room routes (require authentication).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/chat/rooms/", get(list_rooms))
        .route("/api/chat/rooms/{room_id}/messages/", get(room_messages))
}

/// Socket route. Public: the stub has no handshake.
pub fn socket_routes() -> Router<Arc<AppState>> {
    Router::new().route("/ws/chat/", get(ws_handler))
}

async fn list_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<ChatRoom>> {
    Json(state.chat.rooms())
}

async fn room_messages(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>> {
    Ok(Json(state.chat.messages(&room_id)?))
}

#[derive(Debug, Deserialize)]
pub struct SocketParams {
    /// Room whose log records the echoed messages
    pub room: Option<String>,
    #[serde(default)]
    pub character_id: String,
}

/// WebSocket upgrade handler
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(params): Query<SocketParams>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, params))
}

/// Echo every well-formed `{sender, content}` frame back to the sender.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>, params: SocketParams) {
    let (mut sender, mut receiver) = socket.split();
    tracing::info!(room = ?params.room, "Chat socket connected");

    while let Some(Ok(frame)) = receiver.next().await {
        let text = match frame {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };

        let Some(reply) = echo_frame(&state, &params, text.as_str()) else {
            continue;
        };
        if sender.send(Message::Text(reply.into())).await.is_err() {
            break;
        }
    }

    tracing::info!("Chat socket closed");
}

/// Reply for one text frame, logging it to the socket's room when one is set.
/// Malformed frames get no reply.
fn echo_frame(state: &AppState, params: &SocketParams, text: &str) -> Option<String> {
    let wire: WireMessage = match serde_json::from_str(text) {
        Ok(wire) => wire,
        Err(e) => {
            tracing::debug!(error = %e, "Dropping malformed chat frame");
            return None;
        }
    };

    if let Some(room) = &params.room {
        if let Err(e) = state
            .chat
            .post(room, &params.character_id, &wire.sender, &wire.content)
        {
            tracing::debug!(error = %e, room = %room, "Chat message not logged");
        }
    }

    serde_json::to_string(&wire).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::MockDb;
    use crate::time_utils::SystemClock;

    fn state() -> AppState {
        AppState::new(Config::test_default(), MockDb::seeded(), Arc::new(SystemClock))
    }

    fn params(room: Option<&str>) -> SocketParams {
        SocketParams {
            room: room.map(str::to_string),
            character_id: "char_1".to_string(),
        }
    }

    #[test]
    fn test_frame_echoed_unchanged() {
        let state = state();
        let reply = echo_frame(&state, &params(None), r#"{"sender":"Lyra","content":"Hello there"}"#)
            .expect("reply");

        let wire: WireMessage = serde_json::from_str(&reply).unwrap();
        assert_eq!(
            wire,
            WireMessage {
                sender: "Lyra".to_string(),
                content: "Hello there".to_string(),
            }
        );
        assert!(state.db.messages("room_1").is_empty());
    }

    #[test]
    fn test_frame_logged_to_room() {
        let state = state();
        echo_frame(&state, &params(Some("room_1")), r#"{"sender":"Lyra","content":"hi"}"#)
            .expect("reply");

        let messages = state.chat.messages("room_1").unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].character_id, "char_1");
        assert_eq!(messages[0].to_wire().content, "hi");
    }

    #[test]
    fn test_malformed_frame_dropped() {
        let state = state();
        assert!(echo_frame(&state, &params(Some("room_1")), "not json").is_none());
        assert!(echo_frame(&state, &params(None), r#"{"sender":"Lyra"}"#).is_none());
        assert!(state.chat.messages("room_1").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_room_still_echoes() {
        let state = state();
        let reply = echo_frame(&state, &params(Some("room_missing")), r#"{"sender":"a","content":"b"}"#);
        assert!(reply.is_some());
    }
}
