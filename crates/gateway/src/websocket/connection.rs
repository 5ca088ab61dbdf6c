//! Binds an upgraded connection to a chat room for its lifetime.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::Uri,
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::rooms::{ConnectionHandle, ConnectionId};
use crate::error::GatewayError;
use crate::state::GatewayState;

/// `GET /ws/chats/:chat_id`
pub async fn chat_socket_handler(
    ws: WebSocketUpgrade,
    Path(chat_id): Path<String>,
    State(state): State<Arc<GatewayState>>,
) -> Response {
    upgrade(ws, chat_id, state)
}

/// Router fallback: accepts `.../ws/chats/{chatId}` behind any prefix and
/// answers 404 for everything else.
pub async fn fallback_handler(
    ws: Option<WebSocketUpgrade>,
    uri: Uri,
    State(state): State<Arc<GatewayState>>,
) -> Response {
    match (parse_chat_path(uri.path()), ws) {
        (Some(chat_id), Some(ws)) => upgrade(ws, chat_id, state),
        (Some(_), None) => {
            GatewayError::InvalidRequest("Expected a websocket upgrade".to_string()).into_response()
        }
        (None, _) => GatewayError::NotFound("Not found".to_string()).into_response(),
    }
}

/// Extracts the chat id from a path ending in `ws/chats/{chatId}`.
pub fn parse_chat_path(path: &str) -> Option<String> {
    let segments: Vec<&str> = path.split('/').collect();
    let ws_index = segments.iter().position(|segment| *segment == "ws")?;

    match &segments[ws_index + 1..] {
        ["chats", chat_id] if !chat_id.is_empty() => Some((*chat_id).to_string()),
        _ => None,
    }
}

fn upgrade(ws: WebSocketUpgrade, chat_id: String, state: Arc<GatewayState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, chat_id, state))
}

async fn handle_socket(socket: WebSocket, chat_id: String, state: Arc<GatewayState>) {
    let connection_id = ConnectionId::next();
    let (mut ws_sender, mut receiver) = socket.split();
    let (out_tx, mut out_rx) = mpsc::channel::<Arc<str>>(state.realtime.channel_capacity);
    let send_timeout = Duration::from_millis(state.realtime.send_timeout_ms);

    state
        .rooms
        .register(&chat_id, ConnectionHandle::new(connection_id, out_tx));
    info!(%chat_id, %connection_id, "websocket connected");

    let writer_chat_id = chat_id.clone();
    let mut sender_task = tokio::spawn(async move {
        while let Some(frame) = out_rx.recv().await {
            match tokio::time::timeout(send_timeout, ws_sender.send(Message::Text(frame.to_string())))
                .await
            {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    debug!(chat_id = %writer_chat_id, %connection_id, error = %e, "websocket send failed");
                    break;
                }
                Err(_) => {
                    warn!(chat_id = %writer_chat_id, %connection_id, "websocket send timed out, closing");
                    break;
                }
            }
        }
        let _ = tokio::time::timeout(send_timeout, ws_sender.close()).await;
    });

    // Inbound frames carry no commands; only a close ends the session.
    let mut receive_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Close(_)) | Err(_) => break,
                Ok(_) => {}
            }
        }
    });

    tokio::select! {
        _ = &mut sender_task => {}
        _ = &mut receive_task => {}
    }

    state.rooms.unregister(&chat_id, connection_id);
    sender_task.abort();
    receive_task.abort();
    info!(%chat_id, %connection_id, "websocket disconnected");
}
