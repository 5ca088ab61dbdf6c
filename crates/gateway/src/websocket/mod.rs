//! WebSocket endpoints for the gateway

pub mod connection;
pub mod rooms;

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::state::GatewayState;

pub use connection::{chat_socket_handler, fallback_handler, parse_chat_path};
pub use rooms::{ConnectionHandle, ConnectionId, OrderingGuard, PublishReport, Rooms};

/// Create all WebSocket routes. Prefixed paths are served by [`fallback_handler`].
pub fn create_websocket_routes() -> Router<Arc<GatewayState>> {
    Router::new().route("/ws/chats/:chat_id", get(chat_socket_handler))
}
