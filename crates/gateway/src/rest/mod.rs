//! REST API endpoints for the gateway

pub mod chat;
pub mod health;
pub mod message;
pub mod participant;

use axum::Router;
use crate::state::GatewayState;
use std::sync::Arc;

/// Create all REST API routes
pub fn create_rest_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .merge(health::create_health_routes())
        .merge(chat::create_chat_routes())
        .merge(participant::create_participant_routes())
        .merge(message::create_message_routes())
}
