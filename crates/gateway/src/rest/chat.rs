//! Chat REST endpoints

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use huddle_chats::{Chat, CreateChatRequest};
use std::sync::Arc;

use crate::error::GatewayResult;
use crate::state::GatewayState;

pub fn create_chat_routes() -> Router<Arc<GatewayState>> {
    Router::new().route("/api/chats", get(list_chats).post(create_chat))
}

/// `GET /api/chats`
pub async fn list_chats(State(state): State<Arc<GatewayState>>) -> GatewayResult<Json<Vec<Chat>>> {
    let chats = state.chat_service.list_chats().await?;
    Ok(Json(chats))
}

/// `POST /api/chats`. A missing or unreadable body creates "New Chat".
pub async fn create_chat(
    State(state): State<Arc<GatewayState>>,
    body: Option<Json<CreateChatRequest>>,
) -> GatewayResult<(StatusCode, Json<Chat>)> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let chat = state.chat_service.create_chat(request).await?;
    Ok((StatusCode::CREATED, Json(chat)))
}
