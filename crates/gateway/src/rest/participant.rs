//! Participant REST endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use huddle_chats::{AddParticipantRequest, ChatParticipant};
use std::sync::Arc;

use crate::error::GatewayResult;
use crate::state::GatewayState;

pub fn create_participant_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/api/chats/:chat_id/participants", post(add_participant))
        .route(
            "/api/chats/:chat_id/participants/:user_id",
            delete(remove_participant),
        )
}

/// `POST /api/chats/:chat_id/participants`
pub async fn add_participant(
    State(state): State<Arc<GatewayState>>,
    Path(chat_id): Path<String>,
    Json(request): Json<AddParticipantRequest>,
) -> GatewayResult<(StatusCode, Json<ChatParticipant>)> {
    let participant = state
        .participant_service
        .add_participant(&chat_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(participant)))
}

/// `DELETE /api/chats/:chat_id/participants/:user_id`
pub async fn remove_participant(
    State(state): State<Arc<GatewayState>>,
    Path((chat_id, user_id)): Path<(String, String)>,
) -> GatewayResult<StatusCode> {
    state
        .participant_service
        .remove_participant(&chat_id, &user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
