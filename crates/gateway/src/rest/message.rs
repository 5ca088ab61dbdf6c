//! Message REST endpoints
//!
//! Every mutating handler holds the chat's ordering guard across the write
//! and the publish, and publishes only after the write succeeded.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use huddle_chats::{
    ChatEvent, CreateMessageRequest, DeleteOutcome, Message, UpdateMessageRequest,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::error::GatewayResult;
use crate::state::GatewayState;

pub fn create_message_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route(
            "/api/chats/:chat_id/messages",
            get(list_messages).post(create_message),
        )
        .route(
            "/api/chats/:chat_id/messages/:message_id",
            put(update_message).delete(delete_message),
        )
}

/// Raw paging parameters; unparseable values fall back to the defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ListMessagesQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl ListMessagesQuery {
    fn parse(value: Option<&str>) -> Option<i64> {
        value.and_then(|raw| raw.trim().parse().ok())
    }
}

/// Fields of the multipart create form.
#[derive(Debug, Default)]
struct MessageForm {
    sender_id: String,
    content: String,
    file: Option<UploadedFile>,
}

#[derive(Debug)]
struct UploadedFile {
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: axum::body::Bytes,
}

impl MessageForm {
    async fn read(multipart: &mut Multipart) -> GatewayResult<Self> {
        let mut form = MessageForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("senderId") => form.sender_id = field.text().await?,
                Some("content") => form.content = field.text().await?,
                Some("file") => {
                    let file_name = field.file_name().map(str::to_string);
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await?;
                    form.file = Some(UploadedFile {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
                other => debug!(field = ?other, "ignoring form field"),
            }
        }

        Ok(form)
    }
}

/// `GET /api/chats/:chat_id/messages?limit&offset`
pub async fn list_messages(
    State(state): State<Arc<GatewayState>>,
    Path(chat_id): Path<String>,
    Query(query): Query<ListMessagesQuery>,
) -> GatewayResult<Json<Vec<Message>>> {
    let messages = state
        .message_service
        .list_messages(
            &chat_id,
            ListMessagesQuery::parse(query.limit.as_deref()),
            ListMessagesQuery::parse(query.offset.as_deref()),
        )
        .await?;
    Ok(Json(messages))
}

/// `POST /api/chats/:chat_id/messages` (multipart: `senderId`, `content`, `file?`)
pub async fn create_message(
    State(state): State<Arc<GatewayState>>,
    Path(chat_id): Path<String>,
    mut multipart: Multipart,
) -> GatewayResult<(StatusCode, Json<Message>)> {
    let form = MessageForm::read(&mut multipart).await?;

    let stored = match &form.file {
        Some(file) => Some(
            state
                .uploads
                .save(
                    file.file_name.as_deref(),
                    file.content_type.as_deref(),
                    &file.bytes,
                )
                .await?,
        ),
        None => None,
    };

    let request = CreateMessageRequest {
        sender_id: form.sender_id,
        content: form.content,
        attachment: stored.as_ref().map(|file| file.meta.clone()),
    };

    let _guard = state.rooms.ordering_guard(&chat_id).await;
    let message = match state.message_service.create_message(&chat_id, request).await {
        Ok(message) => message,
        Err(e) => {
            if let Some(file) = &stored {
                state.uploads.discard(file).await;
            }
            return Err(e.into());
        }
    };

    state
        .rooms
        .publish(&chat_id, &ChatEvent::MessageCreated(message.clone()));
    Ok((StatusCode::CREATED, Json(message)))
}

/// `PUT /api/chats/:chat_id/messages/:message_id`
pub async fn update_message(
    State(state): State<Arc<GatewayState>>,
    Path((chat_id, message_id)): Path<(String, String)>,
    Json(request): Json<UpdateMessageRequest>,
) -> GatewayResult<Json<Message>> {
    let _guard = state.rooms.ordering_guard(&chat_id).await;
    let message = state
        .message_service
        .edit_message(&chat_id, &message_id, request.content)
        .await?;

    state
        .rooms
        .publish(&chat_id, &ChatEvent::MessageUpdated(message.clone()));
    Ok(Json(message))
}

/// `DELETE /api/chats/:chat_id/messages/:message_id`
pub async fn delete_message(
    State(state): State<Arc<GatewayState>>,
    Path((chat_id, message_id)): Path<(String, String)>,
) -> GatewayResult<StatusCode> {
    let _guard = state.rooms.ordering_guard(&chat_id).await;
    let outcome = state
        .message_service
        .delete_message(&chat_id, &message_id)
        .await?;

    if outcome == DeleteOutcome::Deleted {
        state.rooms.publish(&chat_id, &ChatEvent::deleted(message_id));
    }
    Ok(StatusCode::NO_CONTENT)
}
