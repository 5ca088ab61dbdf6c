//! Request payloads accepted by the chat services.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateChatRequest {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddParticipantRequest {
    #[serde(default)]
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMessageRequest {
    pub content: String,
}

/// A file that has already been stored; only its reference is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentMeta {
    pub url: String,
    pub mime_type: String,
    pub size_bytes: i64,
}

#[derive(Debug, Clone)]
pub struct CreateMessageRequest {
    pub sender_id: String,
    pub content: String,
    pub attachment: Option<AttachmentMeta>,
}
