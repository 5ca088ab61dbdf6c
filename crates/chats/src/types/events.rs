//! Event types for real-time chat updates.

use huddle_database::Message;
use serde::{Deserialize, Serialize};

/// Envelope pushed to every connection viewing a chat.
///
/// Serializes as `{"type": "message.new", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ChatEvent {
    #[serde(rename = "message.new")]
    MessageCreated(Message),

    #[serde(rename = "message.update")]
    MessageUpdated(Message),

    #[serde(rename = "message.delete")]
    MessageDeleted(DeletedMessage),
}

/// Payload of a delete event: only the id is sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletedMessage {
    pub id: String,
}

impl ChatEvent {
    pub fn deleted(message_id: impl Into<String>) -> Self {
        ChatEvent::MessageDeleted(DeletedMessage {
            id: message_id.into(),
        })
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            ChatEvent::MessageCreated(_) => "message.new",
            ChatEvent::MessageUpdated(_) => "message.update",
            ChatEvent::MessageDeleted(_) => "message.delete",
        }
    }

    /// Id of the message the event is about.
    pub fn message_id(&self) -> &str {
        match self {
            ChatEvent::MessageCreated(message) | ChatEvent::MessageUpdated(message) => &message.id,
            ChatEvent::MessageDeleted(deleted) => &deleted.id,
        }
    }
}
