//! Message service for managing message operations.
//!
//! Owns the create / edit / soft-delete rules. Broadcasting is left to the
//! caller, which must only publish after a call here returned `Ok`.

use std::sync::Arc;

use huddle_database::{Message, MessageRepository, MessageStore, NewAttachment, NewMessage, Page};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::lifecycle::{ensure_editable, Clock, MessageState, SystemClock};
use crate::types::{ChatError, ChatResult, CreateMessageRequest};
use crate::utils::Validator;

pub const MAX_PAGE_LIMIT: i64 = 500;

/// Result of a delete request. Deleting twice is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The message was live and is now soft-deleted.
    Deleted,
    /// The message had already been deleted; nothing changed.
    AlreadyDeleted,
}

/// Service for managing message operations
#[derive(Clone)]
pub struct MessageService {
    messages: Arc<dyn MessageStore>,
    clock: Arc<dyn Clock>,
}

impl MessageService {
    /// Create a new message service backed by SQLite
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_store(Arc::new(MessageRepository::new(pool)), Arc::new(SystemClock))
    }

    pub fn with_store(messages: Arc<dyn MessageStore>, clock: Arc<dyn Clock>) -> Self {
        Self { messages, clock }
    }

    /// Persist a message and its optional attachment as one unit.
    ///
    /// The chat is not looked up first; an unknown chat surfaces as a
    /// storage failure from the foreign key.
    pub async fn create_message(
        &self,
        chat_id: &str,
        request: CreateMessageRequest,
    ) -> ChatResult<Message> {
        Validator::user_id("senderId", &request.sender_id)?;
        Validator::message_body(&request.content, request.attachment.is_some())?;

        let new_message = NewMessage {
            id: Uuid::new_v4().to_string(),
            chat_id: chat_id.to_string(),
            sender_id: request.sender_id,
            content: request.content,
            created_at: self.clock.now(),
        };
        let attachment = request.attachment.map(|meta| NewAttachment {
            id: Uuid::new_v4().to_string(),
            url: meta.url,
            mime_type: meta.mime_type,
            size_bytes: meta.size_bytes,
        });

        let message = self.messages.insert(new_message, attachment).await?;
        Ok(message)
    }

    /// Replace the content of a live message inside its edit window.
    pub async fn edit_message(
        &self,
        chat_id: &str,
        message_id: &str,
        content: String,
    ) -> ChatResult<Message> {
        let mut message = self.find_in_chat(chat_id, message_id).await?;
        let now = self.clock.now();
        ensure_editable(&message, now)?;

        // A concurrent delete can land between the read and this write.
        if !self.messages.update_content(message_id, &content, now).await? {
            return Err(ChatError::MessageDeleted);
        }

        message.content = content;
        message.edited_at = Some(now);
        message.updated_at = now;

        info!(chat_id, message_id, "message edited");
        Ok(message)
    }

    /// Soft-delete a message. The row and its content stay in storage.
    pub async fn delete_message(&self, chat_id: &str, message_id: &str) -> ChatResult<DeleteOutcome> {
        let message = self.find_in_chat(chat_id, message_id).await?;
        if MessageState::of(&message).is_terminal() {
            debug!(chat_id, message_id, "message already deleted");
            return Ok(DeleteOutcome::AlreadyDeleted);
        }

        let outcome = if self.messages.soft_delete(message_id, self.clock.now()).await? {
            info!(chat_id, message_id, "message deleted");
            DeleteOutcome::Deleted
        } else {
            DeleteOutcome::AlreadyDeleted
        };
        Ok(outcome)
    }

    /// Messages of a chat, oldest first, deleted ones included.
    ///
    /// A missing or non-positive `limit` means 50 and it is capped at
    /// [`MAX_PAGE_LIMIT`]; a missing or negative `offset` means 0.
    pub async fn list_messages(
        &self,
        chat_id: &str,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> ChatResult<Vec<Message>> {
        let page = normalize_page(limit, offset);
        Ok(self.messages.list_by_chat(chat_id, page).await?)
    }

    async fn find_in_chat(&self, chat_id: &str, message_id: &str) -> ChatResult<Message> {
        match self.messages.find_by_id(message_id).await? {
            Some(message) if message.chat_id == chat_id => Ok(message),
            _ => Err(ChatError::message_not_found(message_id)),
        }
    }
}

pub fn normalize_page(limit: Option<i64>, offset: Option<i64>) -> Page {
    let limit = match limit {
        Some(limit) if limit > 0 => limit.min(MAX_PAGE_LIMIT),
        _ => Page::DEFAULT_LIMIT,
    };
    let offset = offset.filter(|offset| *offset >= 0).unwrap_or(0);
    Page::new(limit, offset)
}
