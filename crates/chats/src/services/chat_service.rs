//! Chat service for managing chat operations.

use std::sync::Arc;

use huddle_database::{Chat, ChatRepository, ChatStore, NewChat};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::lifecycle::{Clock, SystemClock};
use crate::types::{ChatResult, CreateChatRequest};
use crate::utils::Validator;

/// Service for managing chat operations
#[derive(Clone)]
pub struct ChatService {
    chats: Arc<dyn ChatStore>,
    clock: Arc<dyn Clock>,
}

impl ChatService {
    /// Create a new chat service backed by SQLite
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_store(Arc::new(ChatRepository::new(pool)), Arc::new(SystemClock))
    }

    pub fn with_store(chats: Arc<dyn ChatStore>, clock: Arc<dyn Clock>) -> Self {
        Self { chats, clock }
    }

    /// Create a chat. A missing or blank title becomes "New Chat".
    pub async fn create_chat(&self, request: CreateChatRequest) -> ChatResult<Chat> {
        let title = Validator::chat_title(request.title.as_deref())?;

        let chat = self
            .chats
            .insert(NewChat {
                id: Uuid::new_v4().to_string(),
                title,
                created_at: self.clock.now(),
            })
            .await?;

        info!(chat_id = %chat.id, "chat created");
        Ok(chat)
    }

    pub async fn list_chats(&self) -> ChatResult<Vec<Chat>> {
        Ok(self.chats.list_all().await?)
    }
}
