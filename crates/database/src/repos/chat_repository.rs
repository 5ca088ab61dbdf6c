//! Repository for chat data access operations.

use async_trait::async_trait;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::info;

use super::ChatStore;
use crate::entities::{Chat, NewChat};
use crate::types::DatabaseResult;

/// A chat together with its row counts, used by the data dump.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChatOverview {
    pub id: String,
    pub title: String,
    pub participant_count: i64,
    pub message_count: i64,
    pub deleted_message_count: i64,
}

/// Repository for chat database operations
#[derive(Clone)]
pub struct ChatRepository {
    pool: SqlitePool,
}

impl ChatRepository {
    /// Create a new chat repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Every chat with participant and message counts.
    pub async fn overview(&self) -> DatabaseResult<Vec<ChatOverview>> {
        let rows = sqlx::query_as::<_, ChatOverview>(
            r#"
            SELECT c.id, c.title,
                   (SELECT COUNT(*) FROM chat_participants p WHERE p.chat_id = c.id) AS participant_count,
                   (SELECT COUNT(*) FROM messages m WHERE m.chat_id = c.id) AS message_count,
                   (SELECT COUNT(*) FROM messages m WHERE m.chat_id = c.id AND m.deleted_at IS NOT NULL) AS deleted_message_count
            FROM chats c
            ORDER BY c.created_at ASC, c.rowid ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[async_trait]
impl ChatStore for ChatRepository {
    async fn insert(&self, chat: NewChat) -> DatabaseResult<Chat> {
        sqlx::query("INSERT INTO chats (id, title, created_at, updated_at) VALUES (?, ?, ?, ?)")
            .bind(&chat.id)
            .bind(&chat.title)
            .bind(chat.created_at)
            .bind(chat.created_at)
            .execute(&self.pool)
            .await?;

        info!(chat_id = %chat.id, title = %chat.title, "created chat");

        Ok(Chat {
            id: chat.id,
            title: chat.title,
            created_at: chat.created_at,
            updated_at: chat.created_at,
        })
    }

    async fn find_by_id(&self, id: &str) -> DatabaseResult<Option<Chat>> {
        let chat = sqlx::query_as::<_, Chat>(
            "SELECT id, title, created_at, updated_at FROM chats WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(chat)
    }

    async fn list_all(&self) -> DatabaseResult<Vec<Chat>> {
        let chats = sqlx::query_as::<_, Chat>(
            "SELECT id, title, created_at, updated_at FROM chats ORDER BY created_at ASC, rowid ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(chats)
    }
}
