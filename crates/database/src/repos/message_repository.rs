//! Repository for message data access operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::attachment_repository::AttachmentRepository;
use super::MessageStore;
use crate::entities::{Message, NewAttachment, NewMessage};
use crate::types::{DatabaseResult, Page};

const MESSAGE_COLUMNS: &str =
    "id, chat_id, sender_id, content, created_at, updated_at, edited_at, deleted_at";

/// Repository for message database operations
#[derive(Clone)]
pub struct MessageRepository {
    pool: SqlitePool,
}

impl MessageRepository {
    /// Create a new message repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn attach(&self, mut messages: Vec<Message>) -> DatabaseResult<Vec<Message>> {
        let ids: Vec<String> = messages.iter().map(|m| m.id.clone()).collect();
        let mut grouped = AttachmentRepository::list_for_messages(&self.pool, &ids).await?;
        for message in &mut messages {
            if let Some(attachments) = grouped.remove(&message.id) {
                message.attachments = attachments;
            }
        }
        Ok(messages)
    }
}

#[async_trait]
impl MessageStore for MessageRepository {
    async fn insert(
        &self,
        message: NewMessage,
        attachment: Option<NewAttachment>,
    ) -> DatabaseResult<Message> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO messages (id, chat_id, sender_id, content, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&message.id)
        .bind(&message.chat_id)
        .bind(&message.sender_id)
        .bind(&message.content)
        .bind(message.created_at)
        .bind(message.created_at)
        .execute(&mut *tx)
        .await?;

        let attachments = match attachment {
            Some(attachment) => vec![
                AttachmentRepository::insert_in(&mut tx, &message.id, &attachment, message.created_at)
                    .await?,
            ],
            None => Vec::new(),
        };

        tx.commit().await?;

        info!(
            message_id = %message.id,
            chat_id = %message.chat_id,
            sender_id = %message.sender_id,
            attachments = attachments.len(),
            "created message"
        );

        Ok(Message {
            id: message.id,
            chat_id: message.chat_id,
            sender_id: message.sender_id,
            content: message.content,
            created_at: message.created_at,
            updated_at: message.created_at,
            edited_at: None,
            deleted_at: None,
            attachments,
        })
    }

    async fn find_by_id(&self, id: &str) -> DatabaseResult<Option<Message>> {
        let message = sqlx::query_as::<_, Message>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match message {
            Some(message) => Ok(self.attach(vec![message]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list_by_chat(&self, chat_id: &str, page: Page) -> DatabaseResult<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE chat_id = ?
             ORDER BY created_at ASC, rowid ASC LIMIT ? OFFSET ?"
        ))
        .bind(chat_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        debug!(chat_id, count = messages.len(), ?page, "listed messages");
        self.attach(messages).await
    }

    async fn update_content(
        &self,
        id: &str,
        content: &str,
        edited_at: DateTime<Utc>,
    ) -> DatabaseResult<bool> {
        let result = sqlx::query(
            "UPDATE messages SET content = ?, edited_at = ?, updated_at = ?
             WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(content)
        .bind(edited_at)
        .bind(edited_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn soft_delete(&self, id: &str, deleted_at: DateTime<Utc>) -> DatabaseResult<bool> {
        let result = sqlx::query(
            "UPDATE messages SET deleted_at = ?, updated_at = ?
             WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(deleted_at)
        .bind(deleted_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
