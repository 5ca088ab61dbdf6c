//! Repository for message attachment data access operations.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crate::entities::{Attachment, NewAttachment};
use crate::types::{DatabaseResult, Page};

const ATTACHMENT_COLUMNS: &str = "id, message_id, url, mime_type, size_bytes, created_at";

/// Repository for attachment database operations
#[derive(Clone)]
pub struct AttachmentRepository {
    pool: SqlitePool,
}

impl AttachmentRepository {
    /// Create a new attachment repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> DatabaseResult<Option<Attachment>> {
        let attachment = sqlx::query_as::<_, Attachment>(&format!(
            "SELECT {ATTACHMENT_COLUMNS} FROM attachments WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attachment)
    }

    /// Attachments of one message in creation order.
    pub async fn list_by_message(
        &self,
        message_id: &str,
        page: Page,
    ) -> DatabaseResult<Vec<Attachment>> {
        let attachments = sqlx::query_as::<_, Attachment>(&format!(
            "SELECT {ATTACHMENT_COLUMNS} FROM attachments WHERE message_id = ?
             ORDER BY created_at ASC, rowid ASC LIMIT ? OFFSET ?"
        ))
        .bind(message_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(attachments)
    }

    /// Inserts an attachment on an existing connection, usually the
    /// transaction that also writes the owning message.
    pub(crate) async fn insert_in(
        conn: &mut SqliteConnection,
        message_id: &str,
        attachment: &NewAttachment,
        created_at: DateTime<Utc>,
    ) -> DatabaseResult<Attachment> {
        sqlx::query(
            "INSERT INTO attachments (id, message_id, url, mime_type, size_bytes, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&attachment.id)
        .bind(message_id)
        .bind(&attachment.url)
        .bind(&attachment.mime_type)
        .bind(attachment.size_bytes)
        .bind(created_at)
        .execute(&mut *conn)
        .await?;

        Ok(Attachment {
            id: attachment.id.clone(),
            message_id: message_id.to_string(),
            url: attachment.url.clone(),
            mime_type: attachment.mime_type.clone(),
            size_bytes: attachment.size_bytes,
            created_at,
        })
    }

    /// Attachments for a batch of messages, grouped by message id.
    pub(crate) async fn list_for_messages(
        pool: &SqlitePool,
        message_ids: &[String],
    ) -> DatabaseResult<HashMap<String, Vec<Attachment>>> {
        let mut grouped: HashMap<String, Vec<Attachment>> = HashMap::new();
        if message_ids.is_empty() {
            return Ok(grouped);
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {ATTACHMENT_COLUMNS} FROM attachments WHERE message_id IN ("
        ));
        let mut separated = builder.separated(", ");
        for id in message_ids {
            separated.push_bind(id.clone());
        }
        separated.push_unseparated(") ORDER BY created_at ASC, rowid ASC");

        let rows = builder
            .build_query_as::<Attachment>()
            .fetch_all(pool)
            .await?;

        for attachment in rows {
            grouped
                .entry(attachment.message_id.clone())
                .or_default()
                .push(attachment);
        }
        Ok(grouped)
    }
}
