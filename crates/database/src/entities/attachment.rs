//! Attachment entity definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference to an externally stored file. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    pub message_id: String,
    pub url: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAttachment {
    pub id: String,
    pub url: String,
    pub mime_type: String,
    pub size_bytes: i64,
}
