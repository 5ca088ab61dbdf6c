//! Chat entity definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title used when a chat is created without one.
pub const DEFAULT_CHAT_TITLE: &str = "New Chat";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewChat {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}
