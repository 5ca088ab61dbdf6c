//! Chat participant entity definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's membership row in a chat. `(chat_id, user_id)` is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChatParticipant {
    pub id: i64,
    pub chat_id: String,
    pub user_id: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewParticipant {
    pub chat_id: String,
    pub user_id: String,
    pub joined_at: DateTime<Utc>,
}
