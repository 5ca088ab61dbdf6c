//! Store traits and their SQLite repository implementations
//!
//! Services depend on the traits only, so they can be exercised against
//! mocks. Every method is atomic per call.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{
    Chat, ChatParticipant, Message, NewAttachment, NewChat, NewMessage, NewParticipant,
};
use crate::types::{DatabaseResult, Page};

pub mod attachment_repository;
pub mod chat_repository;
pub mod message_repository;
pub mod participant_repository;

pub use attachment_repository::AttachmentRepository;
pub use chat_repository::{ChatOverview, ChatRepository};
pub use message_repository::MessageRepository;
pub use participant_repository::ParticipantRepository;

#[async_trait]
pub trait ChatStore: Send + Sync {
    async fn insert(&self, chat: NewChat) -> DatabaseResult<Chat>;
    async fn find_by_id(&self, id: &str) -> DatabaseResult<Option<Chat>>;
    /// All chats, oldest first.
    async fn list_all(&self) -> DatabaseResult<Vec<Chat>>;
}

#[async_trait]
pub trait ParticipantStore: Send + Sync {
    /// Fails with [`DatabaseError::Duplicate`](crate::DatabaseError::Duplicate)
    /// when the pair already exists.
    async fn insert(&self, participant: NewParticipant) -> DatabaseResult<ChatParticipant>;
    /// Returns whether a row was removed.
    async fn remove(&self, chat_id: &str, user_id: &str) -> DatabaseResult<bool>;
    async fn list_by_chat(&self, chat_id: &str, page: Page) -> DatabaseResult<Vec<ChatParticipant>>;
}

#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persists the message and, when given, its attachment in one transaction.
    async fn insert(
        &self,
        message: NewMessage,
        attachment: Option<NewAttachment>,
    ) -> DatabaseResult<Message>;

    /// Looks a message up by primary key, attachments included.
    async fn find_by_id(&self, id: &str) -> DatabaseResult<Option<Message>>;

    /// Messages of a chat in creation order, attachments included.
    /// Soft-deleted rows are returned too.
    async fn list_by_chat(&self, chat_id: &str, page: Page) -> DatabaseResult<Vec<Message>>;

    /// Sets new content and `edited_at` on a live message.
    /// Returns `false` when the message is missing or already deleted.
    async fn update_content(
        &self,
        id: &str,
        content: &str,
        edited_at: DateTime<Utc>,
    ) -> DatabaseResult<bool>;

    /// Marks a live message deleted. Returns `false` when the message is
    /// missing or was already deleted, in which case nothing changes.
    async fn soft_delete(&self, id: &str, deleted_at: DateTime<Utc>) -> DatabaseResult<bool>;
}
