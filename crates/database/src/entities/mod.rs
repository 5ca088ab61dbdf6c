//! Domain entities for the database layer

pub mod attachment;
pub mod chat;
pub mod message;
pub mod participant;

pub use attachment::{Attachment, NewAttachment};
pub use chat::{Chat, NewChat, DEFAULT_CHAT_TITLE};
pub use message::{Message, NewMessage};
pub use participant::{ChatParticipant, NewParticipant};
