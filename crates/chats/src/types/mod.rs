//! Shared types for the chat services.

pub mod errors;
pub mod events;
pub mod requests;

pub use errors::{ChatError, ChatResult};
pub use events::{ChatEvent, DeletedMessage};
pub use requests::{
    AddParticipantRequest, AttachmentMeta, CreateChatRequest, CreateMessageRequest,
    UpdateMessageRequest,
};
