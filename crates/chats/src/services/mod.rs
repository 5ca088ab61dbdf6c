//! Business logic services for the chat system.

pub mod chat_service;
pub mod message_service;
pub mod participant_service;

pub use chat_service::ChatService;
pub use message_service::{DeleteOutcome, MessageService, MAX_PAGE_LIMIT};
pub use participant_service::ParticipantService;
