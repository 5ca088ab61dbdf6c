//! # Huddle Chats Crate
//!
//! Business rules for chats, participants and messages.
//!
//! ## Architecture
//!
//! - **Lifecycle**: the message state machine and the edit window
//! - **Services**: validation and orchestration over the store traits
//! - **Types**: errors, requests and real-time events
//! - **Utils**: input validation
//!
//! Services never publish events themselves; callers publish the
//! matching [`ChatEvent`] after a successful call.

pub mod lifecycle;
pub mod services;
pub mod types;
pub mod utils;

pub use lifecycle::{Clock, MessageState, SystemClock, EDIT_WINDOW_MS};
pub use services::{ChatService, DeleteOutcome, MessageService, ParticipantService};
pub use types::{
    AddParticipantRequest, AttachmentMeta, ChatError, ChatEvent, ChatResult, CreateChatRequest,
    CreateMessageRequest, DeletedMessage, UpdateMessageRequest,
};

pub use huddle_database::{Attachment, Chat, ChatParticipant, Message};
