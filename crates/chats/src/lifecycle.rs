//! Message lifecycle: `created -> edited* -> deleted`.
//!
//! Edits are allowed any number of times while the message is live and no
//! more than [`EDIT_WINDOW_MS`] after its creation. Deletion is terminal.

use chrono::{DateTime, Duration, Utc};
use huddle_database::Message;

use crate::types::{ChatError, ChatResult};

/// Fifteen minutes, anchored at creation. The boundary itself is inside the window.
pub const EDIT_WINDOW_MS: i64 = 900_000;

/// Source of "now" for lifecycle decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageState {
    Created,
    Edited,
    Deleted,
}

impl MessageState {
    pub fn of(message: &Message) -> Self {
        if message.is_deleted() {
            MessageState::Deleted
        } else if message.is_edited() {
            MessageState::Edited
        } else {
            MessageState::Created
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, MessageState::Deleted)
    }
}

pub fn edit_window() -> Duration {
    Duration::milliseconds(EDIT_WINDOW_MS)
}

/// Whether `message` may still be edited at `now`.
///
/// A deleted message reports [`ChatError::MessageDeleted`] regardless of age.
pub fn ensure_editable(message: &Message, now: DateTime<Utc>) -> ChatResult<()> {
    if MessageState::of(message).is_terminal() {
        return Err(ChatError::MessageDeleted);
    }
    if now.signed_duration_since(message.created_at) > edit_window() {
        return Err(ChatError::EditWindowExpired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn message_at(created_at: DateTime<Utc>) -> Message {
        Message {
            id: "m1".into(),
            chat_id: "c1".into(),
            sender_id: "u1".into(),
            content: "hi".into(),
            created_at,
            updated_at: created_at,
            edited_at: None,
            deleted_at: None,
            attachments: Vec::new(),
        }
    }

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn state_follows_markers() {
        let mut message = message_at(created());
        assert_eq!(MessageState::of(&message), MessageState::Created);

        message.edited_at = Some(created());
        assert_eq!(MessageState::of(&message), MessageState::Edited);

        message.deleted_at = Some(created());
        assert_eq!(MessageState::of(&message), MessageState::Deleted);
        assert!(MessageState::of(&message).is_terminal());
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let message = message_at(created());

        assert!(ensure_editable(&message, created()).is_ok());
        assert!(ensure_editable(&message, created() + Duration::milliseconds(EDIT_WINDOW_MS)).is_ok());
        assert!(matches!(
            ensure_editable(&message, created() + Duration::milliseconds(EDIT_WINDOW_MS + 1)),
            Err(ChatError::EditWindowExpired)
        ));
    }

    #[test]
    fn window_is_anchored_at_creation_not_last_edit() {
        let mut message = message_at(created());
        message.edited_at = Some(created() + Duration::minutes(14));

        assert!(matches!(
            ensure_editable(&message, created() + Duration::minutes(16)),
            Err(ChatError::EditWindowExpired)
        ));
    }

    #[test]
    fn deleted_wins_over_window() {
        let mut message = message_at(created());
        message.deleted_at = Some(created());

        assert!(matches!(
            ensure_editable(&message, created()),
            Err(ChatError::MessageDeleted)
        ));
        assert!(matches!(
            ensure_editable(&message, created() + Duration::hours(1)),
            Err(ChatError::MessageDeleted)
        ));
    }
}
