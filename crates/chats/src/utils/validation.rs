//! Validation utilities.

use huddle_database::DEFAULT_CHAT_TITLE;

use crate::types::ChatError;

pub const MAX_TITLE_LENGTH: usize = 255;

/// Validation utilities
pub struct Validator;

impl Validator {
    /// Resolve a chat title, falling back to the default when missing or blank.
    pub fn chat_title(title: Option<&str>) -> Result<String, ChatError> {
        let title = title.map(str::trim).unwrap_or_default();
        if title.is_empty() {
            return Ok(DEFAULT_CHAT_TITLE.to_string());
        }

        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(ChatError::validation(format!(
                "Chat title too long (max {MAX_TITLE_LENGTH} characters)"
            )));
        }

        Ok(title.to_string())
    }

    /// Validate an opaque user id supplied by the caller.
    pub fn user_id(field: &str, user_id: &str) -> Result<(), ChatError> {
        if user_id.trim().is_empty() {
            return Err(ChatError::validation(format!("{field} is required")));
        }
        Ok(())
    }

    /// A message needs text, an attachment, or both.
    pub fn message_body(content: &str, has_attachment: bool) -> Result<(), ChatError> {
        if content.trim().is_empty() && !has_attachment {
            return Err(ChatError::validation(
                "Message must have content or an attachment",
            ));
        }
        Ok(())
    }
}
