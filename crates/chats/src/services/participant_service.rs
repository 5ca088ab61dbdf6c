//! Participant service for chat membership rows.

use std::sync::Arc;

use huddle_database::{ChatParticipant, NewParticipant, Page, ParticipantRepository, ParticipantStore};
use sqlx::SqlitePool;
use tracing::info;

use crate::lifecycle::{Clock, SystemClock};
use crate::types::{AddParticipantRequest, ChatResult};
use crate::utils::Validator;

#[derive(Clone)]
pub struct ParticipantService {
    participants: Arc<dyn ParticipantStore>,
    clock: Arc<dyn Clock>,
}

impl ParticipantService {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_store(
            Arc::new(ParticipantRepository::new(pool)),
            Arc::new(SystemClock),
        )
    }

    pub fn with_store(participants: Arc<dyn ParticipantStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            participants,
            clock,
        }
    }

    /// Add a user to a chat. The pair must not already exist and the chat
    /// must exist; both are enforced by storage.
    pub async fn add_participant(
        &self,
        chat_id: &str,
        request: AddParticipantRequest,
    ) -> ChatResult<ChatParticipant> {
        Validator::user_id("userId", &request.user_id)?;

        let participant = self
            .participants
            .insert(NewParticipant {
                chat_id: chat_id.to_string(),
                user_id: request.user_id,
                joined_at: self.clock.now(),
            })
            .await?;
        Ok(participant)
    }

    /// Returns whether a row was removed; removing an absent pair is not an error.
    pub async fn remove_participant(&self, chat_id: &str, user_id: &str) -> ChatResult<bool> {
        let removed = self.participants.remove(chat_id, user_id).await?;
        if !removed {
            info!(chat_id, user_id, "participant was not in chat");
        }
        Ok(removed)
    }

    pub async fn list_participants(
        &self,
        chat_id: &str,
        page: Page,
    ) -> ChatResult<Vec<ChatParticipant>> {
        Ok(self.participants.list_by_chat(chat_id, page).await?)
    }
}
