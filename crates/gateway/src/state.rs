//! Shared application state for the gateway

use std::sync::Arc;

use anyhow::Context;
use huddle_chats::{ChatService, Clock, MessageService, ParticipantService, SystemClock};
use huddle_config::{AppConfig, RealtimeConfig};
use huddle_database::{ChatRepository, MessageRepository, ParticipantRepository};
use sqlx::SqlitePool;

use crate::uploads::UploadStore;
use crate::websocket::Rooms;

/// Shared application state containing all services
#[derive(Clone)]
pub struct GatewayState {
    /// Chat service
    pub chat_service: Arc<ChatService>,
    /// Participant service
    pub participant_service: Arc<ParticipantService>,
    /// Message service
    pub message_service: Arc<MessageService>,
    /// Live connections per chat, shared by REST handlers and sockets
    pub rooms: Arc<Rooms>,
    pub uploads: UploadStore,
    pub realtime: RealtimeConfig,
}

impl GatewayState {
    /// Create a new gateway state with all services initialized
    pub fn new(pool: SqlitePool, config: &AppConfig) -> Self {
        Self::with_clock(pool, config, Arc::new(SystemClock))
    }

    /// Like [`GatewayState::new`] with an explicit time source.
    pub fn with_clock(pool: SqlitePool, config: &AppConfig, clock: Arc<dyn Clock>) -> Self {
        let chat_service = ChatService::with_store(
            Arc::new(ChatRepository::new(pool.clone())),
            clock.clone(),
        );
        let participant_service = ParticipantService::with_store(
            Arc::new(ParticipantRepository::new(pool.clone())),
            clock.clone(),
        );
        let message_service =
            MessageService::with_store(Arc::new(MessageRepository::new(pool)), clock);

        Self {
            chat_service: Arc::new(chat_service),
            participant_service: Arc::new(participant_service),
            message_service: Arc::new(message_service),
            rooms: Arc::new(Rooms::new()),
            uploads: UploadStore::new(&config.uploads),
            realtime: RealtimeConfig {
                // A zero-sized outbound queue cannot be created.
                channel_capacity: config.realtime.channel_capacity.max(1),
                ..config.realtime.clone()
            },
        }
    }
}

/// Build the state and make sure the upload directory exists.
pub async fn create_gateway_state(pool: SqlitePool, config: &AppConfig) -> anyhow::Result<GatewayState> {
    let state = GatewayState::new(pool, config);
    state.uploads.ensure_directory().await.with_context(|| {
        format!(
            "failed to create upload directory {}",
            state.uploads.directory().display()
        )
    })?;
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn zero_queue_capacity_is_raised_to_one() {
        let pool = SqlitePool::connect_lazy("sqlite::memory:").unwrap();
        let mut config = AppConfig::default();
        config.realtime.channel_capacity = 0;
        config.realtime.send_timeout_ms = 250;

        let state = GatewayState::new(pool, &config);
        assert_eq!(state.realtime.channel_capacity, 1);
        assert_eq!(state.realtime.send_timeout_ms, 250);
    }
}
