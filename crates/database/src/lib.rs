//! Huddle Database Crate
//!
//! Persistence adapter for the chat backend: connection management,
//! embedded migrations, entities and the store traits with their SQLite
//! repository implementations. No business rules live here.

use huddle_config::DatabaseConfig;
use sqlx::SqlitePool;
use tracing::error;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::prepare_database;
pub use migrations::run_migrations;

pub use repos::{
    AttachmentRepository, ChatOverview, ChatRepository, ChatStore, MessageRepository, MessageStore,
    ParticipantRepository, ParticipantStore,
};

pub use entities::{
    Attachment, Chat, ChatParticipant, Message, NewAttachment, NewChat, NewMessage, NewParticipant,
    DEFAULT_CHAT_TITLE,
};

pub use types::{errors::DatabaseError, DatabaseResult, Page};

/// Re-export commonly used types for convenience
pub use sqlx::Pool;

/// Initialize the database with migrations
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = prepare_database(config).await.map_err(|e| {
        error!(error = %e, "failed to prepare database");
        DatabaseError::ConnectionError(e.to_string())
    })?;

    run_migrations(&pool).await.map_err(|e| {
        error!(error = %e, "failed to run migrations");
        DatabaseError::MigrationError(e.to_string())
    })?;

    Ok(pool)
}


#[cfg(test)]
mod tests {
    use super::testing::create_test_database;

    #[tokio::test]
    async fn test_database_initialization() {
        let (pool, _temp_dir) = create_test_database().await;

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM chats")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let (pool, _temp_dir) = create_test_database().await;

        let result: (bool,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();

        assert!(result.0);
    }
}
