//! Repository for chat participant data access operations.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::info;

use super::ParticipantStore;
use crate::entities::{ChatParticipant, NewParticipant};
use crate::types::{DatabaseResult, Page};

/// Repository for participant database operations
#[derive(Clone)]
pub struct ParticipantRepository {
    pool: SqlitePool,
}

impl ParticipantRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParticipantStore for ParticipantRepository {
    async fn insert(&self, participant: NewParticipant) -> DatabaseResult<ChatParticipant> {
        let result =
            sqlx::query("INSERT INTO chat_participants (chat_id, user_id, joined_at) VALUES (?, ?, ?)")
                .bind(&participant.chat_id)
                .bind(&participant.user_id)
                .bind(participant.joined_at)
                .execute(&self.pool)
                .await?;

        let id = result.last_insert_rowid();
        info!(
            participant_id = id,
            chat_id = %participant.chat_id,
            user_id = %participant.user_id,
            "added participant"
        );

        Ok(ChatParticipant {
            id,
            chat_id: participant.chat_id,
            user_id: participant.user_id,
            joined_at: participant.joined_at,
        })
    }

    async fn remove(&self, chat_id: &str, user_id: &str) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM chat_participants WHERE chat_id = ? AND user_id = ?")
            .bind(chat_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            info!(chat_id, user_id, "removed participant");
        }
        Ok(removed)
    }

    async fn list_by_chat(&self, chat_id: &str, page: Page) -> DatabaseResult<Vec<ChatParticipant>> {
        let participants = sqlx::query_as::<_, ChatParticipant>(
            "SELECT id, chat_id, user_id, joined_at FROM chat_participants
             WHERE chat_id = ? ORDER BY joined_at ASC, id ASC LIMIT ? OFFSET ?",
        )
        .bind(chat_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(participants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::NewChat;
    use crate::repos::{ChatRepository, ChatStore};
    use crate::testing::create_test_database;
    use crate::types::DatabaseError;
    use chrono::Utc;

    async fn setup() -> (ParticipantRepository, tempfile::TempDir) {
        let (pool, dir) = create_test_database().await;
        ChatRepository::new(pool.clone())
            .insert(NewChat {
                id: "chat-1".into(),
                title: "Team".into(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        (ParticipantRepository::new(pool), dir)
    }

    fn participant(chat_id: &str, user_id: &str) -> NewParticipant {
        NewParticipant {
            chat_id: chat_id.into(),
            user_id: user_id.into(),
            joined_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn same_pair_twice_is_rejected() {
        let (repo, _dir) = setup().await;

        repo.insert(participant("chat-1", "u1")).await.unwrap();
        let err = repo.insert(participant("chat-1", "u1")).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Duplicate(_)));

        let rows = repo.list_by_chat("chat-1", Page::default()).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn unknown_chat_violates_foreign_key() {
        let (repo, _dir) = setup().await;

        let err = repo.insert(participant("nope", "u1")).await.unwrap_err();
        assert!(matches!(err, DatabaseError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn readding_after_removal_creates_new_row() {
        let (repo, _dir) = setup().await;

        let first = repo.insert(participant("chat-1", "u1")).await.unwrap();
        assert!(repo.remove("chat-1", "u1").await.unwrap());
        assert!(!repo.remove("chat-1", "u1").await.unwrap());

        let second = repo.insert(participant("chat-1", "u1")).await.unwrap();
        assert_ne!(first.id, second.id);
    }
}
