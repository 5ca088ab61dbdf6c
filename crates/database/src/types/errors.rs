//! Error types for the database layer

use thiserror::Error;

/// Storage failure surfaced by the persistence adapter.
///
/// Callers must not assume any part of a failed write was applied.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Database query error: {0}")]
    QueryError(String),

    #[error("Database migration error: {0}")]
    MigrationError(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_error) = &error {
            if db_error.is_unique_violation() {
                return DatabaseError::Duplicate(db_error.message().to_string());
            }
            if db_error.is_foreign_key_violation() {
                return DatabaseError::ConstraintViolation(db_error.message().to_string());
            }
        }

        match error {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                DatabaseError::ConnectionError(error.to_string())
            }
            other => DatabaseError::QueryError(other.to_string()),
        }
    }
}
