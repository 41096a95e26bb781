//! Error types for the votes repository.
//! Defines specific errors that can occur during ledger and aggregation queries.
use thiserror::Error;
use votes_shared::ParseError;

/// Represents errors that can occur within the votes repository.
///
/// This enum consolidates various error conditions specific to database interactions,
/// such as SQLx errors during database operations.
#[derive(Debug, Error)]
pub enum VotesRepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Unique constraint violated for {0}")]
    Conflict(String),

    #[error("Invalid stored value: {0}")]
    InvalidStoredValue(#[from] ParseError),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl VotesRepositoryError {
    /// Classifies a database error raised while writing a ledger row.
    ///
    /// A unique violation means another transaction inserted the same
    /// (voter, target) row first.
    pub fn from_write(error: sqlx::Error, key: impl std::fmt::Display) -> Self {
        let is_unique_violation = error
            .as_database_error()
            .map(|db_error| db_error.is_unique_violation())
            .unwrap_or(false);

        if is_unique_violation {
            VotesRepositoryError::Conflict(key.to_string())
        } else {
            VotesRepositoryError::DatabaseError(error)
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, VotesRepositoryError::Conflict(_))
    }
}
