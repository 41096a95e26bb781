use thiserror::Error;

#[derive(Debug, Error)]
/// Represents errors that can occur within the targets repository.
///
/// Targets are read-only here, so only lookup failures are modeled.
pub enum TargetsRepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}
