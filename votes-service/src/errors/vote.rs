//! Error taxonomy surfaced by the ledger, the aggregator and the gateway.
use thiserror::Error;
use votes_repository::{TargetsRepositoryError, VotesRepositoryError};
use votes_shared::ParseError;

/// Stable, caller-facing classification of a [`VoteError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Auth,
    NotFound,
    Validation,
    Conflict,
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Auth => "auth",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Validation => "validation",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Internal => "internal",
        }
    }
}

/// Represents errors that can occur while voting or reading scores.
#[derive(Debug, Error)]
pub enum VoteError {
    #[error("Authentication required: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Concurrent vote conflict: {0}")]
    Conflict(String),

    #[error("Votes repository error: {0}")]
    VotesRepository(VotesRepositoryError),

    #[error("Targets repository error: {0}")]
    TargetsRepository(#[from] TargetsRepositoryError),
}

impl VoteError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VoteError::Auth(_) => ErrorKind::Auth,
            VoteError::NotFound(_) => ErrorKind::NotFound,
            VoteError::Validation(_) => ErrorKind::Validation,
            VoteError::Conflict(_) => ErrorKind::Conflict,
            VoteError::VotesRepository(_) | VoteError::TargetsRepository(_) => ErrorKind::Internal,
        }
    }
}

impl From<VotesRepositoryError> for VoteError {
    fn from(error: VotesRepositoryError) -> Self {
        match error {
            VotesRepositoryError::Conflict(key) => VoteError::Conflict(key),
            other => VoteError::VotesRepository(other),
        }
    }
}

impl From<ParseError> for VoteError {
    fn from(error: ParseError) -> Self {
        VoteError::Validation(error.to_string())
    }
}
