//! Error types for parsing the string labels used at the API boundary.
use thiserror::Error;

/// Represents errors raised when a label cannot be mapped onto a shared type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid vote direction: {0}")]
    InvalidDirection(String),

    #[error("Invalid target kind: {0}")]
    InvalidTargetKind(String),

    #[error("Invalid sort order: {0}")]
    InvalidSortBy(String),

    #[error("Invalid stored vote value: {0}")]
    InvalidVoteValue(i16),

    #[error("Invalid stored target kind: {0}")]
    InvalidTargetKindTag(i16),
}
