//! Error types for the votes repository.
//! Consolidates and re-exports error types related to ledger and target lookups.
mod targets;
mod votes;

pub use targets::TargetsRepositoryError;
pub use votes::VotesRepositoryError;
