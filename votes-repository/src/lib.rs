//! # Votes Repository
//! This crate provides traits and implementations for interacting with the
//! vote ledger and the target read-models. It includes definitions for errors,
//! interfaces, and concrete implementations for PostgreSQL and in-memory storage.
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod postgres;

pub use errors::{TargetsRepositoryError, VotesRepositoryError};
pub use interfaces::{TargetsRepository, VotesRepository};
pub use memory::{InMemoryTargetsRepository, InMemoryVotesRepository};
pub use postgres::{MIGRATOR, PostgresTargetsRepository, PostgresVotesRepository};
