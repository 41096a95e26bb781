//! PostgreSQL implementation of the votes repository.
//!
//! Provides a PostgreSQL backend for the `VotesRepository` and
//! `TargetsRepository` traits with connection pooling and transaction safety.
//!
//! ## Key Features
//!
//! - Connection pooling with `sqlx::PgPool`
//! - One transaction per toggle with row locking (`SELECT ... FOR UPDATE`)
//! - Uniqueness on (voter_id, target_kind, target_id) surfaced as a conflict
//! - Batch count lookups using PostgreSQL's `UNNEST`
//!
//! ## Database Tables
//!
//! - `votes`: The vote ledger, one row per (voter, target)
//! - `posts`: Read-model of posts (id, author, creation time)
//! - `comments`: Read-model of comments (id, author, creation time)
mod targets_repository;
mod votes_repository;

pub use targets_repository::PostgresTargetsRepository;
pub use votes_repository::PostgresVotesRepository;

/// Embedded schema migrations for the ledger and target read-models.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("src/postgres/migrations");
