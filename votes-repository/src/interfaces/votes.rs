//! This module defines the `VotesRepository` trait, which provides an interface
//! for interacting with the underlying vote ledger.
//! It abstracts the atomic toggle write and the count-by-value reads.
use chrono::{DateTime, Utc};
use votes_shared::types::{TargetRef, UserId, UserVote, VoteDirection, VoteState, VotesCount};
use crate::errors::VotesRepositoryError;

/// A trait that defines the interface for interacting with the vote ledger.
///
/// Implementors guarantee that at most one row exists per (voter, target) pair
/// and that [`VotesRepository::apply_vote`] is a single atomic unit of work.
#[async_trait::async_trait]
pub trait VotesRepository: Send + Sync {
    /// Applies the toggle rule for a voter on a target.
    ///
    /// Reads the current row, computes the transition, and inserts, updates or
    /// deletes the row within one transaction.
    ///
    /// # Arguments
    ///
    /// * `voter_id` - The authenticated voter
    /// * `target` - The tagged post or comment reference
    /// * `direction` - The requested vote direction
    /// * `voted_at` - Timestamp recorded on inserted or updated rows
    ///
    /// # Returns
    ///
    /// * `Ok(VoteState)` - The voter's state after the write
    /// * `Err(VotesRepositoryError::Conflict)` - A concurrent insert won the race
    /// * `Err(VotesRepositoryError)` - Any other storage failure
    async fn apply_vote(
        &self,
        voter_id: UserId,
        target: TargetRef,
        direction: VoteDirection,
        voted_at: DateTime<Utc>,
    ) -> Result<VoteState, VotesRepositoryError>;

    /// Retrieves the ledger row of a voter on a target, if any.
    async fn get_user_vote(
        &self,
        voter_id: UserId,
        target: TargetRef,
    ) -> Result<Option<UserVote>, VotesRepositoryError>;

    /// Counts upvotes and downvotes for each requested target.
    ///
    /// Returns one entry per distinct requested target. Targets without
    /// votes are reported with zero counts.
    async fn get_vote_counts(
        &self,
        targets: &[TargetRef],
    ) -> Result<Vec<VotesCount>, VotesRepositoryError>;

    /// Checks if the ledger tables exist in the store.
    async fn check_tables_created(&self) -> Result<bool, VotesRepositoryError>;
}
