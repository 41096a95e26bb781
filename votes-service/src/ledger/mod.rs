//! This module defines the `VoteLedger`, the write side of the voting core.
//! It applies the toggle rule for one (voter, target) pair through a
//! `VotesRepository` and absorbs a single lost insert race.
use chrono::Utc;
use std::sync::Arc;
use tracing::warn;
use votes_repository::VotesRepository;
use votes_shared::types::{TargetRef, UserId, VoteDirection, VoteState};

use crate::errors::VoteError;

/// `VoteLedger` records one directional vote per (voter, target) pair.
///
/// Atomicity and uniqueness come from the repository; the ledger only adds
/// the conflict retry on top.
pub struct VoteLedger {
    votes_repository: Arc<dyn VotesRepository>,
}

impl VoteLedger {
    /// Creates a new `VoteLedger` instance.
    ///
    /// # Arguments
    ///
    /// * `votes_repository` - The ledger store
    pub fn new(votes_repository: Arc<dyn VotesRepository>) -> Self {
        Self { votes_repository }
    }

    /// Applies a vote and returns the voter's resulting state.
    ///
    /// A uniqueness conflict means a concurrent request from the same voter
    /// created the row first. The toggle is re-applied once against the row
    /// that now exists; a second conflict is surfaced.
    ///
    /// # Arguments
    ///
    /// * `voter_id` - The authenticated voter
    /// * `target` - The post or comment being voted on
    /// * `direction` - Requested direction
    ///
    /// # Returns
    ///
    /// * `Ok(VoteState)` - `None`, `Up` or `Down` after the write
    /// * `Err(VoteError::Conflict)` - The retry also lost a race
    /// * `Err(VoteError)` - Storage failure
    pub async fn apply_vote(
        &self,
        voter_id: UserId,
        target: TargetRef,
        direction: VoteDirection,
    ) -> Result<VoteState, VoteError> {
        match self
            .votes_repository
            .apply_vote(voter_id, target, direction, Utc::now())
            .await
        {
            Err(e) if e.is_conflict() => {
                warn!(
                    voter_id,
                    target = %target,
                    error = %e,
                    "Concurrent vote detected, re-applying toggle once"
                );
                let state = self
                    .votes_repository
                    .apply_vote(voter_id, target, direction, Utc::now())
                    .await?;
                Ok(state)
            }
            result => Ok(result?),
        }
    }

    /// Returns the voter's current state on a target.
    pub async fn vote_state(&self, voter_id: UserId, target: TargetRef) -> Result<VoteState, VoteError> {
        let vote = self.votes_repository.get_user_vote(voter_id, target).await?;
        Ok(vote.map(|v| v.direction).into())
    }
}
