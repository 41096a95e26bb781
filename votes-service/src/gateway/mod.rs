//! This module defines the `MutationGateway`, the single entry point for
//! casting votes and reading scores and rankings.
//!
//! The gateway validates the caller and the request, delegates to the
//! [`VoteLedger`] and the [`ScoreAggregator`], and hands vote events to an
//! optional [`VoteNotifier`]. It keeps no state of its own.
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use votes_repository::TargetsRepository;
use votes_shared::types::{
    SortBy, Target, TargetId, TargetKind, TargetRef, UserId, VoteDirection, VoteEvent, VoteScore,
    VoteState,
};

use crate::aggregator::{Page, ScoreAggregator};
use crate::errors::VoteError;
use crate::ledger::VoteLedger;
use crate::notifier::VoteNotifier;

/// Raw vote request as received from a client.
#[derive(Debug, Clone, Deserialize)]
pub struct VoteRequest {
    pub target_kind: String,
    pub target_id: TargetId,
    pub direction: String,
}

/// Post-mutation view of the voted target.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct VoteOutcome {
    pub target: TargetRef,
    pub vote_state: VoteState,
    #[serde(flatten)]
    pub score: VoteScore,
}

/// Score of a target, with the viewer's own vote when a viewer is known.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ScoreView {
    pub target: TargetRef,
    #[serde(flatten)]
    pub score: VoteScore,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_vote: Option<VoteState>,
}

pub struct MutationGateway {
    ledger: VoteLedger,
    aggregator: ScoreAggregator,
    targets_repository: Arc<dyn TargetsRepository>,
    notifier: Option<Arc<dyn VoteNotifier>>,
}

impl MutationGateway {
    /// Creates a new `MutationGateway` instance.
    ///
    /// # Arguments
    ///
    /// * `ledger` - Write side of the voting core
    /// * `aggregator` - Read side of the voting core
    /// * `targets_repository` - Existence and authorship of posts and comments
    /// * `notifier` - Optional sink for upvote notifications
    pub fn new(
        ledger: VoteLedger,
        aggregator: ScoreAggregator,
        targets_repository: Arc<dyn TargetsRepository>,
        notifier: Option<Arc<dyn VoteNotifier>>,
    ) -> Self {
        Self {
            ledger,
            aggregator,
            targets_repository,
            notifier,
        }
    }

    /// Casts, flips or withdraws a vote and returns the refreshed score.
    ///
    /// Checks run in order: authentication, direction, target kind, target
    /// existence. Nothing is written unless all of them pass.
    ///
    /// # Arguments
    ///
    /// * `voter` - Authenticated voter, `None` for anonymous callers
    /// * `request` - The raw vote request
    ///
    /// # Returns
    ///
    /// * `Ok(VoteOutcome)` - Resulting vote state and score of the target
    /// * `Err(VoteError)` - `Auth`, `Validation`, `NotFound`, `Conflict` or a storage failure
    pub async fn vote(
        &self,
        voter: Option<UserId>,
        request: VoteRequest,
    ) -> Result<VoteOutcome, VoteError> {
        let voter_id = voter.ok_or_else(|| VoteError::Auth("voting requires a logged in user".into()))?;
        let direction: VoteDirection = request.direction.parse()?;
        let kind: TargetKind = request.target_kind.parse()?;
        let target = self.existing_target(TargetRef::new(kind, request.target_id)).await?;

        let vote_state = self.ledger.apply_vote(voter_id, target.target, direction).await?;
        let score = self.aggregator.score(target.target).await?;

        if vote_state == VoteState::Up && voter_id != target.author_id {
            self.emit(VoteEvent {
                voter_id,
                recipient_id: target.author_id,
                target: target.target,
                state: vote_state,
                occurred_at: Utc::now(),
            });
        }

        info!(
            voter_id,
            target = %target.target,
            direction = %direction,
            vote_state = %vote_state,
            net = score.net,
            "Vote applied"
        );

        Ok(VoteOutcome {
            target: target.target,
            vote_state,
            score,
        })
    }

    /// Reads the score of one target.
    ///
    /// `user_vote` is filled in only when `viewer` is present.
    pub async fn score(
        &self,
        viewer: Option<UserId>,
        kind: &str,
        id: TargetId,
    ) -> Result<ScoreView, VoteError> {
        let kind: TargetKind = kind.parse()?;
        let target = self.existing_target(TargetRef::new(kind, id)).await?.target;
        let score = self.aggregator.score(target).await?;
        let user_vote = match viewer {
            Some(viewer_id) => Some(self.ledger.vote_state(viewer_id, target).await?),
            None => None,
        };
        Ok(ScoreView {
            target,
            score,
            user_vote,
        })
    }

    /// Lists target ids of one kind, ordered by `sort_by` (default `hot`).
    pub async fn rank(
        &self,
        kind: &str,
        sort_by: Option<&str>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<TargetId>, VoteError> {
        let kind: TargetKind = kind.parse()?;
        let sort_by: SortBy = match sort_by {
            Some(raw) => raw.parse()?,
            None => SortBy::default(),
        };
        let page = Page::new(limit, offset)?;
        self.aggregator.rank(kind, sort_by, page, Utc::now()).await
    }

    async fn existing_target(&self, target: TargetRef) -> Result<Target, VoteError> {
        if target.id <= 0 {
            return Err(VoteError::Validation(format!(
                "target id must be positive, got {}",
                target.id
            )));
        }
        self.targets_repository
            .get_target(target)
            .await?
            .ok_or_else(|| VoteError::NotFound(format!("{} not found", target)))
    }

    fn emit(&self, event: VoteEvent) {
        let Some(notifier) = &self.notifier else {
            return;
        };
        let recipient_id = event.recipient_id;
        let target = event.target;
        if let Err(e) = notifier.notify(event) {
            warn!(
                recipient_id,
                target = %target,
                error = %e,
                "Dropping vote notification"
            );
        }
    }
}
