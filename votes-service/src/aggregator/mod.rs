//! This module defines the `ScoreAggregator`, the read side of the voting core.
//! Scores and rankings are derived from the ledger on every read; nothing is
//! cached or persisted.
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use votes_repository::{TargetsRepository, VotesRepository};
use votes_shared::types::{
    SortBy, Target, TargetId, TargetKind, TargetRef, VoteCounts, VoteScore,
};

use crate::errors::VoteError;

/// Hours added to a target's age in the hot rank denominator.
pub const HOT_RANK_AGE_OFFSET_HOURS: f64 = 2.0;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_LIMIT: usize = 25;

/// Largest page a caller may request.
pub const MAX_PAGE_LIMIT: usize = 100;

/// Time-decayed popularity: `upvotes / (age_hours + 2)`.
///
/// Age is measured in fractional hours and floored at zero, so content dated
/// in the future ranks as brand new.
pub fn hot_rank(upvotes: i64, created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let age_hours = ((now - created_at).num_milliseconds() as f64 / 3_600_000.0).max(0.0);
    upvotes as f64 / (age_hours + HOT_RANK_AGE_OFFSET_HOURS)
}

/// Pagination window of a ranking request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: usize,
    pub offset: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

impl Page {
    /// Builds a page from optional caller input.
    ///
    /// The limit is clamped to `1..=MAX_PAGE_LIMIT`. A negative offset is rejected.
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Result<Self, VoteError> {
        let limit = limit
            .map(|l| l.clamp(1, MAX_PAGE_LIMIT as i64) as usize)
            .unwrap_or(DEFAULT_PAGE_LIMIT);
        let offset = match offset {
            Some(o) if o < 0 => {
                return Err(VoteError::Validation(format!("offset must not be negative, got {o}")));
            }
            Some(o) => o as usize,
            None => 0,
        };
        Ok(Self { limit, offset })
    }
}

/// A target joined with its vote counts, ready to be ordered.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedTarget {
    pub target: Target,
    pub counts: VoteCounts,
}

impl RankedTarget {
    pub fn hot_rank(&self, now: DateTime<Utc>) -> f64 {
        hot_rank(self.counts.upvotes, self.target.created_at, now)
    }
}

/// Orders targets for a listing, best first.
///
/// - `New`: creation time, newest first.
/// - `Top`: raw upvotes. Downvotes never demote a target here.
/// - `Hot`: [`hot_rank`] at `now`.
///
/// Ties fall back to creation time then id, both descending.
pub fn sort_targets(targets: &mut [RankedTarget], sort_by: SortBy, now: DateTime<Utc>) {
    let newest_first = |a: &RankedTarget, b: &RankedTarget| {
        b.target
            .created_at
            .cmp(&a.target.created_at)
            .then_with(|| b.target.target.id.cmp(&a.target.target.id))
    };

    match sort_by {
        SortBy::New => targets.sort_by(newest_first),
        SortBy::Top => targets.sort_by(|a, b| {
            b.counts
                .upvotes
                .cmp(&a.counts.upvotes)
                .then_with(|| newest_first(a, b))
        }),
        SortBy::Hot => {
            // Rank once per target instead of once per comparison.
            let mut keyed: Vec<(f64, RankedTarget)> =
                targets.iter().map(|t| (t.hot_rank(now), t.clone())).collect();
            keyed.sort_by(|(rank_a, a), (rank_b, b)| {
                match rank_b.total_cmp(rank_a) {
                    Ordering::Equal => newest_first(a, b),
                    other => other,
                }
            });
            for (slot, (_, ranked)) in targets.iter_mut().zip(keyed) {
                *slot = ranked;
            }
        }
    }
}

/// `ScoreAggregator` derives net scores and rankings from the ledger.
pub struct ScoreAggregator {
    votes_repository: Arc<dyn VotesRepository>,
    targets_repository: Arc<dyn TargetsRepository>,
}

impl ScoreAggregator {
    /// Creates a new `ScoreAggregator` instance.
    ///
    /// # Arguments
    ///
    /// * `votes_repository` - Source of the per-target vote counts
    /// * `targets_repository` - Source of target creation times
    pub fn new(
        votes_repository: Arc<dyn VotesRepository>,
        targets_repository: Arc<dyn TargetsRepository>,
    ) -> Self {
        Self {
            votes_repository,
            targets_repository,
        }
    }

    /// Computes `{net, upvotes, downvotes}` for one target.
    pub async fn score(&self, target: TargetRef) -> Result<VoteScore, VoteError> {
        let counts = self.votes_repository.get_vote_counts(&[target]).await?;
        let counts = counts
            .into_iter()
            .find(|c| c.target == target)
            .map(|c| c.counts)
            .unwrap_or_default();
        Ok(counts.into())
    }

    /// Computes scores for a batch of targets in one storage round trip.
    pub async fn scores(&self, targets: &[TargetRef]) -> Result<HashMap<TargetRef, VoteScore>, VoteError> {
        let counts = self.votes_repository.get_vote_counts(targets).await?;
        let mut scores: HashMap<TargetRef, VoteScore> = targets
            .iter()
            .map(|target| (*target, VoteCounts::default().into()))
            .collect();
        for count in counts {
            scores.insert(count.target, count.counts.into());
        }
        Ok(scores)
    }

    /// Computes the hot rank of one target at `now`.
    ///
    /// # Returns
    ///
    /// * `Ok(f64)` - The hot rank
    /// * `Err(VoteError::NotFound)` - The target does not exist
    pub async fn hot_rank(&self, target: TargetRef, now: DateTime<Utc>) -> Result<f64, VoteError> {
        let created_at = self
            .targets_repository
            .get_target(target)
            .await?
            .ok_or_else(|| VoteError::NotFound(format!("{} not found", target)))?
            .created_at;
        let score = self.score(target).await?;
        Ok(hot_rank(score.upvotes, created_at, now))
    }

    /// Lists target ids of one kind in the requested order and page.
    pub async fn rank(
        &self,
        kind: TargetKind,
        sort_by: SortBy,
        page: Page,
        now: DateTime<Utc>,
    ) -> Result<Vec<TargetId>, VoteError> {
        let targets = self.targets_repository.list_targets(kind).await?;
        if targets.is_empty() {
            return Ok(Vec::new());
        }

        let refs: Vec<TargetRef> = targets.iter().map(|t| t.target).collect();
        let counts: HashMap<TargetRef, VoteCounts> = self
            .votes_repository
            .get_vote_counts(&refs)
            .await?
            .into_iter()
            .map(|c| (c.target, c.counts))
            .collect();

        let mut ranked: Vec<RankedTarget> = targets
            .into_iter()
            .map(|target| RankedTarget {
                counts: counts.get(&target.target).copied().unwrap_or_default(),
                target,
            })
            .collect();
        sort_targets(&mut ranked, sort_by, now);

        Ok(ranked
            .into_iter()
            .skip(page.offset)
            .take(page.limit)
            .map(|r| r.target.target.id)
            .collect())
    }
}
