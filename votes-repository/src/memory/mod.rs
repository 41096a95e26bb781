//! In-memory implementation of the votes and targets repositories.
//!
//! Used for local runs without a database (`VOTES_STORAGE=memory`) and by the
//! service tests. The ledger is a map keyed by (voter, target), so the
//! uniqueness invariant holds by construction, and every toggle runs under a
//! single lock.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use tokio::sync::{Mutex, RwLock};
use votes_shared::types::{
    LedgerOp, Target, TargetKind, TargetRef, UserId, UserVote, VoteCounts, VoteDirection,
    VoteState, VotesCount, transition,
};
use crate::{TargetsRepository, TargetsRepositoryError, VotesRepository, VotesRepositoryError};

type LedgerKey = (UserId, TargetRef);

/// In-memory vote ledger.
#[derive(Default)]
pub struct InMemoryVotesRepository {
    ledger: Mutex<HashMap<LedgerKey, UserVote>>,
}

impl InMemoryVotesRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ledger rows held for a (voter, target) pair. Either 0 or 1.
    pub async fn row_count(&self, voter_id: UserId, target: TargetRef) -> usize {
        let ledger = self.ledger.lock().await;
        usize::from(ledger.contains_key(&(voter_id, target)))
    }

    /// Total number of ledger rows.
    pub async fn len(&self) -> usize {
        self.ledger.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.ledger.lock().await.is_empty()
    }
}

#[async_trait]
impl VotesRepository for InMemoryVotesRepository {
    async fn apply_vote(
        &self,
        voter_id: UserId,
        target: TargetRef,
        direction: VoteDirection,
        voted_at: DateTime<Utc>,
    ) -> Result<VoteState, VotesRepositoryError> {
        let mut ledger = self.ledger.lock().await;
        let key = (voter_id, target);
        let current = ledger.get(&key).map(|vote| vote.direction);
        let op = transition(current, direction);

        match op {
            LedgerOp::Insert(direction) | LedgerOp::Update(direction) => {
                ledger.insert(
                    key,
                    UserVote {
                        voter_id,
                        target,
                        direction,
                        voted_at,
                    },
                );
            }
            LedgerOp::Delete => {
                ledger.remove(&key);
            }
        }

        Ok(op.resulting_state())
    }

    async fn get_user_vote(
        &self,
        voter_id: UserId,
        target: TargetRef,
    ) -> Result<Option<UserVote>, VotesRepositoryError> {
        let ledger = self.ledger.lock().await;
        Ok(ledger.get(&(voter_id, target)).cloned())
    }

    async fn get_vote_counts(
        &self,
        targets: &[TargetRef],
    ) -> Result<Vec<VotesCount>, VotesRepositoryError> {
        if targets.is_empty() {
            return Ok(Vec::new());
        }

        let wanted: HashSet<TargetRef> = targets.iter().copied().collect();
        let mut counts: HashMap<TargetRef, VoteCounts> =
            wanted.iter().map(|target| (*target, VoteCounts::default())).collect();

        let ledger = self.ledger.lock().await;
        for vote in ledger.values() {
            if let Some(entry) = counts.get_mut(&vote.target) {
                match vote.direction {
                    VoteDirection::Up => entry.upvotes += 1,
                    VoteDirection::Down => entry.downvotes += 1,
                }
            }
        }

        Ok(counts
            .into_iter()
            .map(|(target, counts)| VotesCount { target, counts })
            .collect())
    }

    async fn check_tables_created(&self) -> Result<bool, VotesRepositoryError> {
        Ok(true)
    }
}

/// In-memory post and comment read-models.
#[derive(Default)]
pub struct InMemoryTargetsRepository {
    targets: RwLock<HashMap<TargetRef, Target>>,
}

impl InMemoryTargetsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces a target.
    pub async fn insert(&self, target: Target) {
        self.targets.write().await.insert(target.target, target);
    }

    pub async fn remove(&self, target: TargetRef) -> Option<Target> {
        self.targets.write().await.remove(&target)
    }

    pub async fn len(&self) -> usize {
        self.targets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.targets.read().await.is_empty()
    }
}

#[async_trait]
impl TargetsRepository for InMemoryTargetsRepository {
    async fn get_target(&self, target: TargetRef) -> Result<Option<Target>, TargetsRepositoryError> {
        Ok(self.targets.read().await.get(&target).cloned())
    }

    async fn list_targets(&self, kind: TargetKind) -> Result<Vec<Target>, TargetsRepositoryError> {
        Ok(self
            .targets
            .read()
            .await
            .values()
            .filter(|target| target.target.kind == kind)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_apply_vote_toggles_and_flips() {
        let repository = InMemoryVotesRepository::new();
        let target = TargetRef::post(1);

        let state = repository.apply_vote(7, target, VoteDirection::Up, now()).await.unwrap();
        assert_eq!(state, VoteState::Up);

        let state = repository.apply_vote(7, target, VoteDirection::Down, now()).await.unwrap();
        assert_eq!(state, VoteState::Down);
        assert_eq!(repository.row_count(7, target).await, 1);

        let state = repository.apply_vote(7, target, VoteDirection::Down, now()).await.unwrap();
        assert_eq!(state, VoteState::None);
        assert!(repository.is_empty().await);
    }

    #[tokio::test]
    async fn test_vote_counts_include_targets_without_votes() {
        let repository = InMemoryVotesRepository::new();
        let voted = TargetRef::post(1);
        let silent = TargetRef::comment(1);

        repository.apply_vote(1, voted, VoteDirection::Up, now()).await.unwrap();
        repository.apply_vote(2, voted, VoteDirection::Up, now()).await.unwrap();
        repository.apply_vote(3, voted, VoteDirection::Down, now()).await.unwrap();

        let counts = repository.get_vote_counts(&[voted, silent, voted]).await.unwrap();
        assert_eq!(counts.len(), 2);

        let voted_counts = counts.iter().find(|c| c.target == voted).unwrap();
        assert_eq!(voted_counts.counts, VoteCounts::new(2, 1));

        let silent_counts = counts.iter().find(|c| c.target == silent).unwrap();
        assert_eq!(silent_counts.counts, VoteCounts::default());
    }

    #[tokio::test]
    async fn test_post_and_comment_with_same_id_do_not_collide() {
        let repository = InMemoryVotesRepository::new();
        repository.apply_vote(1, TargetRef::post(5), VoteDirection::Up, now()).await.unwrap();

        let comment_vote = repository.get_user_vote(1, TargetRef::comment(5)).await.unwrap();
        assert!(comment_vote.is_none());
    }

    #[tokio::test]
    async fn test_list_targets_filters_by_kind() {
        let repository = InMemoryTargetsRepository::new();
        repository
            .insert(Target { target: TargetRef::post(1), author_id: 1, created_at: now() })
            .await;
        repository
            .insert(Target { target: TargetRef::comment(2), author_id: 1, created_at: now() })
            .await;

        let posts = repository.list_targets(TargetKind::Post).await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].target, TargetRef::post(1));
    }
}
