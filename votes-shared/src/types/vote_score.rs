use serde::{Deserialize, Serialize};
use crate::types::TargetRef;

/// Represents the aggregated vote counts for a target.
///
/// Always derived from the ledger at read time, never persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct VoteCounts {
    pub upvotes: i64,
    pub downvotes: i64,
}

impl VoteCounts {
    pub fn new(upvotes: i64, downvotes: i64) -> Self {
        Self { upvotes, downvotes }
    }

    /// Net score: upvotes minus downvotes.
    pub fn net(&self) -> i64 {
        self.upvotes - self.downvotes
    }
}

/// Vote counts of one target, as returned by batch lookups.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct VotesCount {
    pub target: TargetRef,
    pub counts: VoteCounts,
}

/// Score view handed back to callers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteScore {
    pub net: i64,
    pub upvotes: i64,
    pub downvotes: i64,
}

impl From<VoteCounts> for VoteScore {
    fn from(counts: VoteCounts) -> Self {
        Self {
            net: counts.net(),
            upvotes: counts.upvotes,
            downvotes: counts.downvotes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_net_is_upvotes_minus_downvotes() {
        let counts = VoteCounts::new(5, 2);
        assert_eq!(counts.net(), 3);
        assert_eq!(VoteScore::from(counts), VoteScore { net: 3, upvotes: 5, downvotes: 2 });
    }

    #[test]
    fn test_default_counts_are_zero() {
        assert_eq!(VoteCounts::default().net(), 0);
    }
}
