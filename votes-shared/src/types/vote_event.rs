use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::types::{TargetRef, UserId, VoteState};

/// Represents a "user X voted on target Y" notification.
///
/// Emitted after a vote commits and delivered at most once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteEvent {
    pub voter_id: UserId,
    pub recipient_id: UserId,
    pub target: TargetRef,
    pub state: VoteState,
    pub occurred_at: DateTime<Utc>,
}

impl VoteEvent {
    /// Human readable message for the notification feed.
    pub fn message(&self) -> String {
        format!("User {} upvoted your {}", self.voter_id, self.target.kind)
    }
}
