mod sort;
mod target;
mod user_vote;
mod vote_event;
mod vote_score;

pub use sort::SortBy;
pub use target::{Target, TargetId, TargetKind, TargetRef, UserId};
pub use user_vote::{LedgerOp, UserVote, VoteDirection, VoteState, transition};
pub use vote_event::VoteEvent;
pub use vote_score::{VoteCounts, VoteScore, VotesCount};
