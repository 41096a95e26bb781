use crate::ParseError;
use crate::types::{TargetRef, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Represents the direction of a vote cast by a user.
///
/// The canonical stored form is the signed integer returned by [`VoteDirection::value`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    /// Indicates an upvote or positive endorsement.
    Up,
    /// Indicates a downvote or negative endorsement.
    Down,
}

impl VoteDirection {
    pub fn value(self) -> i16 {
        match self {
            VoteDirection::Up => 1,
            VoteDirection::Down => -1,
        }
    }

    pub fn from_value(value: i16) -> Result<Self, ParseError> {
        match value {
            1 => Ok(VoteDirection::Up),
            -1 => Ok(VoteDirection::Down),
            other => Err(ParseError::InvalidVoteValue(other)),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            VoteDirection::Up => VoteDirection::Down,
            VoteDirection::Down => VoteDirection::Up,
        }
    }
}

impl FromStr for VoteDirection {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(VoteDirection::Up),
            "down" => Ok(VoteDirection::Down),
            _ => Err(ParseError::InvalidDirection(s.to_string())),
        }
    }
}

impl fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteDirection::Up => f.write_str("up"),
            VoteDirection::Down => f.write_str("down"),
        }
    }
}

/// A user's vote state for one target: absent, up or down.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum VoteState {
    #[default]
    None,
    Up,
    Down,
}

impl VoteState {
    pub fn direction(self) -> Option<VoteDirection> {
        match self {
            VoteState::None => None,
            VoteState::Up => Some(VoteDirection::Up),
            VoteState::Down => Some(VoteDirection::Down),
        }
    }
}

impl From<VoteDirection> for VoteState {
    fn from(direction: VoteDirection) -> Self {
        match direction {
            VoteDirection::Up => VoteState::Up,
            VoteDirection::Down => VoteState::Down,
        }
    }
}

impl From<Option<VoteDirection>> for VoteState {
    fn from(direction: Option<VoteDirection>) -> Self {
        direction.map(VoteState::from).unwrap_or_default()
    }
}

impl fmt::Display for VoteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteState::None => f.write_str("none"),
            VoteState::Up => f.write_str("up"),
            VoteState::Down => f.write_str("down"),
        }
    }
}

/// Represents one row of the vote ledger.
///
/// At most one `UserVote` exists per (voter, target) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserVote {
    pub voter_id: UserId,
    pub target: TargetRef,
    pub direction: VoteDirection,
    pub voted_at: DateTime<Utc>,
}

/// The write a ledger has to perform to honor a vote request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerOp {
    /// No row exists yet: create one with this direction.
    Insert(VoteDirection),
    /// A row with the opposite direction exists: overwrite it.
    Update(VoteDirection),
    /// A row with the same direction exists: remove it.
    Delete,
}

impl LedgerOp {
    /// Vote state observed once the op has been applied.
    pub fn resulting_state(self) -> VoteState {
        match self {
            LedgerOp::Insert(direction) | LedgerOp::Update(direction) => direction.into(),
            LedgerOp::Delete => VoteState::None,
        }
    }
}

/// Computes the toggle rule for a (voter, target) pair.
///
/// ```text
/// NONE --vote(dir)--> DIR
/// DIR  --vote(dir)--> NONE
/// DIR  --vote(other)--> OTHER
/// ```
pub fn transition(current: Option<VoteDirection>, requested: VoteDirection) -> LedgerOp {
    match current {
        None => LedgerOp::Insert(requested),
        Some(existing) if existing == requested => LedgerOp::Delete,
        Some(_) => LedgerOp::Update(requested),
    }
}
