use crate::ParseError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a post or a comment.
pub type TargetId = i64;

/// Identifier of an authenticated user.
pub type UserId = i64;

/// The kind of content a vote can be attached to.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Post,
    Comment,
}

impl TargetKind {
    /// Tag persisted alongside the target id in the ledger.
    pub fn tag(self) -> i16 {
        match self {
            TargetKind::Post => 0,
            TargetKind::Comment => 1,
        }
    }

    pub fn from_tag(tag: i16) -> Result<Self, ParseError> {
        match tag {
            0 => Ok(TargetKind::Post),
            1 => Ok(TargetKind::Comment),
            other => Err(ParseError::InvalidTargetKindTag(other)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TargetKind::Post => "post",
            TargetKind::Comment => "comment",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "post" => Ok(TargetKind::Post),
            "comment" => Ok(TargetKind::Comment),
            _ => Err(ParseError::InvalidTargetKind(s.to_string())),
        }
    }
}

/// Tagged reference to a vote target.
///
/// The ledger stores the kind tag next to the id, so a post and a comment
/// sharing the same numeric id never collide.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TargetRef {
    pub kind: TargetKind,
    pub id: TargetId,
}

impl TargetRef {
    pub fn new(kind: TargetKind, id: TargetId) -> Self {
        Self { kind, id }
    }

    pub fn post(id: TargetId) -> Self {
        Self::new(TargetKind::Post, id)
    }

    pub fn comment(id: TargetId) -> Self {
        Self::new(TargetKind::Comment, id)
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Read-model of a post or comment as supplied by the owning service.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Target {
    pub target: TargetRef,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
}
