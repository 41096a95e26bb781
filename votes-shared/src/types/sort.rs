use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Ordering applied to a ranking listing.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Most recently created first.
    New,
    /// Most upvotes first. Downvotes are ignored.
    Top,
    /// Highest time-decayed upvote rate first.
    #[default]
    Hot,
}

impl FromStr for SortBy {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(SortBy::New),
            "top" => Ok(SortBy::Top),
            "hot" => Ok(SortBy::Hot),
            _ => Err(ParseError::InvalidSortBy(s.to_string())),
        }
    }
}
