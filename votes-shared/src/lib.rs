//! # Votes Shared
//! This crate defines shared data structures and types used across the votes workspace.
//! It includes common definitions for vote targets, ledger rows, vote states, scores,
//! ranking orders and vote notification events.
pub mod errors;
pub mod types;

pub use errors::ParseError;
