//! # Votes Service
//! This crate implements the voting core: the vote ledger, the score
//! aggregator, the mutation gateway that orchestrates them, and the
//! fire-and-forget notification dispatch, along with error handling.
pub mod aggregator;
pub mod gateway;
pub mod ledger;
pub mod notifier;

pub mod errors;

pub use aggregator::ScoreAggregator;
pub use errors::{ErrorKind, NotifierError, VoteError};
pub use gateway::MutationGateway;
pub use ledger::VoteLedger;
