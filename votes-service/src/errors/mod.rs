mod notifier;
mod vote;

pub use notifier::NotifierError;
pub use vote::{ErrorKind, VoteError};
