//! Error types for the notification dispatch.
//! These never reach a voter: the gateway logs and drops them.
use thiserror::Error;

/// Represents errors that can occur while handing off a vote notification.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifierError {
    #[error("Notification queue is full")]
    QueueFull,
    #[error("Notification queue is closed")]
    QueueClosed,
    #[error("Error delivering notification: {0}")]
    Delivery(String),
}
