//! Fire-and-forget vote notifications.
//!
//! The gateway hands events to a [`VoteNotifier`] without awaiting delivery.
//! [`ChannelNotifier`] pushes them onto a bounded `mpsc` channel with
//! `try_send`; when the queue is full or closed the event is dropped, so
//! delivery is at most once and a slow consumer never slows a vote down.
//! [`run_notification_worker`] drains the channel into a [`NotificationSink`].
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{info, warn};
use votes_shared::types::VoteEvent;

use crate::errors::NotifierError;

/// Hands a vote event to the notification pipeline without blocking.
pub trait VoteNotifier: Send + Sync {
    fn notify(&self, event: VoteEvent) -> Result<(), NotifierError>;
}

/// Delivers a dequeued vote event to its final destination.
#[async_trait::async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, event: &VoteEvent) -> Result<(), NotifierError>;
}

/// `VoteNotifier` backed by a bounded tokio channel.
#[derive(Clone)]
pub struct ChannelNotifier {
    sender: mpsc::Sender<VoteEvent>,
}

impl ChannelNotifier {
    /// Creates a notifier and the receiving end for the worker.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of events buffered before new ones are dropped
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<VoteEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }
}

impl VoteNotifier for ChannelNotifier {
    fn notify(&self, event: VoteEvent) -> Result<(), NotifierError> {
        self.sender.try_send(event).map_err(|e| match e {
            TrySendError::Full(_) => NotifierError::QueueFull,
            TrySendError::Closed(_) => NotifierError::QueueClosed,
        })
    }
}

/// Sink that records notifications as structured log events.
pub struct LogNotificationSink;

#[async_trait::async_trait]
impl NotificationSink for LogNotificationSink {
    async fn deliver(&self, event: &VoteEvent) -> Result<(), NotifierError> {
        info!(
            recipient_id = event.recipient_id,
            voter_id = event.voter_id,
            target = %event.target,
            state = %event.state,
            message = %event.message(),
            "Vote notification delivered"
        );
        Ok(())
    }
}

/// Drains the notification channel until every sender is dropped.
///
/// Delivery failures are logged and the event is discarded.
pub async fn run_notification_worker(
    mut receiver: mpsc::Receiver<VoteEvent>,
    sink: Arc<dyn NotificationSink>,
) {
    while let Some(event) = receiver.recv().await {
        if let Err(e) = sink.deliver(&event).await {
            warn!(
                recipient_id = event.recipient_id,
                target = %event.target,
                error = %e,
                "Failed to deliver vote notification"
            );
        }
    }
    info!("Notification worker stopped");
}
