// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Notification outbox.
//!
//! The coordinator hands notices to [`OutboxGateway`], which only enqueues
//! them. A background worker drains the queue and delivers each message
//! under a timeout, so a slow mail transport never holds up a request.

use std::future::Future;
use std::time::Duration;

use nagrik_setu_api::{ComplaintNotice, NotificationError, NotificationGateway};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// A rendered message waiting for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

impl OutboundMessage {
    fn filed(notice: &ComplaintNotice) -> Self {
        Self {
            to: notice.recipient_email.clone(),
            subject: format!("Complaint {} filed", notice.tracking_token),
            body: format!(
                "Dear {},\n\nYour complaint \"{}\" has been filed. \
                 Use tracking token {} to follow its progress.",
                notice.recipient_name, notice.title, notice.tracking_token
            ),
        }
    }

    fn resolved(notice: &ComplaintNotice) -> Self {
        Self {
            to: notice.recipient_email.clone(),
            subject: format!("Complaint {} resolved", notice.tracking_token),
            body: format!(
                "Dear {},\n\nYour complaint \"{}\" ({}) has been resolved.",
                notice.recipient_name, notice.title, notice.tracking_token
            ),
        }
    }

    fn rejected(notice: &ComplaintNotice) -> Self {
        Self {
            to: notice.recipient_email.clone(),
            subject: format!("Complaint {} rejected", notice.tracking_token),
            body: format!(
                "Dear {},\n\nYour complaint \"{}\" ({}) has been rejected.",
                notice.recipient_name, notice.title, notice.tracking_token
            ),
        }
    }
}

/// [`NotificationGateway`] backed by a bounded channel.
#[derive(Clone)]
pub struct OutboxGateway {
    tx: mpsc::Sender<OutboundMessage>,
}

impl OutboxGateway {
    /// Creates a gateway and the receiving end of its queue.
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<OutboundMessage>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    fn enqueue(&self, message: OutboundMessage) -> Result<(), NotificationError> {
        self.tx.try_send(message).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => NotificationError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => NotificationError::Closed,
        })
    }
}

impl NotificationGateway for OutboxGateway {
    fn send_filed(&self, notice: &ComplaintNotice) -> Result<(), NotificationError> {
        self.enqueue(OutboundMessage::filed(notice))
    }

    fn send_resolved(&self, notice: &ComplaintNotice) -> Result<(), NotificationError> {
        self.enqueue(OutboundMessage::resolved(notice))
    }

    fn send_rejected(&self, notice: &ComplaintNotice) -> Result<(), NotificationError> {
        self.enqueue(OutboundMessage::rejected(notice))
    }
}

/// The final hop of a notification.
pub trait Delivery: Send + Sync {
    /// Delivers one message.
    ///
    /// # Errors
    ///
    /// Returns an error if the message could not be delivered.
    fn deliver(
        &self,
        message: &OutboundMessage,
    ) -> impl Future<Output = Result<(), NotificationError>> + Send;
}

/// Delivery that writes each message to the log.
///
/// Mail transport is provided outside this server.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDelivery;

impl Delivery for LogDelivery {
    async fn deliver(&self, message: &OutboundMessage) -> Result<(), NotificationError> {
        info!(to = %message.to, subject = %message.subject, "Notification delivered");
        Ok(())
    }
}

/// Drains the queue until every gateway handle has been dropped.
///
/// A message that fails or times out is logged and dropped; the transition
/// it belongs to has already committed.
///
/// # Arguments
///
/// * `rx` - The receiving end returned by [`OutboxGateway::channel`]
/// * `delivery` - Where messages go
/// * `timeout` - Upper bound on a single delivery
pub async fn run_worker<D: Delivery>(
    mut rx: mpsc::Receiver<OutboundMessage>,
    delivery: D,
    timeout: Duration,
) {
    while let Some(message) = rx.recv().await {
        match tokio::time::timeout(timeout, delivery.deliver(&message)).await {
            Ok(Ok(())) => debug!(to = %message.to, "Outbox message handled"),
            Ok(Err(err)) => warn!(to = %message.to, error = %err, "Notification delivery failed"),
            Err(_) => warn!(
                to = %message.to,
                timeout_ms = %timeout.as_millis(),
                "Notification delivery timed out"
            ),
        }
    }
    info!("Notification outbox closed");
}
