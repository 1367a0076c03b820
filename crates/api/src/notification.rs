// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Outbound notification seam.
//!
//! The gateway is called only after the write it reports on has committed
//! and no store lock is held: a new complaint, a resolution or a rejection.
//! Delivery itself lives elsewhere.

use nagrik_setu_domain::TrackingToken;
use thiserror::Error;

/// Everything needed to address and describe a complaint notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplaintNotice {
    /// Name of the filing citizen.
    pub recipient_name: String,
    /// Address the message goes to.
    pub recipient_email: String,
    /// Tracking token of the complaint.
    pub tracking_token: TrackingToken,
    /// Complaint title.
    pub title: String,
}

/// Notification gateway errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotificationError {
    /// The outbound queue is full.
    #[error("notification queue is full")]
    QueueFull,

    /// The gateway has shut down.
    #[error("notification gateway is closed")]
    Closed,

    /// The message was refused.
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

/// Sends filing confirmations, resolutions and rejections to citizens.
pub trait NotificationGateway: Send + Sync {
    /// Confirms a newly filed complaint and hands the citizen its tracking
    /// token.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be accepted.
    fn send_filed(&self, notice: &ComplaintNotice) -> Result<(), NotificationError>;

    /// Tells the citizen their complaint was resolved.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be accepted.
    fn send_resolved(&self, notice: &ComplaintNotice) -> Result<(), NotificationError>;

    /// Tells the citizen their complaint was rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be accepted.
    fn send_rejected(&self, notice: &ComplaintNotice) -> Result<(), NotificationError>;
}
