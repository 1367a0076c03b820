// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::complaint_status::ComplaintStatus;
use crate::types::StaffId;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A stored or supplied status is not one of the recognized values.
    InvalidComplaintStatus {
        /// The unrecognized status string.
        status: String,
    },
    /// The complaint is `Resolved` or `Rejected` and cannot change status.
    ComplaintAlreadyTerminal {
        /// The terminal status the complaint is in.
        status: ComplaintStatus,
    },
    /// The staff member already holds an active assignment.
    StaffUnavailable {
        /// The staff member that was requested.
        staff_id: StaffId,
    },
    /// Complaint title is empty or invalid.
    InvalidTitle(String),
    /// Complaint description is empty or invalid.
    InvalidDescription(String),
    /// Image URL is not an http(s) URL.
    InvalidImageUrl(String),
    /// Location coordinates are out of range.
    InvalidLocation(String),
    /// Tracking token does not match the `NS-XXXXXXXX` format.
    InvalidTrackingToken(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidComplaintStatus { status } => {
                write!(f, "Invalid complaint status: '{status}'")
            }
            Self::ComplaintAlreadyTerminal { status } => {
                write!(f, "Complaint is already {status}")
            }
            Self::StaffUnavailable { staff_id } => {
                write!(f, "Staff {staff_id} is already assigned")
            }
            Self::InvalidTitle(msg) => write!(f, "Invalid title: {msg}"),
            Self::InvalidDescription(msg) => write!(f, "Invalid description: {msg}"),
            Self::InvalidImageUrl(url) => write!(f, "Invalid image URL: '{url}'"),
            Self::InvalidLocation(msg) => write!(f, "Invalid location: {msg}"),
            Self::InvalidTrackingToken(token) => {
                write!(f, "Invalid tracking token: '{token}'")
            }
        }
    }
}

impl std::error::Error for DomainError {}
