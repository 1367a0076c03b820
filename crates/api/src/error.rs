// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.
//!
//! Every failure a caller can observe is a [`LifecycleError`]. Its
//! [`ErrorKind`] is what the routing layer maps to a response; the message
//! carries the detail.

use nagrik_setu::{CoreError, StoreError};
use nagrik_setu_domain::{ComplaintId, ComplaintStatus, DomainError, StaffId};
use thiserror::Error;

/// The kind of a [`LifecycleError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller failed the authorization check.
    Unauthorized,
    /// A referenced complaint, staff member, citizen or department does not exist.
    NotFound,
    /// A stored record is not in a recognized state.
    InvalidState,
    /// The complaint is already `Resolved` or `Rejected`.
    AlreadyTerminal,
    /// The staff member already holds an assignment.
    StaffUnavailable,
    /// An entity needed after commit (the filing citizen) is missing.
    ReferenceMissing,
    /// A store write or the notification gateway failed. Retryable.
    DependencyFailure,
    /// The complaint kept changing underneath the request. Retryable.
    ConcurrentModification,
    /// Request fields failed validation.
    InvalidInput,
}

impl ErrorKind {
    /// Returns true if the caller may retry the same request.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::DependencyFailure | Self::ConcurrentModification)
    }
}

/// Errors returned by the lifecycle coordinator and the complaint handlers.
///
/// `committed` on the post-commit variants names the status that was
/// persisted before the failure, so callers can tell a failed notification
/// from a failed transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// The caller may not perform the action.
    #[error("Unauthorized: '{action}' requires the admin role")]
    Unauthorized {
        /// The attempted action.
        action: String,
    },

    /// A referenced entity does not exist.
    #[error("{resource} {id} not found")]
    NotFound {
        /// The kind of entity.
        resource: &'static str,
        /// The identifier that did not resolve.
        id: String,
    },

    /// A stored record is corrupt.
    #[error("Invalid state: {message}")]
    InvalidState {
        /// Description of the corruption.
        message: String,
    },

    /// The complaint cannot change any more.
    #[error("Complaint {complaint_id} is already {status}")]
    AlreadyTerminal {
        /// The complaint.
        complaint_id: ComplaintId,
        /// Its terminal status.
        status: ComplaintStatus,
    },

    /// The staff member is already assigned elsewhere.
    #[error("Staff {staff_id} is already assigned to an open complaint")]
    StaffUnavailable {
        /// The requested staff member.
        staff_id: StaffId,
    },

    /// A dependent entity needed for notification is missing.
    #[error("{resource} {id} is missing")]
    ReferenceMissing {
        /// The kind of entity.
        resource: &'static str,
        /// Its identifier.
        id: String,
        /// Status committed before the failure, if any.
        committed: Option<ComplaintStatus>,
    },

    /// A store or the notification gateway failed.
    #[error("Dependency failure: {message}")]
    DependencyFailure {
        /// What failed.
        message: String,
        /// Status committed before the failure, if any.
        committed: Option<ComplaintStatus>,
    },

    /// The complaint changed on every attempt.
    #[error("Complaint {complaint_id} was modified concurrently; retry")]
    ConcurrentModification {
        /// The contended complaint.
        complaint_id: ComplaintId,
    },

    /// A request field is invalid.
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput {
        /// The offending field.
        field: String,
        /// What is wrong with it.
        message: String,
    },
}

impl LifecycleError {
    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidState { .. } => ErrorKind::InvalidState,
            Self::AlreadyTerminal { .. } => ErrorKind::AlreadyTerminal,
            Self::StaffUnavailable { .. } => ErrorKind::StaffUnavailable,
            Self::ReferenceMissing { .. } => ErrorKind::ReferenceMissing,
            Self::DependencyFailure { .. } => ErrorKind::DependencyFailure,
            Self::ConcurrentModification { .. } => ErrorKind::ConcurrentModification,
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
        }
    }

    /// Status persisted before this error occurred, if any.
    #[must_use]
    pub const fn committed(&self) -> Option<ComplaintStatus> {
        match self {
            Self::ReferenceMissing { committed, .. } | Self::DependencyFailure { committed, .. } => {
                *committed
            }
            _ => None,
        }
    }

    pub(crate) fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

impl From<StoreError> for LifecycleError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::CorruptRecord { .. } => Self::InvalidState {
                message: err.to_string(),
            },
            StoreError::Conflict(_) | StoreError::Unavailable(_) | StoreError::Backend(_) => {
                Self::DependencyFailure {
                    message: err.to_string(),
                    committed: None,
                }
            }
        }
    }
}

/// Translates a domain error into an API error.
///
/// # Arguments
///
/// * `err` - The domain error
/// * `complaint_id` - The complaint the failing operation targeted
#[must_use]
pub fn translate_domain_error(err: DomainError, complaint_id: ComplaintId) -> LifecycleError {
    match err {
        DomainError::ComplaintAlreadyTerminal { status } => LifecycleError::AlreadyTerminal {
            complaint_id,
            status,
        },
        DomainError::StaffUnavailable { staff_id } => LifecycleError::StaffUnavailable { staff_id },
        DomainError::InvalidComplaintStatus { .. } => LifecycleError::InvalidState {
            message: err.to_string(),
        },
        DomainError::InvalidTitle(message) => LifecycleError::InvalidInput {
            field: String::from("title"),
            message,
        },
        DomainError::InvalidDescription(message) => LifecycleError::InvalidInput {
            field: String::from("description"),
            message,
        },
        DomainError::InvalidImageUrl(url) => LifecycleError::InvalidInput {
            field: String::from("image_url"),
            message: format!("'{url}' is not an http(s) URL"),
        },
        DomainError::InvalidLocation(message) => LifecycleError::InvalidInput {
            field: String::from("location"),
            message,
        },
        DomainError::InvalidTrackingToken(token) => LifecycleError::InvalidInput {
            field: String::from("token"),
            message: format!("'{token}' is not a tracking token"),
        },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError, complaint_id: ComplaintId) -> LifecycleError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err, complaint_id),
    }
}
