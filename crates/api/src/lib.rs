// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The complaint API boundary.
//!
//! [`LifecycleCoordinator`] owns every change to a complaint's status and
//! assignee. The free functions in [`handlers`] cover filing and reads.
//! Everything returns [`LifecycleError`].

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod coordinator;
mod error;
pub mod handlers;
mod notification;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthorizationGate, AuthorizationService, Role, RoleGate};
pub use coordinator::{LifecycleCoordinator, MAX_ATTEMPTS, Ports};
pub use error::{ErrorKind, LifecycleError, translate_core_error, translate_domain_error};
pub use handlers::{
    MAX_TOKEN_ATTEMPTS, audit_timeline, file_complaint, get_complaint, list_citizen_complaints,
    list_complaints, list_departments, list_staff, track_complaint,
};
pub use notification::{ComplaintNotice, NotificationError, NotificationGateway};
pub use request_response::{
    AssignStaffResponse, AuditEventResponse, AuditTimelineResponse, ComplaintResponse,
    DeleteComplaintResponse, DepartmentListResponse, DepartmentResponse, FileComplaintRequest,
    FileComplaintResponse, ListComplaintsResponse, StaffListResponse, StaffResponse,
    StatusResponse, TrackComplaintResponse,
};
