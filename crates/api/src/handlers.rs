// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for filing and reading complaints and for
//! browsing the staff and department directories.
//!
//! Lifecycle mutations live on [`LifecycleCoordinator`]; the functions here
//! cover the rest of the surface.

use nagrik_setu::{NotificationKind, StoreError};
use nagrik_setu_audit::AuditEvent;
use nagrik_setu_domain::{
    CitizenId, Complaint, ComplaintId, ComplaintStatus, Department, DepartmentId, GeoPoint,
    NewComplaint, Staff, TrackingToken, validate_new_complaint,
};
use tracing::{debug, info, warn};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::coordinator::{LifecycleCoordinator, Ports};
use crate::error::{LifecycleError, translate_domain_error};
use crate::request_response::{
    AuditEventResponse, AuditTimelineResponse, ComplaintResponse, DepartmentListResponse,
    DepartmentResponse, FileComplaintRequest, FileComplaintResponse, ListComplaintsResponse,
    StaffListResponse, StaffResponse, TrackComplaintResponse,
};

/// Number of fresh tracking tokens tried before filing gives up.
pub const MAX_TOKEN_ATTEMPTS: usize = 5;

/// Files a new complaint on behalf of the calling citizen.
///
/// The complaint starts `Filed` with no assignee and a freshly generated
/// tracking token, which is mailed to the citizen once the complaint is
/// stored.
///
/// # Arguments
///
/// * `coordinator` - The lifecycle coordinator
/// * `request` - The filing request
/// * `caller` - The authenticated caller; must be a citizen
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not a citizen
/// - A field fails validation
/// - The department or the citizen does not exist
/// - No unique tracking token could be allocated
/// - The confirmation could not be sent, with `committed` set to `Filed`
pub fn file_complaint(
    coordinator: &LifecycleCoordinator,
    request: &FileComplaintRequest,
    caller: &AuthenticatedActor,
) -> Result<FileComplaintResponse, LifecycleError> {
    file_complaint_with_tokens(coordinator, request, caller, TrackingToken::generate)
}

/// [`file_complaint`] with an injectable token source.
pub(crate) fn file_complaint_with_tokens(
    coordinator: &LifecycleCoordinator,
    request: &FileComplaintRequest,
    caller: &AuthenticatedActor,
    mut next_token: impl FnMut() -> TrackingToken,
) -> Result<FileComplaintResponse, LifecycleError> {
    let citizen: CitizenId = AuthorizationService::authorize_file_complaint(caller)?;

    let new_complaint: NewComplaint = NewComplaint {
        citizen,
        department: DepartmentId::new(request.department_id),
        title: request.title.trim().to_string(),
        description: request.description.trim().to_string(),
        image_url: request.image_url.clone().filter(|url| !url.trim().is_empty()),
        location: request.location.map(|[lon, lat]| GeoPoint::new(lon, lat)),
    };
    validate_new_complaint(&new_complaint)
        .map_err(|e| translate_domain_error(e, ComplaintId::new(0)))?;

    let ports: &Ports = coordinator.ports();
    if ports
        .departments
        .find_department(new_complaint.department)?
        .is_none()
    {
        return Err(LifecycleError::not_found(
            "department",
            new_complaint.department,
        ));
    }
    if ports.users.find_citizen(citizen)?.is_none() {
        return Err(LifecycleError::not_found("citizen", citizen));
    }

    for attempt in 1..=MAX_TOKEN_ATTEMPTS {
        let token: TrackingToken = next_token();
        match ports.complaints.insert_complaint(&new_complaint, &token) {
            Ok(complaint) => {
                info!(
                    complaint_id = %complaint.id,
                    citizen_id = %citizen,
                    department_id = %complaint.department,
                    tracking_token = %complaint.tracking_token,
                    "Complaint filed"
                );
                confirm_filing(coordinator, &complaint)?;
                return Ok(FileComplaintResponse {
                    complaint: ComplaintResponse::from(&complaint),
                    message: format!(
                        "Complaint filed; track it with {}",
                        complaint.tracking_token
                    ),
                });
            }
            Err(StoreError::Conflict(reason)) => {
                debug!(attempt, %reason, "Tracking token collided, generating another");
            }
            Err(err) => return Err(err.into()),
        }
    }

    warn!(citizen_id = %citizen, "Could not allocate a unique tracking token");
    Err(LifecycleError::DependencyFailure {
        message: format!("no unique tracking token after {MAX_TOKEN_ATTEMPTS} attempts"),
        committed: None,
    })
}

/// Sends the filing confirmation for a stored complaint.
///
/// The complaint stays filed if the confirmation cannot be sent. The error
/// then names the tracking token, since the caller gets no response body.
fn confirm_filing(
    coordinator: &LifecycleCoordinator,
    complaint: &Complaint,
) -> Result<(), LifecycleError> {
    coordinator
        .notify(NotificationKind::Filed, complaint, ComplaintStatus::Filed)
        .map_err(|err| match err {
            LifecycleError::DependencyFailure { message, committed } => {
                LifecycleError::DependencyFailure {
                    message: format!(
                        "complaint {} filed as {}, confirmation not sent: {message}",
                        complaint.id, complaint.tracking_token
                    ),
                    committed,
                }
            }
            other => other,
        })
}

/// Lists every complaint, newest first. Admin only.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the store fails.
pub fn list_complaints(
    coordinator: &LifecycleCoordinator,
    caller: &AuthenticatedActor,
) -> Result<ListComplaintsResponse, LifecycleError> {
    AuthorizationService::require_admin(coordinator.gate(), caller, "list_complaints")?;

    let complaints: Vec<Complaint> = coordinator.ports().complaints.list_complaints()?;
    Ok(ListComplaintsResponse {
        complaints: complaints.iter().map(ComplaintResponse::from).collect(),
    })
}

/// Fetches one complaint. Admin only.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the complaint does not
/// exist.
pub fn get_complaint(
    coordinator: &LifecycleCoordinator,
    complaint_id: ComplaintId,
    caller: &AuthenticatedActor,
) -> Result<ComplaintResponse, LifecycleError> {
    AuthorizationService::require_admin(coordinator.gate(), caller, "get_complaint")?;

    coordinator
        .ports()
        .complaints
        .find_complaint(complaint_id)?
        .map(|c| ComplaintResponse::from(&c))
        .ok_or_else(|| LifecycleError::not_found("complaint", complaint_id))
}

/// Lists the complaints filed by one citizen, newest first.
///
/// # Errors
///
/// Returns an error if the caller is neither an admin nor that citizen.
pub fn list_citizen_complaints(
    coordinator: &LifecycleCoordinator,
    citizen: CitizenId,
    caller: &AuthenticatedActor,
) -> Result<ListComplaintsResponse, LifecycleError> {
    AuthorizationService::authorize_citizen_view(coordinator.gate(), caller, citizen)?;

    let complaints: Vec<Complaint> = coordinator.ports().complaints.list_for_citizen(citizen)?;
    Ok(ListComplaintsResponse {
        complaints: complaints.iter().map(ComplaintResponse::from).collect(),
    })
}

/// Looks up a complaint by its tracking token. No authorization required.
///
/// # Errors
///
/// Returns `InvalidInput` for a malformed token and `NotFound` for an
/// unknown one.
pub fn track_complaint(
    coordinator: &LifecycleCoordinator,
    token: &str,
) -> Result<TrackComplaintResponse, LifecycleError> {
    let token: TrackingToken =
        TrackingToken::parse(token).map_err(|e| translate_domain_error(e, ComplaintId::new(0)))?;

    coordinator
        .ports()
        .complaints
        .find_by_token(&token)?
        .map(|c| TrackComplaintResponse::from(&c))
        .ok_or_else(|| LifecycleError::not_found("complaint", token))
}

/// Returns the audit trail of a complaint, oldest first. Admin only.
///
/// The trail outlives the complaint, so a deleted complaint still has one.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the store fails.
pub fn audit_timeline(
    coordinator: &LifecycleCoordinator,
    complaint_id: ComplaintId,
    caller: &AuthenticatedActor,
) -> Result<AuditTimelineResponse, LifecycleError> {
    AuthorizationService::require_admin(coordinator.gate(), caller, "audit_timeline")?;

    let events: Vec<AuditEvent> = coordinator.ports().audit.events_for(complaint_id)?;
    Ok(AuditTimelineResponse {
        complaint_id: complaint_id.value(),
        events: events.iter().map(AuditEventResponse::from).collect(),
    })
}

/// Lists the staff directory with each member's availability. Admin only.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the store fails.
pub fn list_staff(
    coordinator: &LifecycleCoordinator,
    caller: &AuthenticatedActor,
) -> Result<StaffListResponse, LifecycleError> {
    AuthorizationService::require_admin(coordinator.gate(), caller, "list_staff")?;

    let staff: Vec<Staff> = coordinator.ports().staff.list_staff()?;
    Ok(StaffListResponse {
        staff: staff.iter().map(StaffResponse::from).collect(),
    })
}

/// Lists the departments complaints can be filed against. No authorization
/// required.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn list_departments(
    coordinator: &LifecycleCoordinator,
) -> Result<DepartmentListResponse, LifecycleError> {
    let departments: Vec<Department> = coordinator.ports().departments.list_departments()?;
    Ok(DepartmentListResponse {
        departments: departments.iter().map(DepartmentResponse::from).collect(),
    })
}
