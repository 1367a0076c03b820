// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use nagrik_setu_audit::AuditEvent;
use nagrik_setu_domain::{Complaint, ComplaintStatus, Department, Staff};

/// API request to file a new complaint.
///
/// The filing citizen is taken from the caller, never from the request.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FileComplaintRequest {
    /// The department the complaint is routed to.
    pub department_id: i64,
    /// Short summary.
    pub title: String,
    /// Full description.
    pub description: String,
    /// Optional photo URL.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Optional `[longitude, latitude]` pair.
    #[serde(default)]
    pub location: Option<[f64; 2]>,
}

/// A complaint as returned by the API.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ComplaintResponse {
    /// The canonical complaint identifier.
    pub complaint_id: i64,
    /// The filing citizen.
    pub citizen_id: i64,
    /// The department the complaint is routed to.
    pub department_id: i64,
    /// Short summary.
    pub title: String,
    /// Full description.
    pub description: String,
    /// Optional photo URL.
    pub image_url: Option<String>,
    /// Optional `[longitude, latitude]` pair.
    pub location: Option<[f64; 2]>,
    /// Current lifecycle status.
    pub status: ComplaintStatus,
    /// Assigned staff member, if any.
    pub assigned_to: Option<i64>,
    /// Tracking token given to the citizen.
    pub tracking_token: String,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Last modification timestamp (RFC 3339).
    pub updated_at: String,
}

impl From<&Complaint> for ComplaintResponse {
    fn from(complaint: &Complaint) -> Self {
        Self {
            complaint_id: complaint.id.value(),
            citizen_id: complaint.citizen.value(),
            department_id: complaint.department.value(),
            title: complaint.title.clone(),
            description: complaint.description.clone(),
            image_url: complaint.image_url.clone(),
            location: complaint.location.map(|p| [p.longitude, p.latitude]),
            status: complaint.status,
            assigned_to: complaint.assigned_to.map(|s| s.value()),
            tracking_token: complaint.tracking_token.value().to_string(),
            created_at: complaint.created_at.clone(),
            updated_at: complaint.updated_at.clone(),
        }
    }
}

/// API response for a successful filing.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FileComplaintResponse {
    /// The created complaint.
    pub complaint: ComplaintResponse,
    /// A success message.
    pub message: String,
}

/// API response for a status transition.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StatusResponse {
    /// The complaint that changed.
    pub complaint_id: i64,
    /// The status it is now in.
    pub status: ComplaintStatus,
}

/// API response for a staff assignment.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AssignStaffResponse {
    /// The complaint after assignment.
    pub complaint: ComplaintResponse,
    /// A success message.
    pub message: String,
}

/// API response for a deletion.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeleteComplaintResponse {
    /// The removed complaint.
    pub complaint_id: i64,
    /// A success message.
    pub message: String,
}

/// API response listing complaints.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ListComplaintsResponse {
    /// Complaints, newest first.
    pub complaints: Vec<ComplaintResponse>,
}

/// Public view of a complaint looked up by tracking token.
///
/// Carries nothing that identifies the citizen or the staff member.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TrackComplaintResponse {
    /// The tracking token that was looked up.
    pub tracking_token: String,
    /// Short summary.
    pub title: String,
    /// Current lifecycle status.
    pub status: ComplaintStatus,
    /// Whether a staff member is working the complaint.
    pub is_assigned: bool,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Last modification timestamp (RFC 3339).
    pub updated_at: String,
}

impl From<&Complaint> for TrackComplaintResponse {
    fn from(complaint: &Complaint) -> Self {
        Self {
            tracking_token: complaint.tracking_token.value().to_string(),
            title: complaint.title.clone(),
            status: complaint.status,
            is_assigned: complaint.assigned_to.is_some(),
            created_at: complaint.created_at.clone(),
            updated_at: complaint.updated_at.clone(),
        }
    }
}

/// One entry of a complaint's audit trail.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuditEventResponse {
    /// Identifier assigned by the audit log.
    pub event_id: Option<i64>,
    /// Who performed the action.
    pub actor_id: String,
    /// The actor's role.
    pub actor_type: String,
    /// Request that caused the action.
    pub cause_id: String,
    /// Action name.
    pub action: String,
    /// Action details.
    pub details: Option<String>,
    /// State before the action.
    pub before: String,
    /// State after the action.
    pub after: String,
}

impl From<&AuditEvent> for AuditEventResponse {
    fn from(event: &AuditEvent) -> Self {
        Self {
            event_id: event.event_id,
            actor_id: event.actor.id.clone(),
            actor_type: event.actor.actor_type.clone(),
            cause_id: event.cause.id.clone(),
            action: event.action.name.clone(),
            details: event.action.details.clone(),
            before: event.before.data.clone(),
            after: event.after.data.clone(),
        }
    }
}

/// API response for a complaint's audit trail.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuditTimelineResponse {
    /// The complaint.
    pub complaint_id: i64,
    /// Events, oldest first.
    pub events: Vec<AuditEventResponse>,
}

/// A staff member as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StaffResponse {
    /// The canonical staff identifier.
    pub staff_id: i64,
    /// Display name.
    pub name: String,
    /// Contact address.
    pub email: String,
    /// Home department.
    pub department_id: i64,
    /// Whether the staff member is working a complaint.
    pub is_active: bool,
}

impl From<&Staff> for StaffResponse {
    fn from(staff: &Staff) -> Self {
        Self {
            staff_id: staff.id.value(),
            name: staff.name.clone(),
            email: staff.email.clone(),
            department_id: staff.department.value(),
            is_active: staff.is_active,
        }
    }
}

/// API response for the staff directory.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StaffListResponse {
    /// Staff members ordered by identifier.
    pub staff: Vec<StaffResponse>,
}

/// A department as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DepartmentResponse {
    /// The canonical department identifier.
    pub department_id: i64,
    /// Department name.
    pub name: String,
    /// Free-form description.
    pub description: String,
}

impl From<&Department> for DepartmentResponse {
    fn from(department: &Department) -> Self {
        Self {
            department_id: department.id.value(),
            name: department.name.clone(),
            description: department.description.clone(),
        }
    }
}

/// API response for the department directory.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DepartmentListResponse {
    /// Departments ordered by identifier.
    pub departments: Vec<DepartmentResponse>,
}
