// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use nagrik_setu::ComplaintStore;
use nagrik_setu_domain::{CitizenId, ComplaintId, ComplaintStatus, TrackingToken};

use super::helpers::{Fixture, RecordingGateway, admin, cause, staff_caller};
use crate::auth::{AuthenticatedActor, Role};
use crate::error::{ErrorKind, LifecycleError};
use crate::handlers::{
    MAX_TOKEN_ATTEMPTS, audit_timeline, file_complaint, file_complaint_with_tokens, get_complaint,
    list_citizen_complaints, list_complaints, list_departments, list_staff, track_complaint,
};
use crate::request_response::{FileComplaintRequest, FileComplaintResponse};

#[test]
fn test_file_complaint_starts_filed_and_unassigned() {
    let fx: Fixture = Fixture::new();
    let mut request: FileComplaintRequest = fx.request("  Broken bench  ");
    request.image_url = Some(String::from("https://img.example/bench.jpg"));

    let response: FileComplaintResponse =
        file_complaint(&fx.coordinator, &request, &fx.citizen_caller()).unwrap();

    let complaint = response.complaint;
    assert_eq!(complaint.title, "Broken bench");
    assert_eq!(complaint.status, ComplaintStatus::Filed);
    assert_eq!(complaint.assigned_to, None);
    assert_eq!(complaint.citizen_id, fx.citizen.value());
    assert_eq!(complaint.location, Some([77.5946, 12.9716]));
    assert!(TrackingToken::parse(&complaint.tracking_token).is_ok());
    assert!(response.message.contains(&complaint.tracking_token));
}

#[test]
fn test_filing_mails_the_tracking_token() {
    let fx: Fixture = Fixture::new();

    let response: FileComplaintResponse =
        file_complaint(&fx.coordinator, &fx.request("Overflowing drain"), &fx.citizen_caller())
            .unwrap();

    let confirmations = fx.confirmations();
    assert_eq!(confirmations.len(), 1);
    assert_eq!(confirmations[0].recipient_email, "asha@example.org");
    assert_eq!(
        confirmations[0].tracking_token.value(),
        response.complaint.tracking_token
    );
    assert_eq!(confirmations[0].title, "Overflowing drain");
    assert!(fx.sent().is_empty());
}

#[test]
fn test_unsent_confirmation_keeps_the_complaint() {
    let fx: Fixture = Fixture::build(RecordingGateway::refusing(), |_, _| {});

    let err: LifecycleError =
        file_complaint(&fx.coordinator, &fx.request("Fallen tree"), &fx.citizen_caller())
            .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DependencyFailure);
    assert_eq!(err.committed(), Some(ComplaintStatus::Filed));
    let stored = fx.store.list_for_citizen(fx.citizen).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].status, ComplaintStatus::Filed);
    assert!(err.to_string().contains(stored[0].tracking_token.value()));
}

#[test]
fn test_file_complaint_rejects_blank_fields() {
    let fx: Fixture = Fixture::new();

    let mut blank_title: FileComplaintRequest = fx.request("   ");
    let err: LifecycleError =
        file_complaint(&fx.coordinator, &blank_title, &fx.citizen_caller()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    blank_title.title = String::from("Valid");
    blank_title.description = String::new();
    let err: LifecycleError =
        file_complaint(&fx.coordinator, &blank_title, &fx.citizen_caller()).unwrap_err();
    assert!(matches!(err, LifecycleError::InvalidInput { ref field, .. } if field == "description"));

    let mut bad_location: FileComplaintRequest = fx.request("Somewhere");
    bad_location.location = Some([200.0, 0.0]);
    let err: LifecycleError =
        file_complaint(&fx.coordinator, &bad_location, &fx.citizen_caller()).unwrap_err();
    assert!(matches!(err, LifecycleError::InvalidInput { ref field, .. } if field == "location"));

    assert!(fx.store.with(|p| p.list_complaints()).unwrap().is_empty());
}

#[test]
fn test_file_complaint_requires_existing_department_and_citizen() {
    let fx: Fixture = Fixture::new();

    let mut request: FileComplaintRequest = fx.request("Nowhere");
    request.department_id = 77;
    let err: LifecycleError =
        file_complaint(&fx.coordinator, &request, &fx.citizen_caller()).unwrap_err();
    assert_eq!(
        err,
        LifecycleError::NotFound {
            resource: "department",
            id: String::from("77")
        }
    );

    let ghost: AuthenticatedActor = AuthenticatedActor::new(String::from("555"), Role::Citizen);
    let err: LifecycleError =
        file_complaint(&fx.coordinator, &fx.request("Ghost"), &ghost).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_only_citizens_file_complaints() {
    let fx: Fixture = Fixture::new();

    for caller in [admin(), staff_caller()] {
        let err: LifecycleError =
            file_complaint(&fx.coordinator, &fx.request("Nope"), &caller).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }
}

#[test]
fn test_token_collision_draws_a_new_token() {
    let fx: Fixture = Fixture::new();
    let taken: TrackingToken = TrackingToken::parse("NS-0000AAAA").unwrap();
    let fresh: TrackingToken = TrackingToken::parse("NS-0000BBBB").unwrap();

    let mut tokens = vec![taken.clone()].into_iter();
    file_complaint_with_tokens(&fx.coordinator, &fx.request("First"), &fx.citizen_caller(), || {
        tokens.next().unwrap()
    })
    .unwrap();

    let mut tokens = vec![taken, fresh.clone()].into_iter();
    let response: FileComplaintResponse = file_complaint_with_tokens(
        &fx.coordinator,
        &fx.request("Second"),
        &fx.citizen_caller(),
        || tokens.next().unwrap(),
    )
    .unwrap();

    assert_eq!(response.complaint.tracking_token, fresh.value());
}

#[test]
fn test_token_exhaustion_is_dependency_failure() {
    let fx: Fixture = Fixture::new();
    let taken: TrackingToken = TrackingToken::parse("NS-0000AAAA").unwrap();
    file_complaint_with_tokens(&fx.coordinator, &fx.request("First"), &fx.citizen_caller(), || {
        taken.clone()
    })
    .unwrap();

    let mut draws: usize = 0;
    let err: LifecycleError = file_complaint_with_tokens(
        &fx.coordinator,
        &fx.request("Second"),
        &fx.citizen_caller(),
        || {
            draws += 1;
            taken.clone()
        },
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DependencyFailure);
    assert_eq!(err.committed(), None);
    assert_eq!(draws, MAX_TOKEN_ATTEMPTS);
}

#[test]
fn test_list_complaints_is_admin_only_and_newest_first() {
    let fx: Fixture = Fixture::new();
    let older: ComplaintId = fx.file("Older");
    let newer: ComplaintId = fx.file("Newer");

    let listed: Vec<i64> = list_complaints(&fx.coordinator, &admin())
        .unwrap()
        .complaints
        .iter()
        .map(|c| c.complaint_id)
        .collect();
    assert_eq!(listed, vec![newer.value(), older.value()]);

    let err: LifecycleError = list_complaints(&fx.coordinator, &fx.citizen_caller()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
}

#[test]
fn test_get_complaint() {
    let fx: Fixture = Fixture::new();
    let id: ComplaintId = fx.file("Lookup");

    let found = get_complaint(&fx.coordinator, id, &admin()).unwrap();
    assert_eq!(found.title, "Lookup");

    let missing: LifecycleError =
        get_complaint(&fx.coordinator, ComplaintId::new(42), &admin()).unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::NotFound);

    let denied: LifecycleError = get_complaint(&fx.coordinator, id, &staff_caller()).unwrap_err();
    assert_eq!(denied.kind(), ErrorKind::Unauthorized);
}

#[test]
fn test_citizens_see_only_their_own_complaints() {
    let fx: Fixture = Fixture::new();
    fx.file("Mine");
    let other: CitizenId = fx
        .store
        .with(|p| p.create_citizen("Ravi", "ravi@example.org"))
        .unwrap();

    let own = list_citizen_complaints(&fx.coordinator, fx.citizen, &fx.citizen_caller()).unwrap();
    assert_eq!(own.complaints.len(), 1);

    let by_admin = list_citizen_complaints(&fx.coordinator, fx.citizen, &admin()).unwrap();
    assert_eq!(by_admin.complaints.len(), 1);

    let theirs = list_citizen_complaints(&fx.coordinator, other, &admin()).unwrap();
    assert!(theirs.complaints.is_empty());

    let err: LifecycleError =
        list_citizen_complaints(&fx.coordinator, other, &fx.citizen_caller()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
}

#[test]
fn test_track_complaint_is_public_and_hides_identities() {
    let fx: Fixture = Fixture::new();
    let id: ComplaintId = fx.file("Track me");
    fx.coordinator
        .assign_staff(id, fx.staff, &admin(), cause())
        .unwrap();
    let token: String = fx.complaint(id).tracking_token.value().to_lowercase();

    let tracked = track_complaint(&fx.coordinator, &token).unwrap();

    assert_eq!(tracked.tracking_token, token.to_uppercase());
    assert_eq!(tracked.status, ComplaintStatus::Filed);
    assert!(tracked.is_assigned);
    let json: serde_json::Value = serde_json::to_value(&tracked).unwrap();
    assert!(json.get("citizen_id").is_none());
    assert!(json.get("assigned_to").is_none());
}

#[test]
fn test_track_complaint_errors() {
    let fx: Fixture = Fixture::new();

    let malformed: LifecycleError = track_complaint(&fx.coordinator, "ticket-1").unwrap_err();
    assert_eq!(malformed.kind(), ErrorKind::InvalidInput);

    let unknown: LifecycleError = track_complaint(&fx.coordinator, "NS-DEADBEEF").unwrap_err();
    assert_eq!(unknown.kind(), ErrorKind::NotFound);
}

#[test]
fn test_audit_timeline_outlives_deleted_complaint() {
    let fx: Fixture = Fixture::new();
    let id: ComplaintId = fx.file("Short lived");
    fx.coordinator.advance_status(id, &admin(), cause()).unwrap();
    fx.coordinator.delete_complaint(id, &admin(), cause()).unwrap();

    let timeline = audit_timeline(&fx.coordinator, id, &admin()).unwrap();

    let actions: Vec<&str> = timeline.events.iter().map(|e| e.action.as_str()).collect();
    assert_eq!(actions, vec!["AdvanceStatus", "DeleteComplaint"]);
    assert_eq!(timeline.events[1].before, "status=Acknowledged,assigned_to=none");
    assert_eq!(timeline.events[1].after, "deleted");
    assert!(timeline.events.iter().all(|e| e.event_id.is_some()));

    let err: LifecycleError = audit_timeline(&fx.coordinator, id, &staff_caller()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
}

#[test]
fn test_staff_listing_shows_availability() {
    let fx: Fixture = Fixture::new();
    let id: ComplaintId = fx.file("Needs a hand");
    fx.coordinator
        .assign_staff(id, fx.staff, &admin(), cause())
        .unwrap();

    let listed = list_staff(&fx.coordinator, &admin()).unwrap();

    let flags: Vec<(i64, bool)> = listed
        .staff
        .iter()
        .map(|s| (s.staff_id, s.is_active))
        .collect();
    assert_eq!(
        flags,
        vec![(fx.staff.value(), true), (fx.other_staff.value(), false)]
    );
    assert_eq!(listed.staff[0].department_id, fx.department.value());

    for caller in [staff_caller(), fx.citizen_caller()] {
        let err: LifecycleError = list_staff(&fx.coordinator, &caller).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }
}

#[test]
fn test_department_listing() {
    let fx: Fixture = Fixture::new();

    let listed = list_departments(&fx.coordinator).unwrap();

    assert_eq!(listed.departments.len(), 1);
    assert_eq!(listed.departments[0].department_id, fx.department.value());
    assert_eq!(listed.departments[0].name, "Roads");
    assert_eq!(listed.departments[0].description, "Potholes");
}
