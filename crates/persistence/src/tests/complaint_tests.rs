// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::RunQueryDsl;
use nagrik_setu_domain::{Complaint, ComplaintId, ComplaintStatus, GeoPoint, TrackingToken};

use crate::tests::{new_complaint, seed, token};
use crate::{Persistence, PersistenceError};

#[test]
fn test_inserted_complaint_starts_filed_and_unassigned() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let seeded = seed(&mut persistence);

    let complaint: Complaint = persistence
        .insert_complaint(&new_complaint(&seeded, "Pothole"), &token("0000BEEF"))
        .unwrap();

    assert_eq!(complaint.status, ComplaintStatus::Filed);
    assert_eq!(complaint.assigned_to, None);
    assert_eq!(complaint.citizen, seeded.citizen);
    assert_eq!(complaint.tracking_token.value(), "NS-0000BEEF");
    assert_eq!(complaint.location, Some(GeoPoint::new(77.5946, 12.9716)));
    assert_eq!(complaint.created_at, complaint.updated_at);
}

#[test]
fn test_duplicate_tracking_token_is_a_constraint_violation() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let seeded = seed(&mut persistence);
    persistence
        .insert_complaint(&new_complaint(&seeded, "First"), &token("12345678"))
        .unwrap();

    let result = persistence.insert_complaint(&new_complaint(&seeded, "Second"), &token("12345678"));

    assert!(matches!(
        result,
        Err(PersistenceError::ConstraintViolation(_))
    ));
}

#[test]
fn test_find_by_token_and_missing_lookups() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let seeded = seed(&mut persistence);
    let inserted: Complaint = persistence
        .insert_complaint(&new_complaint(&seeded, "Garbage"), &token("ABCDEF01"))
        .unwrap();

    let by_token: TrackingToken = TrackingToken::parse("ns-abcdef01").unwrap();
    assert_eq!(
        persistence.find_complaint_by_token(&by_token).unwrap(),
        Some(inserted)
    );
    assert_eq!(
        persistence
            .find_complaint_by_token(&token("FFFFFFFF"))
            .unwrap(),
        None
    );
    assert_eq!(
        persistence.find_complaint(ComplaintId::new(404)).unwrap(),
        None
    );
}

#[test]
fn test_lists_are_newest_first_and_filtered_by_citizen() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let seeded = seed(&mut persistence);
    let other_citizen = persistence
        .create_citizen("Ravi", "ravi@example.org")
        .unwrap();

    let first: Complaint = persistence
        .insert_complaint(&new_complaint(&seeded, "First"), &token("00000001"))
        .unwrap();
    let mut theirs = new_complaint(&seeded, "Theirs");
    theirs.citizen = other_citizen;
    persistence
        .insert_complaint(&theirs, &token("00000002"))
        .unwrap();
    let third: Complaint = persistence
        .insert_complaint(&new_complaint(&seeded, "Third"), &token("00000003"))
        .unwrap();

    let all: Vec<String> = persistence
        .list_complaints()
        .unwrap()
        .into_iter()
        .map(|c| c.title)
        .collect();
    assert_eq!(all, vec!["Third", "Theirs", "First"]);

    let mine: Vec<ComplaintId> = persistence
        .list_complaints_for_citizen(seeded.citizen)
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(mine, vec![third.id, first.id]);
}

#[test]
fn test_status_cas_applies_only_from_expected_status() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let seeded = seed(&mut persistence);
    let complaint: Complaint = persistence
        .insert_complaint(&new_complaint(&seeded, "Leak"), &token("0000000F"))
        .unwrap();

    assert!(
        persistence
            .compare_and_set_status(
                complaint.id,
                ComplaintStatus::Filed,
                ComplaintStatus::Acknowledged
            )
            .unwrap()
    );
    // A second writer still holding the old status loses.
    assert!(
        !persistence
            .compare_and_set_status(
                complaint.id,
                ComplaintStatus::Filed,
                ComplaintStatus::Acknowledged
            )
            .unwrap()
    );

    let stored: Complaint = persistence.find_complaint(complaint.id).unwrap().unwrap();
    assert_eq!(stored.status, ComplaintStatus::Acknowledged);
}

#[test]
fn test_assignee_cas_distinguishes_empty_and_set() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let seeded = seed(&mut persistence);
    let complaint: Complaint = persistence
        .insert_complaint(&new_complaint(&seeded, "Drain"), &token("000000AA"))
        .unwrap();

    assert!(
        persistence
            .compare_and_set_assignee(
                complaint.id,
                ComplaintStatus::Filed,
                None,
                Some(seeded.staff)
            )
            .unwrap()
    );
    // Expecting an empty assignee no longer matches.
    assert!(
        !persistence
            .compare_and_set_assignee(
                complaint.id,
                ComplaintStatus::Filed,
                None,
                Some(seeded.other_staff)
            )
            .unwrap()
    );
    // Nor does a stale status.
    assert!(
        !persistence
            .compare_and_set_assignee(
                complaint.id,
                ComplaintStatus::Acknowledged,
                Some(seeded.staff),
                Some(seeded.other_staff)
            )
            .unwrap()
    );
    assert!(
        persistence
            .compare_and_set_assignee(
                complaint.id,
                ComplaintStatus::Filed,
                Some(seeded.staff),
                Some(seeded.other_staff)
            )
            .unwrap()
    );

    let stored: Complaint = persistence.find_complaint(complaint.id).unwrap().unwrap();
    assert_eq!(stored.assigned_to, Some(seeded.other_staff));
}

#[test]
fn test_delete_requires_expected_state() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let seeded = seed(&mut persistence);
    let complaint: Complaint = persistence
        .insert_complaint(&new_complaint(&seeded, "Tree"), &token("000000BB"))
        .unwrap();

    assert!(
        !persistence
            .delete_complaint(complaint.id, ComplaintStatus::Acknowledged, None)
            .unwrap()
    );
    assert!(
        persistence
            .delete_complaint(complaint.id, ComplaintStatus::Filed, None)
            .unwrap()
    );
    assert_eq!(persistence.find_complaint(complaint.id).unwrap(), None);
}

#[test]
fn test_unrecognized_stored_status_is_reported_as_corrupt() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let seeded = seed(&mut persistence);
    let complaint: Complaint = persistence
        .insert_complaint(&new_complaint(&seeded, "Noise"), &token("000000CC"))
        .unwrap();

    diesel::sql_query(format!(
        "UPDATE complaints SET status = 'Closed' WHERE complaint_id = {}",
        complaint.id
    ))
    .execute(&mut persistence.conn)
    .unwrap();

    let result = persistence.find_complaint(complaint.id);

    assert!(matches!(
        result,
        Err(PersistenceError::CorruptRecord {
            entity: "complaint",
            ..
        })
    ));
}
