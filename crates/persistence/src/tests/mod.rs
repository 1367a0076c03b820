// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod complaint_tests;

use crate::Persistence;
use nagrik_setu_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use nagrik_setu_domain::{
    CitizenId, ComplaintId, DepartmentId, GeoPoint, NewComplaint, StaffId, TrackingToken,
};

/// Identifiers created by [`seed`].
pub struct Seeded {
    pub department: DepartmentId,
    pub citizen: CitizenId,
    pub staff: StaffId,
    pub other_staff: StaffId,
}

/// Creates one department, one citizen and two staff members.
pub fn seed(persistence: &mut Persistence) -> Seeded {
    let department: DepartmentId = persistence
        .create_department("Roads", "Potholes and streetlights")
        .unwrap();
    let citizen: CitizenId = persistence
        .create_citizen("Asha Rao", "asha@example.org")
        .unwrap();
    let staff: StaffId = persistence
        .create_staff("Vikram", "vikram@city.example", department)
        .unwrap();
    let other_staff: StaffId = persistence
        .create_staff("Meena", "meena@city.example", department)
        .unwrap();

    Seeded {
        department,
        citizen,
        staff,
        other_staff,
    }
}

pub fn new_complaint(seeded: &Seeded, title: &str) -> NewComplaint {
    NewComplaint {
        citizen: seeded.citizen,
        department: seeded.department,
        title: title.to_string(),
        description: String::from("Needs attention"),
        image_url: None,
        location: Some(GeoPoint::new(77.5946, 12.9716)),
    }
}

pub fn token(hex: &str) -> TrackingToken {
    TrackingToken::parse(&format!("NS-{hex}")).unwrap()
}

pub fn create_test_event(complaint_id: ComplaintId, action: &str) -> AuditEvent {
    AuditEvent::new(
        complaint_id,
        Actor::new(String::from("7"), String::from("admin")),
        Cause::new(String::from("req-1"), String::from("Test operation")),
        Action::new(action.to_string(), None),
        StateSnapshot::new(String::from("status=Filed,assigned_to=none")),
        StateSnapshot::new(String::from("status=Acknowledged,assigned_to=none")),
    )
}
