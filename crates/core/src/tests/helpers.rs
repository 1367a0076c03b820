// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use nagrik_setu_audit::{Actor, Cause};
use nagrik_setu_domain::{
    CitizenId, Complaint, ComplaintId, ComplaintStatus, DepartmentId, Staff, StaffId,
    TrackingToken,
};

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("admin-123"), String::from("admin"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Admin request"))
}

pub fn create_test_complaint(status: ComplaintStatus, assigned_to: Option<i64>) -> Complaint {
    Complaint {
        id: ComplaintId::new(1),
        citizen: CitizenId::new(10),
        department: DepartmentId::new(3),
        title: String::from("Broken streetlight"),
        description: String::from("The light on 4th Cross has been out for a week"),
        image_url: None,
        location: None,
        status,
        assigned_to: assigned_to.map(StaffId::new),
        tracking_token: TrackingToken::parse("NS-00C0FFEE").unwrap(),
        created_at: String::from("2026-01-01T00:00:00Z"),
        updated_at: String::from("2026-01-01T00:00:00Z"),
    }
}

pub fn create_test_staff(id: i64, is_active: bool) -> Staff {
    Staff {
        id: StaffId::new(id),
        name: format!("Staff {id}"),
        email: format!("staff{id}@city.example"),
        department: DepartmentId::new(3),
        is_active,
    }
}
