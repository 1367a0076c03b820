// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations for the persistence layer.
//!
//! Every lifecycle write is conditional on the state it expects to replace
//! and returns whether a row was changed. A `false` result means another
//! writer got there first.
//!
//! ## Module Organization
//!
//! - `complaints`: Complaint inserts and conditional updates
//! - `directory`: Citizen, staff and department records, staff claims
//! - `audit`: Audit event persistence

pub mod audit;
pub mod complaints;
pub mod directory;

pub use audit::persist_audit_event;
pub use complaints::{
    compare_and_set_assignee, compare_and_set_status, delete_complaint, insert_complaint,
};
pub use directory::{insert_citizen, insert_department, insert_staff, release_staff, try_claim_staff};
