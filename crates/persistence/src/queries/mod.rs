// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `complaints`: Complaint lookups and listings
//! - `directory`: Citizens, staff and departments
//! - `audit`: Audit timelines

pub mod audit;
pub mod complaints;
pub mod directory;

pub use audit::get_audit_timeline;
pub use complaints::{
    find_complaint, find_complaint_by_token, list_complaints, list_complaints_for_citizen,
};
pub use directory::{find_citizen, find_department, find_staff, list_departments, list_staff};
