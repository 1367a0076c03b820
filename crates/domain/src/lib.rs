// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod complaint_status;
mod error;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use complaint_status::{ADVANCEMENT_SEQUENCE, ComplaintStatus};
pub use error::DomainError;
pub use types::{
    Citizen, CitizenId, Complaint, ComplaintId, Department, DepartmentId, GeoPoint, NewComplaint,
    Staff, StaffId, TrackingToken,
};
pub use validation::{MAX_TITLE_LENGTH, validate_location, validate_new_complaint};
