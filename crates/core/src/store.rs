// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ports the lifecycle coordinator needs from the outside world.
//!
//! Every write that takes part in a lifecycle transition is conditional:
//! it names the state it expects to find and reports `Ok(false)` when the
//! row has moved on. The coordinator relies on this to detect lost races
//! instead of holding a lock across reads and writes.

use nagrik_setu_audit::AuditEvent;
use nagrik_setu_domain::{
    Citizen, CitizenId, Complaint, ComplaintId, ComplaintStatus, Department, DepartmentId,
    NewComplaint, Staff, StaffId, TrackingToken,
};

/// Errors reported by store implementations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A stored row could not be turned into a domain value.
    CorruptRecord {
        /// The kind of row, e.g. `"complaint"`.
        entity: &'static str,
        /// The row identifier.
        id: i64,
        /// What was wrong with it.
        reason: String,
    },
    /// A uniqueness or referential constraint rejected the write.
    Conflict(String),
    /// The store could not be reached.
    Unavailable(String),
    /// Any other backend failure.
    Backend(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CorruptRecord { entity, id, reason } => {
                write!(f, "Corrupt {entity} record {id}: {reason}")
            }
            Self::Conflict(msg) => write!(f, "Store conflict: {msg}"),
            Self::Unavailable(msg) => write!(f, "Store unavailable: {msg}"),
            Self::Backend(msg) => write!(f, "Store error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Storage of complaints.
pub trait ComplaintStore: Send + Sync {
    /// Loads a complaint by identifier.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::CorruptRecord` if the stored status is not
    /// recognized, or a backend error.
    fn find_complaint(&self, id: ComplaintId) -> Result<Option<Complaint>, StoreError>;

    /// Loads a complaint by its tracking token.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn find_by_token(&self, token: &TrackingToken) -> Result<Option<Complaint>, StoreError>;

    /// Lists every complaint, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn list_complaints(&self) -> Result<Vec<Complaint>, StoreError>;

    /// Lists the complaints filed by one citizen, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn list_for_citizen(&self, citizen: CitizenId) -> Result<Vec<Complaint>, StoreError>;

    /// Inserts a new complaint in status `Filed` with no assignee.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the tracking token is taken.
    fn insert_complaint(
        &self,
        complaint: &NewComplaint,
        token: &TrackingToken,
    ) -> Result<Complaint, StoreError>;

    /// Sets the status if, and only if, it is still `expected`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn compare_and_set_status(
        &self,
        id: ComplaintId,
        expected: ComplaintStatus,
        next: ComplaintStatus,
    ) -> Result<bool, StoreError>;

    /// Sets the assignee if both status and assignee are still as expected.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn compare_and_set_assignee(
        &self,
        id: ComplaintId,
        expected_status: ComplaintStatus,
        expected: Option<StaffId>,
        next: Option<StaffId>,
    ) -> Result<bool, StoreError>;

    /// Deletes the complaint if status and assignee are still as expected.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn delete_complaint(
        &self,
        id: ComplaintId,
        expected_status: ComplaintStatus,
        expected_assignee: Option<StaffId>,
    ) -> Result<bool, StoreError>;
}

/// Directory of staff members and their availability flag.
pub trait StaffDirectory: Send + Sync {
    /// Loads a staff member.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn find_staff(&self, id: StaffId) -> Result<Option<Staff>, StoreError>;

    /// Flips `is_active` from false to true.
    ///
    /// Returns `Ok(false)` if the staff member was already active or does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn try_claim(&self, id: StaffId) -> Result<bool, StoreError>;

    /// Flips `is_active` back to false.
    ///
    /// Returns `Ok(false)` if the staff member was not active.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn release(&self, id: StaffId) -> Result<bool, StoreError>;

    /// Lists every staff member ordered by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn list_staff(&self) -> Result<Vec<Staff>, StoreError>;
}

/// Directory of citizen accounts.
pub trait UserDirectory: Send + Sync {
    /// Loads a citizen.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn find_citizen(&self, id: CitizenId) -> Result<Option<Citizen>, StoreError>;
}

/// Directory of departments.
pub trait DepartmentDirectory: Send + Sync {
    /// Loads a department.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn find_department(&self, id: DepartmentId) -> Result<Option<Department>, StoreError>;

    /// Lists every department ordered by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn list_departments(&self) -> Result<Vec<Department>, StoreError>;
}

/// Append-only record of complaint transitions.
pub trait AuditLog: Send + Sync {
    /// Appends an event and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn record(&self, event: &AuditEvent) -> Result<i64, StoreError>;

    /// Returns the events for one complaint, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn events_for(&self, complaint: ComplaintId) -> Result<Vec<AuditEvent>, StoreError>;
}
