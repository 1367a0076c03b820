// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Store port implementations over a shared connection.

use nagrik_setu::{
    AuditLog, ComplaintStore, DepartmentDirectory, StaffDirectory, StoreError, UserDirectory,
};
use nagrik_setu_audit::AuditEvent;
use nagrik_setu_domain::{
    Citizen, CitizenId, Complaint, ComplaintId, ComplaintStatus, Department, DepartmentId,
    NewComplaint, Staff, StaffId, TrackingToken,
};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::Persistence;
use crate::error::PersistenceError;

/// A [`Persistence`] shared between request handlers.
///
/// Each store call takes the lock for the duration of one statement (or one
/// short transaction). No lock is held between the calls that make up a
/// lifecycle transition; conditional writes catch interleaving instead.
#[derive(Clone)]
pub struct SharedPersistence {
    inner: Arc<Mutex<Persistence>>,
}

impl SharedPersistence {
    /// Wraps a persistence adapter for shared use.
    #[must_use]
    pub fn new(persistence: Persistence) -> Self {
        Self {
            inner: Arc::new(Mutex::new(persistence)),
        }
    }

    /// Runs `f` with exclusive access to the underlying adapter.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::LockPoisoned` if a previous holder
    /// panicked, or whatever `f` returns.
    pub fn with<T>(
        &self,
        f: impl FnOnce(&mut Persistence) -> Result<T, PersistenceError>,
    ) -> Result<T, PersistenceError> {
        let mut guard: MutexGuard<'_, Persistence> =
            self.inner.lock().map_err(|_| PersistenceError::LockPoisoned)?;
        f(&mut guard)
    }

    fn store<T>(
        &self,
        f: impl FnOnce(&mut Persistence) -> Result<T, PersistenceError>,
    ) -> Result<T, StoreError> {
        self.with(f).map_err(StoreError::from)
    }
}

impl ComplaintStore for SharedPersistence {
    fn find_complaint(&self, id: ComplaintId) -> Result<Option<Complaint>, StoreError> {
        self.store(|p| p.find_complaint(id))
    }

    fn find_by_token(&self, token: &TrackingToken) -> Result<Option<Complaint>, StoreError> {
        self.store(|p| p.find_complaint_by_token(token))
    }

    fn list_complaints(&self) -> Result<Vec<Complaint>, StoreError> {
        self.store(Persistence::list_complaints)
    }

    fn list_for_citizen(&self, citizen: CitizenId) -> Result<Vec<Complaint>, StoreError> {
        self.store(|p| p.list_complaints_for_citizen(citizen))
    }

    fn insert_complaint(
        &self,
        complaint: &NewComplaint,
        token: &TrackingToken,
    ) -> Result<Complaint, StoreError> {
        self.store(|p| p.insert_complaint(complaint, token))
    }

    fn compare_and_set_status(
        &self,
        id: ComplaintId,
        expected: ComplaintStatus,
        next: ComplaintStatus,
    ) -> Result<bool, StoreError> {
        self.store(|p| p.compare_and_set_status(id, expected, next))
    }

    fn compare_and_set_assignee(
        &self,
        id: ComplaintId,
        expected_status: ComplaintStatus,
        expected: Option<StaffId>,
        next: Option<StaffId>,
    ) -> Result<bool, StoreError> {
        self.store(|p| p.compare_and_set_assignee(id, expected_status, expected, next))
    }

    fn delete_complaint(
        &self,
        id: ComplaintId,
        expected_status: ComplaintStatus,
        expected_assignee: Option<StaffId>,
    ) -> Result<bool, StoreError> {
        self.store(|p| p.delete_complaint(id, expected_status, expected_assignee))
    }
}

impl StaffDirectory for SharedPersistence {
    fn find_staff(&self, id: StaffId) -> Result<Option<Staff>, StoreError> {
        self.store(|p| p.find_staff(id))
    }

    fn try_claim(&self, id: StaffId) -> Result<bool, StoreError> {
        self.store(|p| p.try_claim_staff(id))
    }

    fn release(&self, id: StaffId) -> Result<bool, StoreError> {
        self.store(|p| p.release_staff(id))
    }

    fn list_staff(&self) -> Result<Vec<Staff>, StoreError> {
        self.store(Persistence::list_staff)
    }
}

impl UserDirectory for SharedPersistence {
    fn find_citizen(&self, id: CitizenId) -> Result<Option<Citizen>, StoreError> {
        self.store(|p| p.find_citizen(id))
    }
}

impl DepartmentDirectory for SharedPersistence {
    fn find_department(&self, id: DepartmentId) -> Result<Option<Department>, StoreError> {
        self.store(|p| p.find_department(id))
    }

    fn list_departments(&self) -> Result<Vec<Department>, StoreError> {
        self.store(Persistence::list_departments)
    }
}

impl AuditLog for SharedPersistence {
    fn record(&self, event: &AuditEvent) -> Result<i64, StoreError> {
        self.store(|p| p.persist_audit_event(event))
    }

    fn events_for(&self, complaint: ComplaintId) -> Result<Vec<AuditEvent>, StoreError> {
        self.store(|p| p.get_audit_timeline(complaint))
    }
}
