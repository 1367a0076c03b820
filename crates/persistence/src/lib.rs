// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Nagrik Setu complaint system.
//!
//! This crate stores complaints, the citizen/staff/department directories
//! and the audit log in `SQLite` via Diesel. [`SharedPersistence`] adapts a
//! single connection to the store ports the lifecycle coordinator uses.
//!
//! ## Conditional writes
//!
//! Lifecycle writes never overwrite blindly. Status and assignee updates,
//! staff claims and deletions all filter on the values the caller last
//! read and report whether a row changed. Concurrent writers therefore see
//! `false` instead of clobbering each other.
//!
//! ## Testing
//!
//! Tests use shared in-memory databases, one per test, created through
//! [`Persistence::new_in_memory`].

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
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use diesel::connection::{Connection, TransactionManager};
use nagrik_setu_audit::AuditEvent;
use nagrik_setu_domain::{
    Citizen, CitizenId, Complaint, ComplaintId, ComplaintStatus, Department, DepartmentId,
    NewComplaint, Staff, StaffId, TrackingToken,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

mod backend;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod stores;

#[cfg(test)]
mod tests;

pub use backend::sqlite::MIGRATIONS;
pub use error::PersistenceError;
pub use stores::SharedPersistence;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique shared in-memory database, so tests are
    /// isolated from each other.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ------------------------------------------------------------------
    // Complaints
    // ------------------------------------------------------------------

    /// Retrieves a complaint by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row is corrupt.
    pub fn find_complaint(
        &mut self,
        id: ComplaintId,
    ) -> Result<Option<Complaint>, PersistenceError> {
        queries::find_complaint(&mut self.conn, id.value())
    }

    /// Retrieves a complaint by tracking token.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row is corrupt.
    pub fn find_complaint_by_token(
        &mut self,
        token: &TrackingToken,
    ) -> Result<Option<Complaint>, PersistenceError> {
        queries::find_complaint_by_token(&mut self.conn, token)
    }

    /// Lists all complaints, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or any stored row is corrupt.
    pub fn list_complaints(&mut self) -> Result<Vec<Complaint>, PersistenceError> {
        queries::list_complaints(&mut self.conn)
    }

    /// Lists one citizen's complaints, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or any stored row is corrupt.
    pub fn list_complaints_for_citizen(
        &mut self,
        citizen: CitizenId,
    ) -> Result<Vec<Complaint>, PersistenceError> {
        queries::list_complaints_for_citizen(&mut self.conn, citizen.value())
    }

    /// Inserts a new `Filed` complaint.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ConstraintViolation` if the token is taken
    /// or a reference is missing.
    pub fn insert_complaint(
        &mut self,
        complaint: &NewComplaint,
        token: &TrackingToken,
    ) -> Result<Complaint, PersistenceError> {
        mutations::insert_complaint(&mut self.conn, complaint, token)
    }

    /// Conditionally replaces a complaint's status.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn compare_and_set_status(
        &mut self,
        id: ComplaintId,
        expected: ComplaintStatus,
        next: ComplaintStatus,
    ) -> Result<bool, PersistenceError> {
        mutations::compare_and_set_status(&mut self.conn, id.value(), expected, next)
    }

    /// Conditionally replaces a complaint's assignee.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn compare_and_set_assignee(
        &mut self,
        id: ComplaintId,
        expected_status: ComplaintStatus,
        expected: Option<StaffId>,
        next: Option<StaffId>,
    ) -> Result<bool, PersistenceError> {
        mutations::compare_and_set_assignee(
            &mut self.conn,
            id.value(),
            expected_status,
            expected.map(|s| s.value()),
            next.map(|s| s.value()),
        )
    }

    /// Conditionally deletes a complaint.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_complaint(
        &mut self,
        id: ComplaintId,
        expected_status: ComplaintStatus,
        expected_assignee: Option<StaffId>,
    ) -> Result<bool, PersistenceError> {
        mutations::delete_complaint(
            &mut self.conn,
            id.value(),
            expected_status,
            expected_assignee.map(|s| s.value()),
        )
    }

    // ------------------------------------------------------------------
    // Directory
    // ------------------------------------------------------------------

    /// Creates a department.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken or the insert fails.
    pub fn create_department(
        &mut self,
        name: &str,
        description: &str,
    ) -> Result<DepartmentId, PersistenceError> {
        mutations::insert_department(&mut self.conn, name, description).map(DepartmentId::new)
    }

    /// Creates a citizen.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is taken or the insert fails.
    pub fn create_citizen(&mut self, name: &str, email: &str) -> Result<CitizenId, PersistenceError> {
        mutations::insert_citizen(&mut self.conn, name, email).map(CitizenId::new)
    }

    /// Creates an available staff member.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is taken, the department is missing,
    /// or the insert fails.
    pub fn create_staff(
        &mut self,
        name: &str,
        email: &str,
        department: DepartmentId,
    ) -> Result<StaffId, PersistenceError> {
        mutations::insert_staff(&mut self.conn, name, email, department.value()).map(StaffId::new)
    }

    /// Retrieves a staff member.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_staff(&mut self, id: StaffId) -> Result<Option<Staff>, PersistenceError> {
        queries::find_staff(&mut self.conn, id.value())
    }

    /// Lists all staff members.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_staff(&mut self) -> Result<Vec<Staff>, PersistenceError> {
        queries::list_staff(&mut self.conn)
    }

    /// Marks an available staff member active.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn try_claim_staff(&mut self, id: StaffId) -> Result<bool, PersistenceError> {
        mutations::try_claim_staff(&mut self.conn, id.value())
    }

    /// Marks an active staff member available again.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn release_staff(&mut self, id: StaffId) -> Result<bool, PersistenceError> {
        mutations::release_staff(&mut self.conn, id.value())
    }

    /// Retrieves a citizen.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_citizen(&mut self, id: CitizenId) -> Result<Option<Citizen>, PersistenceError> {
        queries::find_citizen(&mut self.conn, id.value())
    }

    /// Retrieves a department.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_department(
        &mut self,
        id: DepartmentId,
    ) -> Result<Option<Department>, PersistenceError> {
        queries::find_department(&mut self.conn, id.value())
    }

    /// Lists all departments.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_departments(&mut self) -> Result<Vec<Department>, PersistenceError> {
        queries::list_departments(&mut self.conn)
    }

    // ------------------------------------------------------------------
    // Transactions
    // ------------------------------------------------------------------

    /// Runs `f` inside a single transaction.
    ///
    /// Everything `f` writes is committed together when it returns `Ok`
    /// and rolled back when it returns `Err`. Writes that open their own
    /// transaction become savepoints of this one.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns, or a database error if the
    /// transaction cannot be opened or committed.
    pub fn transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<PersistenceError>,
    {
        type Manager = <SqliteConnection as Connection>::TransactionManager;

        Manager::begin_transaction(&mut self.conn).map_err(PersistenceError::from)?;
        match f(self) {
            Ok(value) => {
                Manager::commit_transaction(&mut self.conn).map_err(PersistenceError::from)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback) = Manager::rollback_transaction(&mut self.conn) {
                    warn!(error = %rollback, "Failed to roll back transaction");
                }
                Err(err)
            }
        }
    }

    // ------------------------------------------------------------------
    // Audit
    // ------------------------------------------------------------------

    /// Persists an audit event and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence or serialization fails.
    pub fn persist_audit_event(&mut self, event: &AuditEvent) -> Result<i64, PersistenceError> {
        mutations::persist_audit_event(&mut self.conn, event)
    }

    /// Retrieves the audit timeline for a complaint, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if events cannot be retrieved or deserialized.
    pub fn get_audit_timeline(
        &mut self,
        complaint: ComplaintId,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::get_audit_timeline(&mut self.conn, complaint.value())
    }
}
