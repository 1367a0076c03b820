// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Citizen, staff and department lookups.

use diesel::prelude::*;
use diesel::SqliteConnection;
use nagrik_setu_domain::{Citizen, CitizenId, Department, DepartmentId, Staff, StaffId};
use tracing::debug;

use crate::diesel_schema::{citizens, departments, staff};
use crate::error::PersistenceError;

/// Diesel Queryable struct for staff rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = staff)]
struct StaffRow {
    staff_id: i64,
    name: String,
    email: String,
    department_id: i64,
    is_active: i32,
}

impl From<StaffRow> for Staff {
    fn from(row: StaffRow) -> Self {
        Self {
            id: StaffId::new(row.staff_id),
            name: row.name,
            email: row.email,
            department: DepartmentId::new(row.department_id),
            is_active: row.is_active != 0,
        }
    }
}

/// Diesel Queryable struct for citizen rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = citizens)]
struct CitizenRow {
    citizen_id: i64,
    name: String,
    email: String,
}

/// Diesel Queryable struct for department rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = departments)]
struct DepartmentRow {
    department_id: i64,
    name: String,
    description: String,
}

impl From<DepartmentRow> for Department {
    fn from(row: DepartmentRow) -> Self {
        Self {
            id: DepartmentId::new(row.department_id),
            name: row.name,
            description: row.description,
        }
    }
}

/// Retrieves a staff member by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the staff member is not found.
pub fn find_staff(
    conn: &mut SqliteConnection,
    staff_id: i64,
) -> Result<Option<Staff>, PersistenceError> {
    debug!("Looking up staff by ID: {}", staff_id);

    let row: Option<StaffRow> = staff::table
        .filter(staff::staff_id.eq(staff_id))
        .select(StaffRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(Staff::from))
}

/// Lists all staff members ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_staff(conn: &mut SqliteConnection) -> Result<Vec<Staff>, PersistenceError> {
    let rows: Vec<StaffRow> = staff::table
        .order(staff::staff_id.asc())
        .select(StaffRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(Staff::from).collect())
}

/// Retrieves a citizen by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the citizen is not found.
pub fn find_citizen(
    conn: &mut SqliteConnection,
    citizen_id: i64,
) -> Result<Option<Citizen>, PersistenceError> {
    debug!("Looking up citizen by ID: {}", citizen_id);

    let row: Option<CitizenRow> = citizens::table
        .filter(citizens::citizen_id.eq(citizen_id))
        .select(CitizenRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(|r| Citizen {
        id: CitizenId::new(r.citizen_id),
        name: r.name,
        email: r.email,
    }))
}

/// Retrieves a department by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the department is not found.
pub fn find_department(
    conn: &mut SqliteConnection,
    department_id: i64,
) -> Result<Option<Department>, PersistenceError> {
    let row: Option<DepartmentRow> = departments::table
        .filter(departments::department_id.eq(department_id))
        .select(DepartmentRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(Department::from))
}

/// Lists all departments ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_departments(conn: &mut SqliteConnection) -> Result<Vec<Department>, PersistenceError> {
    let rows: Vec<DepartmentRow> = departments::table
        .order(departments::department_id.asc())
        .select(DepartmentRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(Department::from).collect())
}
