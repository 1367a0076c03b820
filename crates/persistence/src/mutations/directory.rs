// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Citizen, staff and department mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::{citizens, departments, staff};
use crate::error::PersistenceError;

/// Inserts a department and returns its ID.
///
/// # Errors
///
/// Returns an error if the name is taken or the insert fails.
pub fn insert_department(
    conn: &mut SqliteConnection,
    name: &str,
    description: &str,
) -> Result<i64, PersistenceError> {
    conn.transaction(|conn| {
        diesel::insert_into(departments::table)
            .values((
                departments::name.eq(name),
                departments::description.eq(description),
            ))
            .execute(conn)?;
        get_last_insert_rowid(conn)
    })
}

/// Inserts a citizen and returns its ID.
///
/// # Errors
///
/// Returns an error if the email is taken or the insert fails.
pub fn insert_citizen(
    conn: &mut SqliteConnection,
    name: &str,
    email: &str,
) -> Result<i64, PersistenceError> {
    conn.transaction(|conn| {
        diesel::insert_into(citizens::table)
            .values((citizens::name.eq(name), citizens::email.eq(email)))
            .execute(conn)?;
        get_last_insert_rowid(conn)
    })
}

/// Inserts an available staff member and returns its ID.
///
/// # Errors
///
/// Returns an error if the email is taken, the department does not exist,
/// or the insert fails.
pub fn insert_staff(
    conn: &mut SqliteConnection,
    name: &str,
    email: &str,
    department_id: i64,
) -> Result<i64, PersistenceError> {
    conn.transaction(|conn| {
        diesel::insert_into(staff::table)
            .values((
                staff::name.eq(name),
                staff::email.eq(email),
                staff::department_id.eq(department_id),
                staff::is_active.eq(0),
            ))
            .execute(conn)?;
        get_last_insert_rowid(conn)
    })
}

/// Flips a staff member from available to active.
///
/// Returns `false` if the staff member is already active or does not exist.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn try_claim_staff(conn: &mut SqliteConnection, staff_id: i64) -> Result<bool, PersistenceError> {
    let updated: usize = diesel::update(
        staff::table
            .filter(staff::staff_id.eq(staff_id))
            .filter(staff::is_active.eq(0)),
    )
    .set(staff::is_active.eq(1))
    .execute(conn)?;

    debug!("Claim staff {}: {} row(s)", staff_id, updated);
    Ok(updated == 1)
}

/// Flips a staff member from active back to available.
///
/// Returns `false` if the staff member was not active.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn release_staff(conn: &mut SqliteConnection, staff_id: i64) -> Result<bool, PersistenceError> {
    let updated: usize = diesel::update(
        staff::table
            .filter(staff::staff_id.eq(staff_id))
            .filter(staff::is_active.eq(1)),
    )
    .set(staff::is_active.eq(0))
    .execute(conn)?;

    debug!("Release staff {}: {} row(s)", staff_id, updated);
    Ok(updated == 1)
}
