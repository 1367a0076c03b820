// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Complaint mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use nagrik_setu_domain::{Complaint, ComplaintStatus, NewComplaint, TrackingToken};
use tracing::debug;

use crate::backend::sqlite::{get_last_insert_rowid, now_rfc3339};
use crate::diesel_schema::complaints;
use crate::error::PersistenceError;
use crate::queries::find_complaint;

/// Inserts a new complaint in status `Filed` with no assignee.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `complaint` - The validated complaint to store
/// * `token` - The tracking token to give it
///
/// # Errors
///
/// Returns `PersistenceError::ConstraintViolation` if the token is already
/// taken or a referenced citizen or department does not exist.
pub fn insert_complaint(
    conn: &mut SqliteConnection,
    complaint: &NewComplaint,
    token: &TrackingToken,
) -> Result<Complaint, PersistenceError> {
    let now: String = now_rfc3339()?;

    conn.transaction(|conn| {
        diesel::insert_into(complaints::table)
            .values((
                complaints::citizen_id.eq(complaint.citizen.value()),
                complaints::department_id.eq(complaint.department.value()),
                complaints::title.eq(&complaint.title),
                complaints::description.eq(&complaint.description),
                complaints::image_url.eq(complaint.image_url.as_deref()),
                complaints::longitude.eq(complaint.location.map(|l| l.longitude)),
                complaints::latitude.eq(complaint.location.map(|l| l.latitude)),
                complaints::status.eq(ComplaintStatus::Filed.as_str()),
                complaints::tracking_token.eq(token.value()),
                complaints::created_at.eq(&now),
                complaints::updated_at.eq(&now),
            ))
            .execute(conn)?;

        let complaint_id: i64 = get_last_insert_rowid(conn)?;
        debug!("Inserted complaint {} with token {}", complaint_id, token);

        find_complaint(conn, complaint_id)?.ok_or_else(|| {
            PersistenceError::NotFound(format!("complaint {complaint_id} after insert"))
        })
    })
}

/// Sets the status if it still equals `expected`.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn compare_and_set_status(
    conn: &mut SqliteConnection,
    complaint_id: i64,
    expected: ComplaintStatus,
    next: ComplaintStatus,
) -> Result<bool, PersistenceError> {
    let now: String = now_rfc3339()?;

    let updated: usize = diesel::update(
        complaints::table
            .filter(complaints::complaint_id.eq(complaint_id))
            .filter(complaints::status.eq(expected.as_str())),
    )
    .set((
        complaints::status.eq(next.as_str()),
        complaints::updated_at.eq(&now),
    ))
    .execute(conn)?;

    debug!(
        "Status CAS on complaint {} ({} -> {}): {} row(s)",
        complaint_id, expected, next, updated
    );
    Ok(updated == 1)
}

/// Sets the assignee if both status and assignee are still as expected.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn compare_and_set_assignee(
    conn: &mut SqliteConnection,
    complaint_id: i64,
    expected_status: ComplaintStatus,
    expected: Option<i64>,
    next: Option<i64>,
) -> Result<bool, PersistenceError> {
    let now: String = now_rfc3339()?;
    let target = complaints::table
        .filter(complaints::complaint_id.eq(complaint_id))
        .filter(complaints::status.eq(expected_status.as_str()));
    let changes = (
        complaints::assigned_to.eq(next),
        complaints::updated_at.eq(&now),
    );

    // NULL never compares equal, so an empty assignee needs its own filter.
    let updated: usize = match expected {
        Some(current) => diesel::update(target.filter(complaints::assigned_to.eq(current)))
            .set(changes)
            .execute(conn)?,
        None => diesel::update(target.filter(complaints::assigned_to.is_null()))
            .set(changes)
            .execute(conn)?,
    };

    debug!(
        "Assignee CAS on complaint {} ({:?} -> {:?}): {} row(s)",
        complaint_id, expected, next, updated
    );
    Ok(updated == 1)
}

/// Deletes a complaint if status and assignee are still as expected.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_complaint(
    conn: &mut SqliteConnection,
    complaint_id: i64,
    expected_status: ComplaintStatus,
    expected_assignee: Option<i64>,
) -> Result<bool, PersistenceError> {
    let target = complaints::table
        .filter(complaints::complaint_id.eq(complaint_id))
        .filter(complaints::status.eq(expected_status.as_str()));

    let deleted: usize = match expected_assignee {
        Some(current) => {
            diesel::delete(target.filter(complaints::assigned_to.eq(current))).execute(conn)?
        }
        None => diesel::delete(target.filter(complaints::assigned_to.is_null())).execute(conn)?,
    };

    debug!("Deleted complaint {}: {} row(s)", complaint_id, deleted);
    Ok(deleted == 1)
}
