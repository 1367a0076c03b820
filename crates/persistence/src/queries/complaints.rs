// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Complaint queries.
//!
//! Rows are converted into domain complaints here. A row whose status or
//! tracking token no longer parses is reported as a corrupt record rather
//! than silently coerced.

use diesel::prelude::*;
use diesel::SqliteConnection;
use nagrik_setu_domain::{
    CitizenId, Complaint, ComplaintId, ComplaintStatus, DepartmentId, GeoPoint, StaffId,
    TrackingToken,
};
use tracing::debug;

use crate::diesel_schema::complaints;
use crate::error::PersistenceError;

/// Diesel Queryable struct for complaint rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = complaints)]
pub(crate) struct ComplaintRow {
    complaint_id: i64,
    citizen_id: i64,
    department_id: i64,
    title: String,
    description: String,
    image_url: Option<String>,
    longitude: Option<f64>,
    latitude: Option<f64>,
    status: String,
    assigned_to: Option<i64>,
    tracking_token: String,
    created_at: String,
    updated_at: String,
}

impl ComplaintRow {
    /// Converts the row into a domain complaint.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptRecord` if the status or tracking
    /// token is not recognized.
    pub(crate) fn into_complaint(self) -> Result<Complaint, PersistenceError> {
        let corrupt = |reason: String| PersistenceError::CorruptRecord {
            entity: "complaint",
            id: self.complaint_id,
            reason,
        };

        let status: ComplaintStatus = self
            .status
            .parse()
            .map_err(|e: nagrik_setu_domain::DomainError| corrupt(e.to_string()))?;
        let tracking_token: TrackingToken =
            TrackingToken::parse(&self.tracking_token).map_err(|e| corrupt(e.to_string()))?;

        // A location is only meaningful with both coordinates.
        let location: Option<GeoPoint> = match (self.longitude, self.latitude) {
            (Some(longitude), Some(latitude)) => Some(GeoPoint::new(longitude, latitude)),
            _ => None,
        };

        Ok(Complaint {
            id: ComplaintId::new(self.complaint_id),
            citizen: CitizenId::new(self.citizen_id),
            department: DepartmentId::new(self.department_id),
            title: self.title,
            description: self.description,
            image_url: self.image_url,
            location,
            status,
            assigned_to: self.assigned_to.map(StaffId::new),
            tracking_token,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Retrieves a complaint by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the row is corrupt.
/// Returns `Ok(None)` if the complaint does not exist.
pub fn find_complaint(
    conn: &mut SqliteConnection,
    complaint_id: i64,
) -> Result<Option<Complaint>, PersistenceError> {
    debug!("Looking up complaint by ID: {}", complaint_id);

    let row: Option<ComplaintRow> = complaints::table
        .filter(complaints::complaint_id.eq(complaint_id))
        .select(ComplaintRow::as_select())
        .first(conn)
        .optional()?;

    row.map(ComplaintRow::into_complaint).transpose()
}

/// Retrieves a complaint by its tracking token.
///
/// # Errors
///
/// Returns an error if the query fails or the row is corrupt.
/// Returns `Ok(None)` if no complaint carries the token.
pub fn find_complaint_by_token(
    conn: &mut SqliteConnection,
    token: &TrackingToken,
) -> Result<Option<Complaint>, PersistenceError> {
    debug!("Looking up complaint by tracking token: {}", token);

    let row: Option<ComplaintRow> = complaints::table
        .filter(complaints::tracking_token.eq(token.value()))
        .select(ComplaintRow::as_select())
        .first(conn)
        .optional()?;

    row.map(ComplaintRow::into_complaint).transpose()
}

/// Lists every complaint, newest first.
///
/// Ordered by identifier, which follows insertion order.
///
/// # Errors
///
/// Returns an error if the query fails or any row is corrupt.
pub fn list_complaints(conn: &mut SqliteConnection) -> Result<Vec<Complaint>, PersistenceError> {
    let rows: Vec<ComplaintRow> = complaints::table
        .order(complaints::complaint_id.desc())
        .select(ComplaintRow::as_select())
        .load(conn)?;

    rows.into_iter().map(ComplaintRow::into_complaint).collect()
}

/// Lists the complaints filed by one citizen, newest first.
///
/// # Errors
///
/// Returns an error if the query fails or any row is corrupt.
pub fn list_complaints_for_citizen(
    conn: &mut SqliteConnection,
    citizen_id: i64,
) -> Result<Vec<Complaint>, PersistenceError> {
    let rows: Vec<ComplaintRow> = complaints::table
        .filter(complaints::citizen_id.eq(citizen_id))
        .order(complaints::complaint_id.desc())
        .select(ComplaintRow::as_select())
        .load(conn)?;

    rows.into_iter().map(ComplaintRow::into_complaint).collect()
}
