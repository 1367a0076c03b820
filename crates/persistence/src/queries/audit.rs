// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use nagrik_setu_audit::AuditEvent;
use nagrik_setu_domain::ComplaintId;

use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_events)]
struct TimelineRow {
    event_id: i64,
    complaint_id: i64,
    actor_json: String,
    cause_json: String,
    action_json: String,
    before_snapshot_json: String,
    after_snapshot_json: String,
}

impl TryFrom<TimelineRow> for AuditEvent {
    type Error = PersistenceError;

    fn try_from(row: TimelineRow) -> Result<Self, Self::Error> {
        let event: Self = Self::new(
            ComplaintId::new(row.complaint_id),
            serde_json::from_str(&row.actor_json)?,
            serde_json::from_str(&row.cause_json)?,
            serde_json::from_str(&row.action_json)?,
            serde_json::from_str(&row.before_snapshot_json)?,
            serde_json::from_str(&row.after_snapshot_json)?,
        );
        Ok(event.with_event_id(row.event_id))
    }
}

/// Retrieves the audit timeline for one complaint, oldest first.
///
/// Events remain readable after the complaint itself is deleted.
///
/// # Errors
///
/// Returns an error if events cannot be retrieved or deserialized.
pub fn get_audit_timeline(
    conn: &mut SqliteConnection,
    complaint_id: i64,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    audit_events::table
        .filter(audit_events::complaint_id.eq(complaint_id))
        .order(audit_events::event_id.asc())
        .select(TimelineRow::as_select())
        .load::<TimelineRow>(conn)?
        .into_iter()
        .map(AuditEvent::try_from)
        .collect()
}
