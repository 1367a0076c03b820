// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event persistence.
//!
//! Actor, cause, action and both snapshots are stored as JSON text so the
//! timeline can be replayed without joining against live complaint rows.

use diesel::SqliteConnection;
use diesel::prelude::*;
use nagrik_setu_audit::AuditEvent;
use tracing::debug;

use crate::backend::sqlite::{get_last_insert_rowid, now_rfc3339};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Appends an audit event to the timeline of its complaint.
///
/// Any `event_id` already set on `event` is ignored.
///
/// # Returns
///
/// The event ID assigned by the database.
///
/// # Errors
///
/// Returns an error if serialization or the insert fails.
pub fn persist_audit_event(
    conn: &mut SqliteConnection,
    event: &AuditEvent,
) -> Result<i64, PersistenceError> {
    let created_at: String = now_rfc3339()?;

    conn.transaction(|conn| {
        diesel::insert_into(audit_events::table)
            .values((
                audit_events::complaint_id.eq(event.complaint_id.value()),
                audit_events::actor_json.eq(serde_json::to_string(&event.actor)?),
                audit_events::cause_json.eq(serde_json::to_string(&event.cause)?),
                audit_events::action_json.eq(serde_json::to_string(&event.action)?),
                audit_events::before_snapshot_json.eq(serde_json::to_string(&event.before)?),
                audit_events::after_snapshot_json.eq(serde_json::to_string(&event.after)?),
                audit_events::created_at.eq(&created_at),
            ))
            .execute(conn)?;

        let event_id: i64 = get_last_insert_rowid(conn)?;
        debug!(
            event_id,
            complaint_id = %event.complaint_id,
            action = %event.action.name,
            "Recorded audit event"
        );
        Ok(event_id)
    })
}
