// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{NotificationKind, StaffEffects, TransitionResult};
use nagrik_setu_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use nagrik_setu_domain::{Complaint, ComplaintStatus, DomainError, Staff};

/// Applies a command to a complaint, producing the transition to commit.
///
/// This function performs no I/O. The returned [`TransitionResult`] names the
/// new complaint state, the staff directory updates and the notification the
/// transition requires, together with its audit event.
///
/// # Arguments
///
/// * `complaint` - The complaint as currently stored (immutable)
/// * `command` - The command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if:
/// - The complaint is already `Resolved` or `Rejected` (advance, reject, assign)
/// - The requested staff member already holds an assignment
pub fn apply(
    complaint: &Complaint,
    command: Command,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    let action_name: &'static str = command.action_name();

    let (after, staff, notification, details): (
        Option<Complaint>,
        StaffEffects,
        Option<NotificationKind>,
        String,
    ) = match command {
        Command::AdvanceStatus => {
            let next: ComplaintStatus = complaint.status.next()?;

            let mut updated: Complaint = complaint.clone();
            updated.status = next;

            // Reaching the end of the sequence frees whoever was working it.
            let (staff, notification) = if next == ComplaintStatus::Resolved {
                (
                    StaffEffects {
                        claim: None,
                        release: complaint.assigned_to,
                    },
                    Some(NotificationKind::Resolved),
                )
            } else {
                (StaffEffects::default(), None)
            };

            let details: String = format!("{} -> {next}", complaint.status);
            (Some(updated), staff, notification, details)
        }
        Command::Reject => {
            complaint.status.validate_rejection()?;

            let mut updated: Complaint = complaint.clone();
            updated.status = ComplaintStatus::Rejected;

            let staff: StaffEffects = StaffEffects {
                claim: None,
                release: complaint.assigned_to,
            };
            let details: String = format!("{} -> {}", complaint.status, ComplaintStatus::Rejected);
            (
                Some(updated),
                staff,
                Some(NotificationKind::Rejected),
                details,
            )
        }
        Command::AssignStaff { staff } => {
            validate_assignment(complaint, &staff)?;

            let mut updated: Complaint = complaint.clone();
            updated.assigned_to = Some(staff.id);

            // A reassignment hands the previous staff member back to the pool.
            let release = complaint.assigned_to.filter(|previous| *previous != staff.id);
            let effects: StaffEffects = StaffEffects {
                claim: Some(staff.id),
                release,
            };
            let details: String = format!("assigned staff {}", staff.id);
            (Some(updated), effects, None, details)
        }
        Command::Delete => {
            // Once terminal, the former assignee was already freed and may be
            // working another complaint.
            let release = if complaint.is_terminal() {
                None
            } else {
                complaint.assigned_to
            };
            let effects: StaffEffects = StaffEffects {
                claim: None,
                release,
            };
            let details: String = format!("deleted while {}", complaint.status);
            (None, effects, None, details)
        }
    };

    let before_snapshot: StateSnapshot = StateSnapshot::of_complaint(complaint);
    let after_snapshot: StateSnapshot = after
        .as_ref()
        .map_or_else(StateSnapshot::deleted, StateSnapshot::of_complaint);

    let audit_event: AuditEvent = AuditEvent::new(
        complaint.id,
        actor,
        cause,
        Action::new(action_name.to_string(), Some(details)),
        before_snapshot,
        after_snapshot,
    );

    Ok(TransitionResult {
        before: complaint.clone(),
        after,
        staff,
        notification,
        audit_event,
    })
}

/// Validates that a staff member may be bound to a complaint.
///
/// # Errors
///
/// Returns an error if:
/// - The complaint is terminal
/// - The staff member is already active
pub fn validate_assignment(complaint: &Complaint, staff: &Staff) -> Result<(), DomainError> {
    if complaint.is_terminal() {
        return Err(DomainError::ComplaintAlreadyTerminal {
            status: complaint.status,
        });
    }

    if !staff.is_available() {
        return Err(DomainError::StaffUnavailable { staff_id: staff.id });
    }

    Ok(())
}
