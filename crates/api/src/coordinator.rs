// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The complaint lifecycle coordinator.
//!
//! Each operation reads the complaint, asks [`nagrik_setu::apply`] what the
//! transition must do, and commits it with conditional writes. When a
//! conditional write finds the complaint has moved on, the operation reloads
//! and re-validates, up to [`MAX_ATTEMPTS`] times.
//!
//! Staff, audit and notification follow-ups run after the complaint write has
//! committed. Their failures are reported to the caller but never undo the
//! committed transition.

use std::sync::Arc;

use nagrik_setu::{
    AuditLog, Command, ComplaintStore, DepartmentDirectory, NotificationKind, StaffDirectory,
    TransitionResult, UserDirectory, apply,
};
use nagrik_setu_audit::{AuditEvent, Cause};
use nagrik_setu_domain::{Citizen, Complaint, ComplaintId, ComplaintStatus, Staff, StaffId};
use tracing::{debug, info, warn};

use crate::auth::{AuthenticatedActor, AuthorizationGate, AuthorizationService};
use crate::error::{LifecycleError, translate_core_error};
use crate::notification::{ComplaintNotice, NotificationGateway};

/// Number of times a transition is re-validated after losing a race.
pub const MAX_ATTEMPTS: usize = 3;

/// The stores the coordinator reads and writes.
#[derive(Clone)]
pub struct Ports {
    /// Complaint records.
    pub complaints: Arc<dyn ComplaintStore>,
    /// Staff records and their availability flag.
    pub staff: Arc<dyn StaffDirectory>,
    /// Citizen records, used to address notifications.
    pub users: Arc<dyn UserDirectory>,
    /// Department records, used to validate filing.
    pub departments: Arc<dyn DepartmentDirectory>,
    /// Audit trail.
    pub audit: Arc<dyn AuditLog>,
}

impl Ports {
    /// Uses one backing store for every port.
    pub fn from_store<S>(store: S) -> Self
    where
        S: ComplaintStore
            + StaffDirectory
            + UserDirectory
            + DepartmentDirectory
            + AuditLog
            + Clone
            + 'static,
    {
        Self {
            complaints: Arc::new(store.clone()),
            staff: Arc::new(store.clone()),
            users: Arc::new(store.clone()),
            departments: Arc::new(store.clone()),
            audit: Arc::new(store),
        }
    }
}

/// Enforces the complaint state machine and the staff assignment invariant.
#[derive(Clone)]
pub struct LifecycleCoordinator {
    ports: Ports,
    gate: Arc<dyn AuthorizationGate>,
    notifier: Arc<dyn NotificationGateway>,
}

impl LifecycleCoordinator {
    /// Creates a coordinator.
    #[must_use]
    pub fn new(
        ports: Ports,
        gate: Arc<dyn AuthorizationGate>,
        notifier: Arc<dyn NotificationGateway>,
    ) -> Self {
        Self {
            ports,
            gate,
            notifier,
        }
    }

    /// The stores this coordinator operates on.
    #[must_use]
    pub const fn ports(&self) -> &Ports {
        &self.ports
    }

    /// The authorization gate this coordinator consults.
    #[must_use]
    pub fn gate(&self) -> &dyn AuthorizationGate {
        self.gate.as_ref()
    }

    /// Moves a complaint one step along `Filed → Acknowledged → In-Progress → Resolved`.
    ///
    /// Reaching `Resolved` frees the assigned staff member and notifies the
    /// filing citizen.
    ///
    /// # Arguments
    ///
    /// * `complaint_id` - The complaint to advance
    /// * `caller` - The authenticated caller
    /// * `cause` - The cause recorded in the audit trail
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if the caller is not an admin
    /// - `NotFound` if the complaint does not exist
    /// - `InvalidState` if the stored status is corrupt
    /// - `AlreadyTerminal` if the complaint is `Resolved` or `Rejected`
    /// - `ConcurrentModification` if every attempt lost a race
    /// - `ReferenceMissing` / `DependencyFailure` after commit, with
    ///   `committed` set to the new status
    pub fn advance_status(
        &self,
        complaint_id: ComplaintId,
        caller: &AuthenticatedActor,
        cause: Cause,
    ) -> Result<ComplaintStatus, LifecycleError> {
        AuthorizationService::require_admin(self.gate(), caller, "advance_status")?;
        self.transition_status(complaint_id, &Command::AdvanceStatus, caller, &cause)
    }

    /// Rejects a complaint that is not yet terminal.
    ///
    /// The assigned staff member, if any, is freed and the filing citizen is
    /// notified.
    ///
    /// # Errors
    ///
    /// Same as [`Self::advance_status`].
    pub fn reject(
        &self,
        complaint_id: ComplaintId,
        caller: &AuthenticatedActor,
        cause: Cause,
    ) -> Result<ComplaintStatus, LifecycleError> {
        AuthorizationService::require_admin(self.gate(), caller, "reject")?;
        self.transition_status(complaint_id, &Command::Reject, caller, &cause)
    }

    /// Binds a staff member to a complaint.
    ///
    /// The staff member is claimed before the complaint is updated; if the
    /// complaint update loses a race the claim is handed back. A previous,
    /// different assignee is freed.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if the caller is not an admin
    /// - `NotFound` if the complaint or staff member does not exist
    /// - `AlreadyTerminal` if the complaint is `Resolved` or `Rejected`
    /// - `StaffUnavailable` if the staff member already holds an assignment
    /// - `ConcurrentModification` if every attempt lost a race
    pub fn assign_staff(
        &self,
        complaint_id: ComplaintId,
        staff_id: StaffId,
        caller: &AuthenticatedActor,
        cause: Cause,
    ) -> Result<Complaint, LifecycleError> {
        AuthorizationService::require_admin(self.gate(), caller, "assign_staff")?;

        for attempt in 1..=MAX_ATTEMPTS {
            let complaint: Complaint = self.load_complaint(complaint_id)?;
            let staff: Staff = self
                .ports
                .staff
                .find_staff(staff_id)?
                .ok_or_else(|| LifecycleError::not_found("staff", staff_id))?;

            let transition: TransitionResult = apply(
                &complaint,
                Command::AssignStaff { staff },
                caller.to_audit_actor(),
                cause.clone(),
            )
            .map_err(|e| translate_core_error(e, complaint_id))?;

            if !self.ports.staff.try_claim(staff_id)? {
                return Err(LifecycleError::StaffUnavailable { staff_id });
            }

            let assigned: bool = match self.ports.complaints.compare_and_set_assignee(
                complaint_id,
                complaint.status,
                complaint.assigned_to,
                Some(staff_id),
            ) {
                Ok(assigned) => assigned,
                Err(err) => {
                    self.release_claim(staff_id);
                    return Err(err.into());
                }
            };

            if !assigned {
                debug!(
                    complaint_id = %complaint_id,
                    staff_id = %staff_id,
                    attempt,
                    "Complaint changed during assignment, retrying"
                );
                self.release_claim(staff_id);
                continue;
            }

            info!(
                complaint_id = %complaint_id,
                staff_id = %staff_id,
                previous = ?complaint.assigned_to,
                "Staff assigned"
            );

            let mut deferred: Option<LifecycleError> = None;
            if let Some(previous) = transition.staff.release {
                self.release_staff(previous, complaint.status, &mut deferred);
            }
            self.record_audit(&transition.audit_event, complaint.status, &mut deferred);

            if let Some(err) = deferred {
                return Err(err);
            }

            let fallback: Complaint = transition.after.unwrap_or(complaint);
            return Ok(match self.ports.complaints.find_complaint(complaint_id) {
                Ok(Some(current)) => current,
                Ok(None) => fallback,
                Err(err) => {
                    warn!(
                        complaint_id = %complaint_id,
                        error = %err,
                        "Failed to reload complaint after assignment"
                    );
                    fallback
                }
            });
        }

        Err(LifecycleError::ConcurrentModification { complaint_id })
    }

    /// Deletes a complaint.
    ///
    /// A non-terminal complaint's assignee is freed. Deletion is not a
    /// lifecycle transition and is allowed in any status.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if the caller is not an admin
    /// - `NotFound` if the complaint does not exist
    /// - `ConcurrentModification` if every attempt lost a race
    pub fn delete_complaint(
        &self,
        complaint_id: ComplaintId,
        caller: &AuthenticatedActor,
        cause: Cause,
    ) -> Result<(), LifecycleError> {
        AuthorizationService::require_admin(self.gate(), caller, "delete_complaint")?;

        for attempt in 1..=MAX_ATTEMPTS {
            let complaint: Complaint = self.load_complaint(complaint_id)?;
            let transition: TransitionResult = apply(
                &complaint,
                Command::Delete,
                caller.to_audit_actor(),
                cause.clone(),
            )
            .map_err(|e| translate_core_error(e, complaint_id))?;

            if !self.ports.complaints.delete_complaint(
                complaint_id,
                complaint.status,
                complaint.assigned_to,
            )? {
                debug!(complaint_id = %complaint_id, attempt, "Complaint changed before delete, retrying");
                continue;
            }

            info!(complaint_id = %complaint_id, status = %complaint.status, "Complaint deleted");

            let mut deferred: Option<LifecycleError> = None;
            if let Some(staff_id) = transition.staff.release {
                self.release_staff(staff_id, complaint.status, &mut deferred);
            }
            self.record_audit(&transition.audit_event, complaint.status, &mut deferred);

            return deferred.map_or(Ok(()), Err);
        }

        Err(LifecycleError::ConcurrentModification { complaint_id })
    }

    /// Loads a complaint, mapping absence to `NotFound`.
    fn load_complaint(&self, complaint_id: ComplaintId) -> Result<Complaint, LifecycleError> {
        self.ports
            .complaints
            .find_complaint(complaint_id)?
            .ok_or_else(|| LifecycleError::not_found("complaint", complaint_id))
    }

    /// Shared body of advance and reject.
    fn transition_status(
        &self,
        complaint_id: ComplaintId,
        command: &Command,
        caller: &AuthenticatedActor,
        cause: &Cause,
    ) -> Result<ComplaintStatus, LifecycleError> {
        for attempt in 1..=MAX_ATTEMPTS {
            let complaint: Complaint = self.load_complaint(complaint_id)?;
            let transition: TransitionResult = apply(
                &complaint,
                command.clone(),
                caller.to_audit_actor(),
                cause.clone(),
            )
            .map_err(|e| translate_core_error(e, complaint_id))?;

            let Some(next) = transition.new_status() else {
                return Err(LifecycleError::InvalidState {
                    message: format!("{} produced no status", command.action_name()),
                });
            };

            if !self
                .ports
                .complaints
                .compare_and_set_status(complaint_id, complaint.status, next)?
            {
                debug!(
                    complaint_id = %complaint_id,
                    expected = %complaint.status,
                    attempt,
                    "Status changed concurrently, retrying"
                );
                continue;
            }

            info!(
                complaint_id = %complaint_id,
                from = %complaint.status,
                to = %next,
                "Complaint status changed"
            );

            self.settle(&complaint, &transition, next)?;
            return Ok(next);
        }

        Err(LifecycleError::ConcurrentModification { complaint_id })
    }

    /// Post-commit follow-ups of a status transition.
    ///
    /// Runs every step even if an earlier one failed and reports the first
    /// failure.
    fn settle(
        &self,
        before: &Complaint,
        transition: &TransitionResult,
        committed: ComplaintStatus,
    ) -> Result<(), LifecycleError> {
        let mut deferred: Option<LifecycleError> = None;

        if committed.is_terminal() {
            // An assignment may have landed between our read and our write;
            // once terminal the assignee can no longer change, so re-read it.
            let assignee: Option<StaffId> = match self.ports.complaints.find_complaint(before.id) {
                Ok(Some(current)) => current.assigned_to,
                Ok(None) | Err(_) => transition.staff.release,
            };
            if let Some(staff_id) = assignee {
                self.release_staff(staff_id, committed, &mut deferred);
            }
        }

        self.record_audit(&transition.audit_event, committed, &mut deferred);

        if let Some(kind) = transition.notification {
            let outcome: Result<(), LifecycleError> = self.notify(kind, before, committed);
            if let Err(err) = outcome {
                deferred.get_or_insert(err);
            }
        }

        deferred.map_or(Ok(()), Err)
    }

    /// Frees a staff member after a committed transition.
    ///
    /// A staff member that is already free, or no longer exists, is logged
    /// and otherwise ignored.
    fn release_staff(
        &self,
        staff_id: StaffId,
        committed: ComplaintStatus,
        deferred: &mut Option<LifecycleError>,
    ) {
        match self.ports.staff.release(staff_id) {
            Ok(true) => info!(staff_id = %staff_id, "Staff released"),
            Ok(false) => warn!(
                staff_id = %staff_id,
                "Staff to release was missing or already available"
            ),
            Err(err) => {
                warn!(staff_id = %staff_id, error = %err, "Failed to release staff");
                deferred.get_or_insert(LifecycleError::DependencyFailure {
                    message: format!("releasing staff {staff_id}: {err}"),
                    committed: Some(committed),
                });
            }
        }
    }

    /// Hands back a claim whose complaint update did not go through.
    fn release_claim(&self, staff_id: StaffId) {
        if let Err(err) = self.ports.staff.release(staff_id) {
            warn!(staff_id = %staff_id, error = %err, "Failed to hand back staff claim");
        }
    }

    fn record_audit(
        &self,
        event: &AuditEvent,
        committed: ComplaintStatus,
        deferred: &mut Option<LifecycleError>,
    ) {
        match self.ports.audit.record(event) {
            Ok(event_id) => debug!(
                event_id,
                complaint_id = %event.complaint_id,
                action = %event.action.name,
                "Audit event recorded"
            ),
            Err(err) => {
                warn!(complaint_id = %event.complaint_id, error = %err, "Failed to record audit event");
                deferred.get_or_insert(LifecycleError::DependencyFailure {
                    message: format!("recording audit event: {err}"),
                    committed: Some(committed),
                });
            }
        }
    }

    /// Sends a filing, resolution or rejection message to the filing citizen.
    ///
    /// `committed` is the status already stored when the message is owed;
    /// failures carry it so the caller knows the write stands.
    pub(crate) fn notify(
        &self,
        kind: NotificationKind,
        complaint: &Complaint,
        committed: ComplaintStatus,
    ) -> Result<(), LifecycleError> {
        let citizen: Citizen = self
            .ports
            .users
            .find_citizen(complaint.citizen)
            .map_err(|err| LifecycleError::DependencyFailure {
                message: format!("looking up citizen {}: {err}", complaint.citizen),
                committed: Some(committed),
            })?
            .ok_or_else(|| LifecycleError::ReferenceMissing {
                resource: "citizen",
                id: complaint.citizen.to_string(),
                committed: Some(committed),
            })?;

        let notice: ComplaintNotice = ComplaintNotice {
            recipient_name: citizen.name,
            recipient_email: citizen.email,
            tracking_token: complaint.tracking_token.clone(),
            title: complaint.title.clone(),
        };

        let sent = match kind {
            NotificationKind::Filed => self.notifier.send_filed(&notice),
            NotificationKind::Resolved => self.notifier.send_resolved(&notice),
            NotificationKind::Rejected => self.notifier.send_rejected(&notice),
        };

        sent.map_err(|err| {
            warn!(complaint_id = %complaint.id, error = %err, "Notification not accepted");
            LifecycleError::DependencyFailure {
                message: err.to_string(),
                committed: Some(committed),
            }
        })?;

        info!(
            complaint_id = %complaint.id,
            kind = ?kind,
            "Citizen notification queued"
        );
        Ok(())
    }
}
