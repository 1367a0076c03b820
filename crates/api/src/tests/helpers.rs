// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use nagrik_setu::{AuditLog, ComplaintStore, StaffDirectory, StoreError, UserDirectory};
use nagrik_setu_audit::{AuditEvent, Cause};
use nagrik_setu_domain::{
    Citizen, CitizenId, Complaint, ComplaintId, ComplaintStatus, DepartmentId, NewComplaint,
    Staff, StaffId, TrackingToken,
};
use nagrik_setu_persistence::{Persistence, SharedPersistence};

use crate::auth::{AuthenticatedActor, Role, RoleGate};
use crate::coordinator::{LifecycleCoordinator, Ports};
use crate::handlers::file_complaint;
use crate::notification::{ComplaintNotice, NotificationError, NotificationGateway};
use crate::request_response::{FileComplaintRequest, FileComplaintResponse};

/// Which message a notice was sent as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sent {
    Filed,
    Resolved,
    Rejected,
}

/// Gateway that records every notice, or refuses them all.
#[derive(Default)]
pub struct RecordingGateway {
    pub sent: Mutex<Vec<(Sent, ComplaintNotice)>>,
    pub refuse: bool,
}

impl RecordingGateway {
    pub fn refusing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            refuse: true,
        }
    }

    fn push(&self, kind: Sent, notice: &ComplaintNotice) -> Result<(), NotificationError> {
        if self.refuse {
            return Err(NotificationError::QueueFull);
        }
        self.sent.lock().unwrap().push((kind, notice.clone()));
        Ok(())
    }
}

impl NotificationGateway for RecordingGateway {
    fn send_filed(&self, notice: &ComplaintNotice) -> Result<(), NotificationError> {
        self.push(Sent::Filed, notice)
    }

    fn send_resolved(&self, notice: &ComplaintNotice) -> Result<(), NotificationError> {
        self.push(Sent::Resolved, notice)
    }

    fn send_rejected(&self, notice: &ComplaintNotice) -> Result<(), NotificationError> {
        self.push(Sent::Rejected, notice)
    }
}

/// How [`ScriptedComplaints`] deviates from the store it wraps.
pub enum Script {
    /// Every read reports a corrupt status.
    CorruptReads,
    /// Every status write loses its race.
    StaleStatusWrites,
    /// Every assignee write loses its race.
    StaleAssigneeWrites,
    /// Right before the first status write, another caller assigns `staff`.
    AssignBeforeStatusWrite { staff: StaffId, fired: AtomicBool },
    /// Reads fail once an assignee write has gone through.
    UnreadableAfterAssign { assigned: AtomicBool },
}

/// Complaint store that misbehaves according to a [`Script`].
pub struct ScriptedComplaints {
    pub inner: SharedPersistence,
    pub script: Script,
}

impl ComplaintStore for ScriptedComplaints {
    fn find_complaint(&self, id: ComplaintId) -> Result<Option<Complaint>, StoreError> {
        if matches!(self.script, Script::CorruptReads) {
            return Err(StoreError::CorruptRecord {
                entity: "complaint",
                id: id.value(),
                reason: String::from("Invalid complaint status: 'Closed'"),
            });
        }
        if matches!(
            &self.script,
            Script::UnreadableAfterAssign { assigned } if assigned.load(Ordering::SeqCst)
        ) {
            return Err(StoreError::Unavailable(String::from("replica lagging")));
        }
        self.inner.find_complaint(id)
    }

    fn find_by_token(&self, token: &TrackingToken) -> Result<Option<Complaint>, StoreError> {
        self.inner.find_by_token(token)
    }

    fn list_complaints(&self) -> Result<Vec<Complaint>, StoreError> {
        self.inner.list_complaints()
    }

    fn list_for_citizen(&self, citizen: CitizenId) -> Result<Vec<Complaint>, StoreError> {
        self.inner.list_for_citizen(citizen)
    }

    fn insert_complaint(
        &self,
        complaint: &NewComplaint,
        token: &TrackingToken,
    ) -> Result<Complaint, StoreError> {
        self.inner.insert_complaint(complaint, token)
    }

    fn compare_and_set_status(
        &self,
        id: ComplaintId,
        expected: ComplaintStatus,
        next: ComplaintStatus,
    ) -> Result<bool, StoreError> {
        match &self.script {
            Script::StaleStatusWrites => return Ok(false),
            Script::AssignBeforeStatusWrite { staff, fired } => {
                if !fired.swap(true, Ordering::SeqCst) {
                    assert!(self.inner.try_claim(*staff)?);
                    assert!(
                        self.inner
                            .compare_and_set_assignee(id, expected, None, Some(*staff))?
                    );
                }
            }
            Script::CorruptReads
            | Script::StaleAssigneeWrites
            | Script::UnreadableAfterAssign { .. } => {}
        }
        self.inner.compare_and_set_status(id, expected, next)
    }

    fn compare_and_set_assignee(
        &self,
        id: ComplaintId,
        expected_status: ComplaintStatus,
        expected: Option<StaffId>,
        next: Option<StaffId>,
    ) -> Result<bool, StoreError> {
        if matches!(self.script, Script::StaleAssigneeWrites) {
            return Ok(false);
        }
        let written: bool = self
            .inner
            .compare_and_set_assignee(id, expected_status, expected, next)?;
        if let Script::UnreadableAfterAssign { assigned } = &self.script {
            assigned.store(written, Ordering::SeqCst);
        }
        Ok(written)
    }

    fn delete_complaint(
        &self,
        id: ComplaintId,
        expected_status: ComplaintStatus,
        expected_assignee: Option<StaffId>,
    ) -> Result<bool, StoreError> {
        self.inner
            .delete_complaint(id, expected_status, expected_assignee)
    }
}

/// Directory in which no citizen exists.
pub struct NoCitizens;

impl UserDirectory for NoCitizens {
    fn find_citizen(&self, _id: CitizenId) -> Result<Option<Citizen>, StoreError> {
        Ok(None)
    }
}

/// Staff directory whose records disappear before they can be released.
pub struct MissingOnRelease {
    pub inner: SharedPersistence,
}

impl StaffDirectory for MissingOnRelease {
    fn find_staff(&self, id: StaffId) -> Result<Option<Staff>, StoreError> {
        self.inner.find_staff(id)
    }

    fn try_claim(&self, id: StaffId) -> Result<bool, StoreError> {
        self.inner.try_claim(id)
    }

    fn release(&self, _id: StaffId) -> Result<bool, StoreError> {
        Ok(false)
    }

    fn list_staff(&self) -> Result<Vec<Staff>, StoreError> {
        self.inner.list_staff()
    }
}

/// Audit log whose writes always fail.
pub struct FailingAudit;

impl AuditLog for FailingAudit {
    fn record(&self, _event: &AuditEvent) -> Result<i64, StoreError> {
        Err(StoreError::Unavailable(String::from("audit log offline")))
    }

    fn events_for(&self, _complaint: ComplaintId) -> Result<Vec<AuditEvent>, StoreError> {
        Ok(Vec::new())
    }
}

/// A seeded in-memory store with a coordinator over it.
pub struct Fixture {
    pub store: SharedPersistence,
    pub notifier: Arc<RecordingGateway>,
    pub coordinator: LifecycleCoordinator,
    pub department: DepartmentId,
    pub citizen: CitizenId,
    pub staff: StaffId,
    pub other_staff: StaffId,
}

impl Fixture {
    pub fn new() -> Self {
        Self::build(RecordingGateway::default(), |_, _| {})
    }

    /// Builds a fixture, letting `customize` replace ports before the
    /// coordinator is created.
    pub fn build(
        notifier: RecordingGateway,
        customize: impl FnOnce(&SharedPersistence, &mut Ports),
    ) -> Self {
        let store: SharedPersistence = SharedPersistence::new(Persistence::new_in_memory().unwrap());
        let (department, citizen, staff, other_staff) = store
            .with(|p| {
                let department: DepartmentId = p.create_department("Roads", "Potholes")?;
                let citizen: CitizenId = p.create_citizen("Asha Rao", "asha@example.org")?;
                let staff: StaffId = p.create_staff("Vikram", "vikram@city.example", department)?;
                let other: StaffId = p.create_staff("Meena", "meena@city.example", department)?;
                Ok((department, citizen, staff, other))
            })
            .unwrap();

        let mut ports: Ports = Ports::from_store(store.clone());
        customize(&store, &mut ports);

        let notifier: Arc<RecordingGateway> = Arc::new(notifier);
        let coordinator: LifecycleCoordinator =
            LifecycleCoordinator::new(ports, Arc::new(RoleGate), notifier.clone());

        Self {
            store,
            notifier,
            coordinator,
            department,
            citizen,
            staff,
            other_staff,
        }
    }

    pub fn citizen_caller(&self) -> AuthenticatedActor {
        AuthenticatedActor::new(self.citizen.value().to_string(), Role::Citizen)
    }

    pub fn request(&self, title: &str) -> FileComplaintRequest {
        FileComplaintRequest {
            department_id: self.department.value(),
            title: title.to_string(),
            description: String::from("Streetlight out for a week"),
            image_url: None,
            location: Some([77.5946, 12.9716]),
        }
    }

    /// Files a complaint as the seeded citizen.
    pub fn file(&self, title: &str) -> ComplaintId {
        let response: FileComplaintResponse =
            file_complaint(&self.coordinator, &self.request(title), &self.citizen_caller())
                .unwrap();
        ComplaintId::new(response.complaint.complaint_id)
    }

    /// Inserts a complaint straight into the store, skipping filing checks.
    pub fn insert(&self, title: &str) -> ComplaintId {
        let new_complaint: NewComplaint = NewComplaint {
            citizen: self.citizen,
            department: self.department,
            title: title.to_string(),
            description: String::from("Inserted directly"),
            image_url: None,
            location: None,
        };
        self.store
            .insert_complaint(&new_complaint, &TrackingToken::generate())
            .unwrap()
            .id
    }

    pub fn complaint(&self, id: ComplaintId) -> Complaint {
        self.store.find_complaint(id).unwrap().unwrap()
    }

    pub fn staff_record(&self, id: StaffId) -> Staff {
        self.store.find_staff(id).unwrap().unwrap()
    }

    /// Resolution and rejection notices sent so far.
    pub fn sent(&self) -> Vec<(Sent, ComplaintNotice)> {
        self.notifier
            .sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(kind, _)| *kind != Sent::Filed)
            .cloned()
            .collect()
    }

    /// Filing confirmations sent so far.
    pub fn confirmations(&self) -> Vec<ComplaintNotice> {
        self.notifier
            .sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(kind, _)| *kind == Sent::Filed)
            .map(|(_, notice)| notice.clone())
            .collect()
    }

    pub fn events(&self, id: ComplaintId) -> Vec<AuditEvent> {
        self.store.events_for(id).unwrap()
    }
}

pub fn admin() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("admin-1"), Role::Admin)
}

pub fn staff_caller() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("staff-1"), Role::Staff)
}

pub fn cause() -> Cause {
    Cause::new(String::from("req-1"), String::from("Test request"))
}
