// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use nagrik_setu_audit::AuditEvent;
use nagrik_setu_domain::{Complaint, ComplaintStatus, StaffId};

/// Which message the filing citizen should receive after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// The complaint was just filed.
    Filed,
    /// The complaint reached `Resolved`.
    Resolved,
    /// The complaint was rejected.
    Rejected,
}

/// Staff directory changes a transition requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StaffEffects {
    /// Staff member that must be flipped to active.
    pub claim: Option<StaffId>,
    /// Staff member that must be flipped back to available.
    pub release: Option<StaffId>,
}

/// The result of a successful, not yet committed, transition.
///
/// `apply` is pure: it describes what must be written and sent, and the
/// caller is responsible for committing it against the stores.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionResult {
    /// The complaint as it was read.
    pub before: Complaint,
    /// The complaint after the transition; `None` when it is deleted.
    pub after: Option<Complaint>,
    /// Staff directory updates implied by the transition.
    pub staff: StaffEffects,
    /// Message owed to the filing citizen, if any.
    pub notification: Option<NotificationKind>,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}

impl TransitionResult {
    /// Status after the transition, or `None` for a deletion.
    #[must_use]
    pub fn new_status(&self) -> Option<ComplaintStatus> {
        self.after.as_ref().map(|c| c.status)
    }
}
