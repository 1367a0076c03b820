// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use nagrik_setu_domain::Staff;

/// A command represents administrative intent against one complaint.
///
/// Commands are the only way to request lifecycle changes. Creation is not a
/// command: complaints enter the system already `Filed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Move the complaint one step along the advancement sequence.
    AdvanceStatus,
    /// Reject the complaint.
    Reject,
    /// Bind a staff member to the complaint.
    AssignStaff {
        /// The staff record as currently stored.
        staff: Staff,
    },
    /// Remove the complaint entirely.
    Delete,
}

impl Command {
    /// Name recorded in the audit trail.
    #[must_use]
    pub const fn action_name(&self) -> &'static str {
        match self {
            Self::AdvanceStatus => "AdvanceStatus",
            Self::Reject => "RejectComplaint",
            Self::AssignStaff { .. } => "AssignStaff",
            Self::Delete => "DeleteComplaint",
        }
    }
}
