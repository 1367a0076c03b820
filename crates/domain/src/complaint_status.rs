// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Complaint status tracking and transition logic.
//!
//! A complaint moves forward one step at a time along
//! `Filed → Acknowledged → In-Progress → Resolved`. `Rejected` sits outside
//! that sequence and is reachable from any non-terminal status through an
//! explicit rejection. `Resolved` and `Rejected` are absorbing.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle status of a complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ComplaintStatus {
    /// Submitted by a citizen, not yet looked at.
    #[default]
    Filed,
    /// Seen by the department.
    Acknowledged,
    /// Work on the complaint has started.
    #[serde(rename = "In-Progress")]
    InProgress,
    /// The issue has been fixed.
    Resolved,
    /// The complaint was turned down.
    Rejected,
}

/// The ordered sequence walked by status advancement.
///
/// `Rejected` is deliberately absent: it is only reachable by rejection.
pub const ADVANCEMENT_SEQUENCE: [ComplaintStatus; 4] = [
    ComplaintStatus::Filed,
    ComplaintStatus::Acknowledged,
    ComplaintStatus::InProgress,
    ComplaintStatus::Resolved,
];

impl ComplaintStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Filed => "Filed",
            Self::Acknowledged => "Acknowledged",
            Self::InProgress => "In-Progress",
            Self::Resolved => "Resolved",
            Self::Rejected => "Rejected",
        }
    }

    /// Parses a status from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidComplaintStatus` if the string is not one
    /// of the five recognized values.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "Filed" => Ok(Self::Filed),
            "Acknowledged" => Ok(Self::Acknowledged),
            "In-Progress" => Ok(Self::InProgress),
            "Resolved" => Ok(Self::Resolved),
            "Rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidComplaintStatus {
                status: s.to_string(),
            }),
        }
    }

    /// Returns true if no further status transition is permitted.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved | Self::Rejected)
    }

    /// Position of this status in [`ADVANCEMENT_SEQUENCE`], if any.
    #[must_use]
    pub fn sequence_index(&self) -> Option<usize> {
        ADVANCEMENT_SEQUENCE.iter().position(|s| s == self)
    }

    /// Computes the status that follows this one when advancing.
    ///
    /// # Errors
    ///
    /// - `ComplaintAlreadyTerminal` if the complaint is `Resolved` or `Rejected`
    /// - `InvalidComplaintStatus` if the status is not part of the advancement
    ///   sequence (unreachable for the current enum, kept for parity with
    ///   persisted data)
    pub fn next(&self) -> Result<Self, DomainError> {
        if self.is_terminal() {
            return Err(DomainError::ComplaintAlreadyTerminal { status: *self });
        }

        let index: usize =
            self.sequence_index()
                .ok_or_else(|| DomainError::InvalidComplaintStatus {
                    status: self.as_str().to_string(),
                })?;

        ADVANCEMENT_SEQUENCE
            .get(index + 1)
            .copied()
            .ok_or(DomainError::ComplaintAlreadyTerminal { status: *self })
    }

    /// Validates that a complaint in this status may be rejected.
    ///
    /// # Errors
    ///
    /// Returns `ComplaintAlreadyTerminal` if the complaint is already
    /// `Resolved` or `Rejected`.
    pub const fn validate_rejection(&self) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::ComplaintAlreadyTerminal { status: *self });
        }
        Ok(())
    }
}

impl std::fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ALL: [ComplaintStatus; 5] = [
        ComplaintStatus::Filed,
        ComplaintStatus::Acknowledged,
        ComplaintStatus::InProgress,
        ComplaintStatus::Resolved,
        ComplaintStatus::Rejected,
    ];

    #[test]
    fn test_status_string_round_trip() {
        for status in ALL {
            let s = status.as_str();
            match ComplaintStatus::parse_str(s) {
                Ok(parsed) => assert_eq!(status, parsed),
                Err(e) => panic!("Failed to parse status string: {s}: {e}"),
            }
        }
    }

    #[test]
    fn test_in_progress_uses_hyphenated_form() {
        assert_eq!(ComplaintStatus::InProgress.as_str(), "In-Progress");
        assert!(ComplaintStatus::from_str("InProgress").is_err());
        assert_eq!(
            serde_json::to_string(&ComplaintStatus::InProgress).unwrap(),
            "\"In-Progress\""
        );
    }

    #[test]
    fn test_invalid_status_string() {
        let result = ComplaintStatus::parse_str("Closed");
        assert_eq!(
            result,
            Err(DomainError::InvalidComplaintStatus {
                status: String::from("Closed")
            })
        );
    }

    #[test]
    fn test_terminal_states() {
        assert!(!ComplaintStatus::Filed.is_terminal());
        assert!(!ComplaintStatus::Acknowledged.is_terminal());
        assert!(!ComplaintStatus::InProgress.is_terminal());
        assert!(ComplaintStatus::Resolved.is_terminal());
        assert!(ComplaintStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_advancement_walks_sequence_in_order() {
        let mut status = ComplaintStatus::Filed;
        let mut visited = vec![status];
        while let Ok(next) = status.next() {
            visited.push(next);
            status = next;
        }
        assert_eq!(visited, ADVANCEMENT_SEQUENCE.to_vec());
    }

    #[test]
    fn test_no_advance_from_terminal_states() {
        for terminal in [ComplaintStatus::Resolved, ComplaintStatus::Rejected] {
            assert_eq!(
                terminal.next(),
                Err(DomainError::ComplaintAlreadyTerminal { status: terminal })
            );
        }
    }

    #[test]
    fn test_rejection_allowed_only_from_non_terminal() {
        assert!(ComplaintStatus::Filed.validate_rejection().is_ok());
        assert!(ComplaintStatus::Acknowledged.validate_rejection().is_ok());
        assert!(ComplaintStatus::InProgress.validate_rejection().is_ok());
        assert!(ComplaintStatus::Resolved.validate_rejection().is_err());
        assert!(ComplaintStatus::Rejected.validate_rejection().is_err());
    }
}
