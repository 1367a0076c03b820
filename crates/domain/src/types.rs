// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::complaint_status::ComplaintStatus;
use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// Generates an opaque numeric identifier newtype.
///
/// Identifiers are assigned by the persistence layer and carry no meaning
/// beyond equality.
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw database identifier.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw database identifier.
            #[must_use]
            pub const fn value(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

entity_id!(
    /// Identifier of a complaint.
    ComplaintId
);
entity_id!(
    /// Identifier of a staff member.
    StaffId
);
entity_id!(
    /// Identifier of the citizen who filed a complaint.
    CitizenId
);
entity_id!(
    /// Identifier of a municipal department.
    DepartmentId
);

/// Human-readable tracking code handed to the citizen at filing time.
///
/// Format: `NS-` followed by eight upper-case hexadecimal digits.
/// Immutable once assigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingToken(String);

impl TrackingToken {
    /// Prefix shared by every tracking token.
    pub const PREFIX: &'static str = "NS-";

    /// Generates a fresh random token.
    ///
    /// Uniqueness is enforced by the store; callers retry on collision.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("{}{:08X}", Self::PREFIX, rand::random::<u32>()))
    }

    /// Parses and validates an existing token.
    ///
    /// Lower-case hex digits are normalized to upper case.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTrackingToken` if the value is malformed.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let normalized: String = value.trim().to_uppercase();
        let digits: &str = normalized
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| DomainError::InvalidTrackingToken(value.to_string()))?;

        if digits.len() != 8 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DomainError::InvalidTrackingToken(value.to_string()));
        }

        Ok(Self(normalized))
    }

    /// Returns the token text.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TrackingToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point on the map, stored as `[longitude, latitude]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Longitude in degrees, `-180..=180`.
    pub longitude: f64,
    /// Latitude in degrees, `-90..=90`.
    pub latitude: f64,
}

impl GeoPoint {
    /// Creates a new point without validation.
    #[must_use]
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

/// A civic complaint as persisted.
///
/// Only the lifecycle coordinator changes `status` and `assigned_to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    /// Canonical identifier.
    pub id: ComplaintId,
    /// The citizen who filed the complaint.
    pub citizen: CitizenId,
    /// The department the complaint was routed to.
    pub department: DepartmentId,
    /// Short summary.
    pub title: String,
    /// Full description of the issue.
    pub description: String,
    /// Optional photo of the issue, uploaded elsewhere.
    pub image_url: Option<String>,
    /// Optional location of the issue.
    pub location: Option<GeoPoint>,
    /// Current lifecycle status.
    pub status: ComplaintStatus,
    /// Staff member currently working the complaint.
    pub assigned_to: Option<StaffId>,
    /// Tracking code given to the citizen.
    pub tracking_token: TrackingToken,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Last modification timestamp (RFC 3339).
    pub updated_at: String,
}

impl Complaint {
    /// Returns true if the complaint has reached `Resolved` or `Rejected`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// A complaint that has not been persisted yet.
///
/// Status is always `Filed` and there is no assignee; neither is
/// representable here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewComplaint {
    /// The filing citizen.
    pub citizen: CitizenId,
    /// The target department.
    pub department: DepartmentId,
    /// Short summary.
    pub title: String,
    /// Full description.
    pub description: String,
    /// Optional photo URL.
    pub image_url: Option<String>,
    /// Optional location.
    pub location: Option<GeoPoint>,
}

/// A municipal staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    /// Canonical identifier.
    pub id: StaffId,
    /// Display name.
    pub name: String,
    /// Contact address.
    pub email: String,
    /// Department the staff member belongs to.
    pub department: DepartmentId,
    /// True while the staff member holds an assignment.
    pub is_active: bool,
}

impl Staff {
    /// A staff member can take a new assignment only while inactive.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        !self.is_active
    }
}

/// A citizen who files complaints.
///
/// The lifecycle only needs enough of the account to address a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citizen {
    /// Canonical identifier.
    pub id: CitizenId,
    /// Display name.
    pub name: String,
    /// Notification address.
    pub email: String,
}

/// A municipal department complaints are routed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Canonical identifier.
    pub id: DepartmentId,
    /// Department name, unique.
    pub name: String,
    /// Free-form description.
    pub description: String,
}
