// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Caller identity and authorization.
//!
//! Authentication happens outside this crate. By the time a request reaches
//! the coordinator the caller has been resolved into an
//! [`AuthenticatedActor`]; this module only decides what that caller may do.

use nagrik_setu_audit::Actor;
use nagrik_setu_domain::CitizenId;
use std::str::FromStr;

use crate::error::LifecycleError;

/// Caller roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Municipal administrator: drives the complaint lifecycle.
    Admin,
    /// Department staff member.
    Staff,
    /// Member of the public who files complaints.
    Citizen,
}

impl Role {
    /// Returns the lower-case role name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
            Self::Citizen => "citizen",
        }
    }
}

impl FromStr for Role {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "staff" => Ok(Self::Staff),
            "citizen" => Ok(Self::Citizen),
            other => Err(LifecycleError::InvalidInput {
                field: String::from("role"),
                message: format!("unknown role '{other}'"),
            }),
        }
    }
}

/// An authenticated caller with an associated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The role assigned to this actor.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `role` - The role assigned to this actor
    #[must_use]
    pub const fn new(id: String, role: Role) -> Self {
        Self { id, role }
    }

    /// Converts this caller into an audit actor.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(self.id.clone(), self.role.as_str().to_string())
    }

    /// The citizen this caller acts as, if the caller is a citizen.
    #[must_use]
    pub fn citizen_id(&self) -> Option<CitizenId> {
        match self.role {
            Role::Citizen => self.id.parse::<i64>().ok().map(CitizenId::new),
            Role::Admin | Role::Staff => None,
        }
    }
}

/// Capability check consulted before every lifecycle mutation.
pub trait AuthorizationGate: Send + Sync {
    /// Returns true if the caller holds the administrative role.
    fn is_admin(&self, caller: &AuthenticatedActor) -> bool;
}

/// Gate that trusts the caller's resolved role.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleGate;

impl AuthorizationGate for RoleGate {
    fn is_admin(&self, caller: &AuthenticatedActor) -> bool {
        caller.role == Role::Admin
    }
}

/// Authorization checks for the non-lifecycle complaint operations.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that the caller may file a complaint and returns the citizen
    /// it will be filed for.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` unless the caller is a citizen.
    pub fn authorize_file_complaint(
        caller: &AuthenticatedActor,
    ) -> Result<CitizenId, LifecycleError> {
        caller
            .citizen_id()
            .ok_or_else(|| LifecycleError::Unauthorized {
                action: String::from("file_complaint"),
            })
    }

    /// Checks that the caller may read one citizen's complaints.
    ///
    /// Admins may read any citizen's complaints; citizens only their own.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` otherwise.
    pub fn authorize_citizen_view(
        gate: &dyn AuthorizationGate,
        caller: &AuthenticatedActor,
        citizen: CitizenId,
    ) -> Result<(), LifecycleError> {
        if gate.is_admin(caller) || caller.citizen_id() == Some(citizen) {
            return Ok(());
        }
        Err(LifecycleError::Unauthorized {
            action: String::from("list_citizen_complaints"),
        })
    }

    /// Checks that the caller holds the admin role.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` otherwise.
    pub fn require_admin(
        gate: &dyn AuthorizationGate,
        caller: &AuthenticatedActor,
        action: &str,
    ) -> Result<(), LifecycleError> {
        if gate.is_admin(caller) {
            Ok(())
        } else {
            Err(LifecycleError::Unauthorized {
                action: action.to_string(),
            })
        }
    }
}
