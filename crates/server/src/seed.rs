// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Directory seeding.
//!
//! Departments, citizens and staff are registered elsewhere. For a
//! standalone server they can be loaded from a JSON file at startup:
//!
//! ```json
//! {
//!   "departments": [{ "name": "Roads", "description": "Potholes" }],
//!   "citizens": [{ "name": "Asha Rao", "email": "asha@example.org" }],
//!   "staff": [{ "name": "Vikram", "email": "vikram@city.example", "department": "Roads" }]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use nagrik_setu_domain::DepartmentId;
use nagrik_setu_persistence::{Persistence, PersistenceError};
use serde::Deserialize;
use tracing::info;

/// A department to create.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedDepartment {
    /// Unique department name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

/// A citizen to create.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedCitizen {
    /// Display name.
    pub name: String,
    /// Notification address.
    pub email: String,
}

/// A staff member to create.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedStaff {
    /// Display name.
    pub name: String,
    /// Contact address.
    pub email: String,
    /// Name of a department in the same seed.
    pub department: String,
}

/// Contents of a seed file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectorySeed {
    /// Departments.
    #[serde(default)]
    pub departments: Vec<SeedDepartment>,
    /// Citizens.
    #[serde(default)]
    pub citizens: Vec<SeedCitizen>,
    /// Staff members.
    #[serde(default)]
    pub staff: Vec<SeedStaff>,
}

/// Counts of created records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedSummary {
    /// Departments created.
    pub departments: usize,
    /// Citizens created.
    pub citizens: usize,
    /// Staff members created.
    pub staff: usize,
}

/// Errors raised while seeding.
#[derive(Debug)]
pub enum SeedError {
    /// The file could not be read.
    Io(std::io::Error),
    /// The file is not a valid seed document.
    Parse(serde_json::Error),
    /// A staff member names a department the seed does not define.
    UnknownDepartment {
        /// The staff member.
        staff: String,
        /// The missing department.
        department: String,
    },
    /// A record could not be stored.
    Persistence(PersistenceError),
}

impl std::fmt::Display for SeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "Failed to read seed file: {err}"),
            Self::Parse(err) => write!(f, "Invalid seed file: {err}"),
            Self::UnknownDepartment { staff, department } => {
                write!(f, "Staff '{staff}' references unknown department '{department}'")
            }
            Self::Persistence(err) => write!(f, "Failed to store seed data: {err}"),
        }
    }
}

impl std::error::Error for SeedError {}

impl From<PersistenceError> for SeedError {
    fn from(err: PersistenceError) -> Self {
        Self::Persistence(err)
    }
}

impl DirectorySeed {
    /// Reads a seed file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, SeedError> {
        let text: String = std::fs::read_to_string(path).map_err(SeedError::Io)?;
        serde_json::from_str(&text).map_err(SeedError::Parse)
    }

    /// Creates every record in the seed.
    ///
    /// Staff are checked against the seeded departments before anything is
    /// written. All records are created in one transaction, so a failing
    /// record leaves the directory as it was.
    ///
    /// # Errors
    ///
    /// Returns an error if a staff member names an unknown department or a
    /// record violates a uniqueness constraint.
    pub fn apply(&self, persistence: &mut Persistence) -> Result<SeedSummary, SeedError> {
        if let Some(orphan) = self
            .staff
            .iter()
            .find(|s| !self.departments.iter().any(|d| d.name == s.department))
        {
            return Err(SeedError::UnknownDepartment {
                staff: orphan.name.clone(),
                department: orphan.department.clone(),
            });
        }

        persistence.transaction(|p: &mut Persistence| -> Result<(), SeedError> {
            let mut departments: HashMap<&str, DepartmentId> = HashMap::new();
            for department in &self.departments {
                let id: DepartmentId =
                    p.create_department(&department.name, &department.description)?;
                departments.insert(department.name.as_str(), id);
            }

            for citizen in &self.citizens {
                p.create_citizen(&citizen.name, &citizen.email)?;
            }

            for member in &self.staff {
                let department: DepartmentId = departments
                    .get(member.department.as_str())
                    .copied()
                    .ok_or_else(|| SeedError::UnknownDepartment {
                        staff: member.name.clone(),
                        department: member.department.clone(),
                    })?;
                p.create_staff(&member.name, &member.email, department)?;
            }
            Ok(())
        })?;

        let summary: SeedSummary = SeedSummary {
            departments: self.departments.len(),
            citizens: self.citizens.len(),
            staff: self.staff.len(),
        };
        info!(
            departments = summary.departments,
            citizens = summary.citizens,
            staff = summary.staff,
            "Directory seeded"
        );
        Ok(summary)
    }
}
