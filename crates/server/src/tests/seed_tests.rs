// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use nagrik_setu_domain::{CitizenId, Staff};
use nagrik_setu_persistence::Persistence;

use super::test_seed;
use crate::seed::{DirectorySeed, SeedError, SeedStaff, SeedSummary};

#[test]
fn test_seed_parses_from_json() {
    let seed: DirectorySeed = serde_json::from_str(
        r#"{
            "departments": [{ "name": "Water" }],
            "staff": [{ "name": "Meena", "email": "meena@city.example", "department": "Water" }]
        }"#,
    )
    .unwrap();

    assert_eq!(seed.departments.len(), 1);
    assert!(seed.departments[0].description.is_empty());
    assert!(seed.citizens.is_empty());
    assert_eq!(seed.staff[0].department, "Water");
}

#[test]
fn test_seed_creates_directory_records() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    let summary: SeedSummary = test_seed().apply(&mut persistence).unwrap();

    assert_eq!(
        summary,
        SeedSummary {
            departments: 1,
            citizens: 2,
            staff: 1
        }
    );
    let staff: Vec<Staff> = persistence.list_staff().unwrap();
    assert_eq!(staff.len(), 1);
    assert!(!staff[0].is_active);
    let citizen = persistence.find_citizen(CitizenId::new(2)).unwrap().unwrap();
    assert_eq!(citizen.email, "ravi@example.org");
}

#[test]
fn test_staff_with_unknown_department_writes_nothing() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let mut seed: DirectorySeed = test_seed();
    seed.staff.push(SeedStaff {
        name: String::from("Nobody"),
        email: String::from("nobody@city.example"),
        department: String::from("Parks"),
    });

    let err: SeedError = seed.apply(&mut persistence).unwrap_err();

    assert!(matches!(err, SeedError::UnknownDepartment { ref department, .. } if department == "Parks"));
    assert!(persistence.list_staff().unwrap().is_empty());
    assert!(persistence.find_citizen(CitizenId::new(1)).unwrap().is_none());
}

#[test]
fn test_failed_seed_leaves_no_rows() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let mut seed: DirectorySeed = test_seed();
    seed.citizens[1].email = seed.citizens[0].email.clone();

    let err: SeedError = seed.apply(&mut persistence).unwrap_err();

    assert!(matches!(err, SeedError::Persistence(_)));
    assert!(persistence.list_departments().unwrap().is_empty());
    assert!(persistence.find_citizen(CitizenId::new(1)).unwrap().is_none());
    assert!(persistence.list_staff().unwrap().is_empty());

    // The same database accepts a corrected seed afterwards.
    let summary: SeedSummary = test_seed().apply(&mut persistence).unwrap();
    assert_eq!(summary.citizens, 2);
    assert_eq!(persistence.list_departments().unwrap().len(), 1);
}

#[test]
fn test_missing_file_is_io_error() {
    let err: SeedError =
        DirectorySeed::load(std::path::Path::new("/nonexistent/seed.json")).unwrap_err();
    assert!(matches!(err, SeedError::Io(_)));
    assert!(err.to_string().starts_with("Failed to read seed file"));
}
