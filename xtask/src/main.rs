// Copyright (C) 2024-2025 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation
//!
//! `cargo xtask ci` runs clippy, the rustfmt check, the build, the test
//! suite and `verify-schema`. The last one applies the embedded `SQLite`
//! migrations to an in-memory database, checks the resulting tables against
//! the columns and foreign keys the persistence layer maps, and checks that
//! the migrations revert cleanly.
//!
//! Only the stable toolchain is needed. `cargo test` on its own needs no
//! infrastructure either.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::collections::{BTreeMap, BTreeSet};
use std::{io, process::Output};

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{eyre::Context, Result};
use diesel::sql_types::{Integer, Text};
use diesel::{QueryableByName, RunQueryDsl, SqliteConnection};
use duct::cmd;
use tracing_log::AsTrace;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.verbosity.log_level_filter().as_trace())
        .without_time()
        .init();

    if let Err(err) = args.command.run() {
        tracing::error!("{err}");
        std::process::exit(1);
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

#[derive(Clone, Copy, Debug, Subcommand)]
enum Command {
    /// Lint, build, test and verify the schema
    CI,

    /// Build every target in the workspace
    #[command(visible_alias = "b")]
    Build,

    /// Run clippy and check formatting
    #[command(visible_alias = "l")]
    Lint,

    /// Apply clippy suggestions and rustfmt
    #[command(visible_alias = "f")]
    Fix,

    /// Run the workspace tests
    #[command(visible_alias = "t")]
    Test,

    /// Verify the migrated `SQLite` schema against the persistence mapping
    #[command(visible_alias = "vs")]
    VerifySchema,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => {
                lint()?;
                cargo(&["build", "--workspace", "--all-targets"])?;
                cargo(&["test", "--workspace"])?;
                verify_schema()
            }
            Self::Build => cargo(&["build", "--workspace", "--all-targets"]),
            Self::Lint => lint(),
            Self::Fix => {
                cargo(&[
                    "clippy",
                    "--workspace",
                    "--all-targets",
                    "--fix",
                    "--allow-dirty",
                    "--allow-staged",
                ])?;
                cargo(&["fmt", "--all"])
            }
            Self::Test => cargo(&["test", "--workspace"]),
            Self::VerifySchema => verify_schema(),
        }
    }
}

/// Clippy with warnings denied, then the rustfmt check
fn lint() -> Result<()> {
    cargo(&["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])?;
    cargo(&["fmt", "--all", "--check"])
}

/// Run a cargo subcommand, logging it first
fn cargo(args: &[&str]) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// Columns and foreign keys the persistence layer maps, per table.
///
/// Keep in step with `crates/persistence/src/diesel_schema.rs`.
const EXPECTED_TABLES: &[(&str, &[&str], &[(&str, &str)])] = &[
    ("departments", &["department_id", "name", "description"], &[]),
    ("citizens", &["citizen_id", "name", "email"], &[]),
    (
        "staff",
        &["staff_id", "name", "email", "department_id", "is_active"],
        &[("department_id", "departments")],
    ),
    (
        "complaints",
        &[
            "complaint_id",
            "citizen_id",
            "department_id",
            "title",
            "description",
            "image_url",
            "longitude",
            "latitude",
            "status",
            "assigned_to",
            "tracking_token",
            "created_at",
            "updated_at",
        ],
        &[
            ("citizen_id", "citizens"),
            ("department_id", "departments"),
            ("assigned_to", "staff"),
        ],
    ),
    (
        "audit_events",
        &[
            "event_id",
            "complaint_id",
            "actor_json",
            "cause_json",
            "action_json",
            "before_snapshot_json",
            "after_snapshot_json",
            "created_at",
        ],
        &[],
    ),
];

/// Verify the migrated `SQLite` schema
///
/// 1. Applies every migration to a fresh in-memory database
/// 2. Introspects the result and compares it with [`EXPECTED_TABLES`]
/// 3. Reverts every migration and checks that no table is left behind
/// 4. Re-applies the migrations to prove they are repeatable
fn verify_schema() -> Result<()> {
    use diesel::Connection;
    use diesel_migrations::{embed_migrations, MigrationHarness};

    #[allow(clippy::items_after_statements)]
    const MIGRATIONS: diesel_migrations::EmbeddedMigrations =
        embed_migrations!("../crates/persistence/migrations");

    tracing::info!("Starting schema verification");

    let mut conn = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;

    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .wrap_err("Failed to enable foreign keys on SQLite")?;

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to apply SQLite migrations: {}", e))?;
    tracing::info!("SQLite migrations applied successfully");

    let schema = introspect_sqlite_schema(&mut conn)?;
    compare_with_expected(&schema)?;

    conn.revert_all_migrations(MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to revert SQLite migrations: {}", e))?;
    let leftover = introspect_sqlite_schema(&mut conn)?;
    if !leftover.tables.is_empty() {
        return Err(color_eyre::eyre::eyre!(
            "Tables left behind after reverting migrations: {:?}",
            leftover.tables.keys().collect::<Vec<_>>()
        ));
    }
    tracing::info!("SQLite migrations reverted cleanly");

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to re-apply SQLite migrations: {}", e))?;

    tracing::info!("✓ Schema verification passed");
    Ok(())
}

/// Normalized schema representation
#[derive(Debug, Clone, PartialEq, Eq)]
struct Schema {
    tables: BTreeMap<String, Table>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Table {
    columns: BTreeMap<String, Column>,
    primary_keys: BTreeSet<String>,
    foreign_keys: BTreeSet<ForeignKey>,
    unique_constraints: BTreeSet<UniqueConstraint>,
    indexes: BTreeSet<Index>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Column {
    name: String,
    normalized_type: String,
    nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ForeignKey {
    from_column: String,
    to_table: String,
    to_column: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct UniqueConstraint {
    columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Index {
    name: String,
    columns: Vec<String>,
}

/// Introspect `SQLite` schema
#[allow(clippy::too_many_lines)]
fn introspect_sqlite_schema(conn: &mut SqliteConnection) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Integer)]
        #[allow(dead_code)]
        cid: i32,
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        r#type: String,
        #[diesel(sql_type = Integer)]
        notnull: i32,
        #[diesel(sql_type = Integer)]
        pk: i32,
    }

    #[derive(QueryableByName)]
    struct ForeignKeyInfo {
        #[diesel(sql_type = Text)]
        table: String,
        #[diesel(sql_type = Text)]
        from: String,
        #[diesel(sql_type = Text)]
        to: String,
    }

    #[derive(QueryableByName)]
    struct IndexInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Integer)]
        #[allow(dead_code)]
        unique: i32,
        #[diesel(sql_type = Text)]
        origin: String,
    }

    #[derive(QueryableByName)]
    struct IndexColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
    }

    let mut schema = Schema {
        tables: BTreeMap::new(),
    };

    // Get all tables
    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' ORDER BY name"
    )
    .load(conn)
    .wrap_err("Failed to query SQLite tables")?;

    for table in tables {
        let mut table_info = Table {
            columns: BTreeMap::new(),
            primary_keys: BTreeSet::new(),
            foreign_keys: BTreeSet::new(),
            unique_constraints: BTreeSet::new(),
            indexes: BTreeSet::new(),
        };

        // Get columns
        let columns: Vec<ColumnInfo> =
            diesel::sql_query(format!("PRAGMA table_info({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get columns for table {}", table.name))?;

        for col in columns {
            let normalized_type = normalize_sqlite_type(&col.r#type);
            table_info.columns.insert(
                col.name.clone(),
                Column {
                    name: col.name.clone(),
                    normalized_type,
                    nullable: col.notnull == 0,
                },
            );

            if col.pk > 0 {
                table_info.primary_keys.insert(col.name);
            }
        }

        // Get foreign keys
        let fks: Vec<ForeignKeyInfo> =
            diesel::sql_query(format!("PRAGMA foreign_key_list({})", table.name))
                .load(conn)
                .wrap_err(format!(
                    "Failed to get foreign keys for table {}",
                    table.name
                ))?;

        for fk in fks {
            table_info.foreign_keys.insert(ForeignKey {
                from_column: fk.from,
                to_table: fk.table,
                to_column: fk.to,
            });
        }

        // Get indexes and unique constraints
        let indexes: Vec<IndexInfo> =
            diesel::sql_query(format!("PRAGMA index_list({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get indexes for table {}", table.name))?;

        for idx in indexes {
            let index_columns: Vec<IndexColumnInfo> =
                diesel::sql_query(format!("PRAGMA index_info({})", idx.name))
                    .load(conn)
                    .wrap_err(format!("Failed to get index columns for {}", idx.name))?;

            let column_names: Vec<String> = index_columns.into_iter().map(|c| c.name).collect();

            // If origin is 'u', it's a unique constraint (including sqlite_autoindex_*)
            if idx.origin == "u" {
                table_info.unique_constraints.insert(UniqueConstraint {
                    columns: column_names,
                });
            } else if !idx.name.starts_with("sqlite_autoindex_") {
                // Regular index (skip auto-generated indexes that aren't unique constraints)
                table_info.indexes.insert(Index {
                    name: idx.name,
                    columns: column_names,
                });
            }
        }

        schema.tables.insert(table.name, table_info);
    }

    Ok(schema)
}

/// Normalize `SQLite` type to common representation
fn normalize_sqlite_type(sqlite_type: &str) -> String {
    let normalized = sqlite_type.to_uppercase();
    if normalized.contains("INT") {
        "integer".to_string()
    } else if normalized.contains("TEXT")
        || normalized.contains("CHAR")
        || normalized.contains("CLOB")
    {
        "text".to_string()
    } else if normalized.contains("REAL")
        || normalized.contains("FLOA")
        || normalized.contains("DOUB")
    {
        "real".to_string()
    } else if normalized.contains("BLOB") {
        "blob".to_string()
    } else {
        "text".to_string() // Default for SQLite
    }
}

/// Compare an introspected schema with [`EXPECTED_TABLES`]
fn compare_with_expected(schema: &Schema) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    let expected_names: BTreeSet<&str> = EXPECTED_TABLES.iter().map(|(name, _, _)| *name).collect();
    for actual in schema.tables.keys() {
        if !expected_names.contains(actual.as_str()) {
            errors.push(format!("Unexpected table '{actual}'"));
        }
    }

    for (name, columns, foreign_keys) in EXPECTED_TABLES {
        let Some(table) = schema.tables.get(*name) else {
            errors.push(format!("Missing table '{name}'"));
            continue;
        };

        let actual_columns: BTreeSet<&str> = table.columns.keys().map(String::as_str).collect();
        let expected_columns: BTreeSet<&str> = columns.iter().copied().collect();
        for missing in expected_columns.difference(&actual_columns) {
            errors.push(format!("Table '{name}' is missing column '{missing}'"));
        }
        for extra in actual_columns.difference(&expected_columns) {
            errors.push(format!("Table '{name}' has unmapped column '{extra}'"));
        }

        if table.primary_keys.len() != 1 {
            errors.push(format!(
                "Table '{name}' should have a single-column primary key, found {:?}",
                table.primary_keys
            ));
        }

        for (from_column, to_table) in *foreign_keys {
            let found = table
                .foreign_keys
                .iter()
                .any(|fk| fk.from_column == *from_column && fk.to_table == *to_table);
            if !found {
                errors.push(format!(
                    "Table '{name}' is missing foreign key {from_column} -> {to_table}"
                ));
            }
        }
        if table.foreign_keys.len() != foreign_keys.len() {
            errors.push(format!(
                "Table '{name}' has {} foreign keys, expected {}",
                table.foreign_keys.len(),
                foreign_keys.len()
            ));
        }

        for column in table.columns.values() {
            tracing::debug!(
                "{name}.{} {} {}",
                column.name,
                column.normalized_type,
                if column.nullable { "NULL" } else { "NOT NULL" }
            );
        }
        for fk in &table.foreign_keys {
            tracing::debug!(
                "{name}.{} references {}.{}",
                fk.from_column,
                fk.to_table,
                fk.to_column
            );
        }
        for index in &table.indexes {
            tracing::debug!("{name} index {} on {:?}", index.name, index.columns);
        }
        for unique in &table.unique_constraints {
            tracing::debug!("{name} unique on {:?}", unique.columns);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        for error in &errors {
            tracing::error!("{error}");
        }
        Err(color_eyre::eyre::eyre!(
            "Schema verification failed with {} error(s)",
            errors.len()
        ))
    }
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before running it.
trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command that was run may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
