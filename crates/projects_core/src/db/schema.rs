//! Projects schema bootstrap and presence checks.
//!
//! # Responsibility
//! - Create the five project relations on an empty database.
//! - Report which required relation is missing on a foreign database.
//!
//! # Invariants
//! - `ensure_schema` is idempotent and never alters existing tables.
//! - There is no schema versioning; the schema owner is external.

use super::DbResult;
use log::info;
use rusqlite::Connection;

const PROJECTS_SCHEMA_SQL: &str = include_str!("projects_schema.sql");

/// Relations the project store reads and writes.
pub const REQUIRED_TABLES: [&str; 5] = [
    "project",
    "category",
    "project_category",
    "step",
    "material",
];

/// Creates any missing project relations inside one transaction.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(PROJECTS_SCHEMA_SQL)?;
    tx.commit()?;
    info!("event=schema_ensure module=db status=ok");
    Ok(())
}

/// Returns the first entry of [`REQUIRED_TABLES`] absent from `conn`.
pub fn first_missing_table(conn: &Connection) -> DbResult<Option<&'static str>> {
    for table in REQUIRED_TABLES {
        if !table_exists(conn, table)? {
            return Ok(Some(table));
        }
    }
    Ok(None)
}

fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
