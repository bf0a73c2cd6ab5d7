//! Row-to-entity mapping for project relations.
//!
//! # Responsibility
//! - Map the current result row to a model entity by column name.
//! - Drain a parameterized query into a vector of entities.
//!
//! # Invariants
//! - Mapping reads columns by name, so `SELECT *` column order is irrelevant.
//! - Mapped projects never carry children; callers attach them explicitly.

use crate::model::project::{Category, Material, Project, Step};
use rusqlite::{Connection, Params, Row};

/// Builds an entity from the current row of a result cursor.
pub trait FromRow: Sized {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

impl FromRow for Project {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            project_id: Some(row.get("project_id")?),
            project_name: row.get("project_name")?,
            estimated_hours: row.get("estimated_hours")?,
            actual_hours: row.get("actual_hours")?,
            difficulty: row.get("difficulty")?,
            notes: row.get("notes")?,
            materials: Vec::new(),
            steps: Vec::new(),
            categories: Vec::new(),
        })
    }
}

impl FromRow for Category {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            category_id: row.get("category_id")?,
            category_name: row.get("category_name")?,
        })
    }
}

impl FromRow for Step {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            step_id: row.get("step_id")?,
            project_id: row.get("project_id")?,
            step_text: row.get("step_text")?,
            step_order: row.get("step_order")?,
        })
    }
}

impl FromRow for Material {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            material_id: row.get("material_id")?,
            project_id: row.get("project_id")?,
            material_name: row.get("material_name")?,
            num_required: row.get("num_required")?,
            cost: row.get("cost")?,
        })
    }
}

/// Runs `sql` with positional `params` and maps every row to `T`.
///
/// Statement and cursor are released before returning, on every path.
pub fn query_all<T: FromRow, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> rusqlite::Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(T::from_row(row)?);
    }
    Ok(items)
}
