//! Project aggregate store and SQLite implementation.
//!
//! # Responsibility
//! - Own SQL text, positional binding and transaction boundaries for the
//!   project aggregate and its categories, steps and materials.
//! - Map result rows to model entities.
//!
//! # Invariants
//! - Each operation acquires one connection and runs in exactly one
//!   transaction on it; the connection is closed before returning.
//! - Any failure inside a transaction is followed by an explicit rollback
//!   before the error is returned.
//! - Children are attached only by `fetch_project_by_id`, and either all of
//!   them or none.
//! - Absence is a normal outcome here (`Option`/`bool`), never an error.

use super::row::{query_all, FromRow};
use crate::db::schema::first_missing_table;
use crate::db::{ConnectionSource, DbError};
use crate::model::project::{Category, Material, Project, ProjectId, Step};
use log::{debug, error, info, warn};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const INSERT_PROJECT_SQL: &str = "INSERT INTO project \
    (project_name, estimated_hours, actual_hours, difficulty, notes) \
    VALUES (?, ?, ?, ?, ?)";
const FETCH_ALL_PROJECTS_SQL: &str = "SELECT * FROM project ORDER BY project_name";
const FETCH_PROJECT_BY_ID_SQL: &str = "SELECT * FROM project WHERE project_id = ?";
const FETCH_CATEGORIES_SQL: &str = "SELECT c.* FROM category c \
    JOIN project_category pc USING (category_id) \
    WHERE project_id = ?";
const FETCH_STEPS_SQL: &str = "SELECT * FROM step WHERE project_id = ?";
const FETCH_MATERIALS_SQL: &str = "SELECT * FROM material WHERE project_id = ?";
const UPDATE_PROJECT_SQL: &str = "UPDATE project SET \
    project_name = ?, \
    estimated_hours = ?, \
    actual_hours = ?, \
    difficulty = ?, \
    notes = ? \
    WHERE project_id = ?";
const DELETE_PROJECT_SQL: &str = "DELETE FROM project WHERE project_id = ?";

pub type RepoResult<T> = Result<T, RepoError>;

/// Store-level failure for project persistence operations.
#[derive(Debug)]
pub enum RepoError {
    /// Connection, statement or transaction failure.
    Db(DbError),
    /// Update was requested for a project that was never inserted.
    MissingProjectId,
    /// Connected database lacks one of the project relations.
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingProjectId => write!(f, "project has no id; insert it first"),
            Self::MissingRequiredTable(table) => {
                write!(f, "project store requires table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::MissingProjectId => None,
            Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for the project aggregate.
pub trait ProjectRepository {
    /// Inserts the project row and returns the input with its new id.
    fn insert_project(&self, project: Project) -> RepoResult<Project>;
    /// Lists bare projects (no children) ordered by name.
    fn fetch_all_projects(&self) -> RepoResult<Vec<Project>>;
    /// Loads one project with all of its children, or `None`.
    fn fetch_project_by_id(&self, project_id: ProjectId) -> RepoResult<Option<Project>>;
    /// Replaces all scalar fields; `false` when no row has that id.
    fn update_project(&self, project: &Project) -> RepoResult<bool>;
    /// Deletes one project; `false` when no row has that id.
    fn delete_project(&self, project_id: ProjectId) -> RepoResult<bool>;
}

/// SQLite-backed project store.
///
/// Holds only a connection source; every call opens its own connection.
#[derive(Debug, Clone)]
pub struct SqliteProjectRepository<S> {
    source: S,
}

impl<S: ConnectionSource> SqliteProjectRepository<S> {
    /// Constructs a store after checking the project relations exist.
    ///
    /// # Errors
    /// - `RepoError::Db(DbError::Connect { .. })` when no connection can be made.
    /// - `RepoError::MissingRequiredTable` when a relation is absent.
    pub fn try_new(source: S) -> RepoResult<Self> {
        {
            let conn = source.acquire()?;
            if let Some(table) = first_missing_table(&conn)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }
        Ok(Self { source })
    }

    fn acquire(&self) -> RepoResult<Connection> {
        Ok(self.source.acquire()?)
    }
}

impl<S: ConnectionSource> ProjectRepository for SqliteProjectRepository<S> {
    fn insert_project(&self, mut project: Project) -> RepoResult<Project> {
        let mut conn = self.acquire()?;
        let project_id = run_in_transaction(
            &mut conn,
            TransactionBehavior::Immediate,
            "insert_project",
            |tx| {
                tx.execute(
                    INSERT_PROJECT_SQL,
                    params![
                        project.project_name.as_str(),
                        project.estimated_hours,
                        project.actual_hours,
                        project.difficulty,
                        project.notes.as_deref(),
                    ],
                )?;
                Ok(tx.last_insert_rowid())
            },
        )?;

        info!("event=project_insert module=repo status=ok project_id={project_id}");
        project.project_id = Some(project_id);
        Ok(project)
    }

    fn fetch_all_projects(&self) -> RepoResult<Vec<Project>> {
        let mut conn = self.acquire()?;
        let projects = run_in_transaction(
            &mut conn,
            TransactionBehavior::Deferred,
            "fetch_all_projects",
            |tx| Ok(query_all::<Project, _>(tx, FETCH_ALL_PROJECTS_SQL, [])?),
        )?;

        debug!(
            "event=project_list module=repo status=ok count={}",
            projects.len()
        );
        Ok(projects)
    }

    fn fetch_project_by_id(&self, project_id: ProjectId) -> RepoResult<Option<Project>> {
        let mut conn = self.acquire()?;
        run_in_transaction(
            &mut conn,
            TransactionBehavior::Deferred,
            "fetch_project_by_id",
            |tx| {
                let root = tx
                    .query_row(FETCH_PROJECT_BY_ID_SQL, [project_id], |row| {
                        Project::from_row(row)
                    })
                    .optional()?;
                let Some(mut project) = root else {
                    debug!(
                        "event=project_fetch module=repo status=absent project_id={project_id}"
                    );
                    return Ok(None);
                };

                let materials: Vec<Material> =
                    query_all(tx, FETCH_MATERIALS_SQL, [project_id])?;
                let steps: Vec<Step> = query_all(tx, FETCH_STEPS_SQL, [project_id])?;
                let categories: Vec<Category> =
                    query_all(tx, FETCH_CATEGORIES_SQL, [project_id])?;

                project.materials.extend(materials);
                project.steps.extend(steps);
                project.categories.extend(categories);

                debug!(
                    "event=project_fetch module=repo status=ok project_id={project_id} materials={} steps={} categories={}",
                    project.materials.len(),
                    project.steps.len(),
                    project.categories.len()
                );
                Ok(Some(project))
            },
        )
    }

    fn update_project(&self, project: &Project) -> RepoResult<bool> {
        let project_id = project.project_id.ok_or(RepoError::MissingProjectId)?;
        let mut conn = self.acquire()?;
        let changed = run_in_transaction(
            &mut conn,
            TransactionBehavior::Immediate,
            "update_project",
            |tx| {
                Ok(tx.execute(
                    UPDATE_PROJECT_SQL,
                    params![
                        project.project_name.as_str(),
                        project.estimated_hours,
                        project.actual_hours,
                        project.difficulty,
                        project.notes.as_deref(),
                        project_id,
                    ],
                )?)
            },
        )?;

        info!("event=project_update module=repo status=ok project_id={project_id} rows={changed}");
        Ok(changed == 1)
    }

    fn delete_project(&self, project_id: ProjectId) -> RepoResult<bool> {
        let mut conn = self.acquire()?;
        let changed = run_in_transaction(
            &mut conn,
            TransactionBehavior::Immediate,
            "delete_project",
            |tx| Ok(tx.execute(DELETE_PROJECT_SQL, [project_id])?),
        )?;

        info!("event=project_delete module=repo status=ok project_id={project_id} rows={changed}");
        Ok(changed == 1)
    }
}

/// Runs `work` inside one transaction on `conn`.
///
/// Commits on success. On failure rolls back explicitly, then returns the
/// original error unchanged.
fn run_in_transaction<T>(
    conn: &mut Connection,
    behavior: TransactionBehavior,
    op: &'static str,
    work: impl FnOnce(&Transaction<'_>) -> RepoResult<T>,
) -> RepoResult<T> {
    let started_at = Instant::now();
    let tx = conn.transaction_with_behavior(behavior)?;

    match work(&tx) {
        Ok(value) => {
            if let Err(err) = tx.commit() {
                error!(
                    "event=project_tx module=repo op={op} status=error duration_ms={} error_code=commit_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err.into());
            }
            debug!(
                "event=project_tx module=repo op={op} status=commit duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(value)
        }
        Err(err) => {
            match tx.rollback() {
                Ok(()) => warn!(
                    "event=project_tx module=repo op={op} status=rollback duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                ),
                Err(rollback_err) => error!(
                    "event=project_tx module=repo op={op} status=error duration_ms={} error_code=rollback_failed error={} rollback_error={}",
                    started_at.elapsed().as_millis(),
                    err,
                    rollback_err
                ),
            }
            Err(err)
        }
    }
}
