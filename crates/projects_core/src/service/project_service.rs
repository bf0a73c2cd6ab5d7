//! Project use-case service.
//!
//! # Responsibility
//! - Provide the entity-oriented API used by the CLI.
//! - Escalate store-level absence into `ProjectNotFound`.
//!
//! # Invariants
//! - Store failures are passed through unchanged as `Repo(_)`.
//! - The service holds no state besides its repository.

use crate::model::project::{Project, ProjectId};
use crate::repo::project_repo::{ProjectRepository, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for project use-cases.
#[derive(Debug)]
pub enum ProjectServiceError {
    /// No project row has the requested id.
    ProjectNotFound(ProjectId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ProjectServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProjectNotFound(project_id) => {
                write!(f, "Project with project ID={project_id} does not exist.")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProjectServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::ProjectNotFound(_) => None,
        }
    }
}

impl From<RepoError> for ProjectServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub type ServiceResult<T> = Result<T, ProjectServiceError>;

/// Project service facade over repository implementations.
pub struct ProjectService<R: ProjectRepository> {
    repo: R,
}

impl<R: ProjectRepository> ProjectService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Inserts a new project and returns it with its assigned id.
    pub fn add_project(&self, project: Project) -> ServiceResult<Project> {
        Ok(self.repo.insert_project(project)?)
    }

    /// Lists all projects by name, without children.
    pub fn fetch_all_projects(&self) -> ServiceResult<Vec<Project>> {
        Ok(self.repo.fetch_all_projects()?)
    }

    /// Loads one project with its materials, steps and categories.
    ///
    /// # Errors
    /// - `ProjectNotFound(project_id)` when no such project exists.
    pub fn fetch_project_by_id(&self, project_id: ProjectId) -> ServiceResult<Project> {
        self.repo
            .fetch_project_by_id(project_id)?
            .ok_or(ProjectServiceError::ProjectNotFound(project_id))
    }

    /// Replaces the scalar fields of an existing project.
    ///
    /// # Errors
    /// - `ProjectNotFound(id)` when no row matched the project id.
    /// - `Repo(RepoError::MissingProjectId)` when the project has no id.
    pub fn modify_project_details(&self, project: &Project) -> ServiceResult<()> {
        if self.repo.update_project(project)? {
            return Ok(());
        }
        Err(ProjectServiceError::ProjectNotFound(
            project.project_id.ok_or(RepoError::MissingProjectId)?,
        ))
    }

    /// Deletes one project and, through the schema, its children.
    ///
    /// # Errors
    /// - `ProjectNotFound(project_id)` when no row matched.
    pub fn delete_project(&self, project_id: ProjectId) -> ServiceResult<()> {
        if self.repo.delete_project(project_id)? {
            Ok(())
        } else {
            Err(ProjectServiceError::ProjectNotFound(project_id))
        }
    }
}
