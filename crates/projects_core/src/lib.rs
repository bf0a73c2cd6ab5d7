//! Core data access for the projects planner.
//! This crate owns the project aggregate, its store and the service facade.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{ConnectionSource, DbConfig, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LoggingError};
pub use model::decimal::{Decimal2, DecimalParseError};
pub use model::project::{
    Category, CategoryId, Material, MaterialId, Project, ProjectId, Step, StepId,
};
pub use repo::project_repo::{ProjectRepository, RepoError, RepoResult, SqliteProjectRepository};
pub use service::project_service::{ProjectService, ProjectServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
