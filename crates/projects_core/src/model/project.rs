//! Project aggregate and its child entities.
//!
//! # Responsibility
//! - Define the project aggregate root plus category/step/material children.
//! - Keep storage identities as backend-assigned integers.
//!
//! # Invariants
//! - `project_id` is `None` until the store inserts the project.
//! - Child collections are only populated by single-project lookups.
//! - `difficulty` is expected in `1..=5` but is not enforced here.

use super::decimal::Decimal2;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Backend-assigned project identity.
pub type ProjectId = i64;
pub type CategoryId = i64;
pub type StepId = i64;
pub type MaterialId = i64;

/// Aggregate root for one do-it-yourself project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Assigned by the store on insert; never chosen by callers.
    pub project_id: Option<ProjectId>,
    pub project_name: String,
    pub estimated_hours: Option<Decimal2>,
    pub actual_hours: Option<Decimal2>,
    pub difficulty: Option<i32>,
    pub notes: Option<String>,
    /// Loaded only by fetch-by-id.
    pub materials: Vec<Material>,
    /// Loaded only by fetch-by-id.
    pub steps: Vec<Step>,
    /// Loaded only by fetch-by-id, through the `project_category` link.
    pub categories: Vec<Category>,
}

impl Project {
    /// Creates an unsaved project with the given name and no children.
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            ..Self::default()
        }
    }

    /// Returns whether all child collections are empty.
    pub fn has_no_children(&self) -> bool {
        self.materials.is_empty() && self.steps.is_empty() && self.categories.is_empty()
    }
}

/// Category linked many-to-many with projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: CategoryId,
    pub category_name: String,
}

/// One ordered instruction of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub step_id: StepId,
    pub project_id: ProjectId,
    pub step_text: String,
    pub step_order: i32,
}

/// Material required by a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub material_id: MaterialId,
    pub project_id: ProjectId,
    pub material_name: String,
    pub num_required: Option<i32>,
    pub cost: Option<Decimal2>,
}

impl Display for Project {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.project_id {
            Some(id) => write!(f, "{id}: {}", self.project_name),
            None => write!(f, "(unsaved): {}", self.project_name),
        }
    }
}
