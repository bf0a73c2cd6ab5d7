//! Domain model for the project aggregate.
//!
//! # Responsibility
//! - Define the data structures shared by the store, the service and callers.
//! - Provide the fixed-point decimal used for hours and costs.
//!
//! # Invariants
//! - Every persisted entity is identified by a backend-assigned integer.
//! - Deletion is a hard delete that cascades to project children.

pub mod decimal;
pub mod project;
