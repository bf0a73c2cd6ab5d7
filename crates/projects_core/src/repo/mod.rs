//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the project aggregate store contract.
//! - Isolate SQLite query and transaction details from the service layer.
//!
//! # Invariants
//! - Store APIs report absence as `Option`/`bool`; only transport and
//!   statement failures are errors.

pub mod project_repo;
pub mod row;
