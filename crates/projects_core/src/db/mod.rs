//! SQLite connection bootstrap and schema checks.
//!
//! # Responsibility
//! - Describe where the projects database lives (`DbConfig`).
//! - Hand out one fresh connection per unit of work (`ConnectionSource`).
//! - Provide an idempotent schema bootstrap for fresh databases.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON` so project deletes cascade.
//! - Schema bootstrap never alters existing tables.

use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod config;
mod open;
pub mod schema;

pub use config::DbConfig;
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// The database could not be opened at all.
    Connect {
        path: PathBuf,
        source: rusqlite::Error,
    },
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connect { path, source } => {
                write!(f, "unable to get connection at {}: {source}", path.display())
            }
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connect { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Supplies a freshly opened connection for each store operation.
///
/// The returned connection is owned by the caller and closed on drop.
pub trait ConnectionSource {
    fn acquire(&self) -> DbResult<Connection>;
}

impl ConnectionSource for DbConfig {
    fn acquire(&self) -> DbResult<Connection> {
        open_db(self)
    }
}

impl<S: ConnectionSource + ?Sized> ConnectionSource for &S {
    fn acquire(&self) -> DbResult<Connection> {
        (**self).acquire()
    }
}
