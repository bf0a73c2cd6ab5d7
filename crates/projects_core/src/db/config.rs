//! Connection settings for the projects database.

use std::path::{Path, PathBuf};
use std::time::Duration;

const DB_PATH_ENV: &str = "PROJECTS_DB_PATH";
const BUSY_TIMEOUT_ENV: &str = "PROJECTS_DB_BUSY_TIMEOUT_MS";
const DEFAULT_DB_PATH: &str = "projects.db";
pub(crate) const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Location and connection options of the projects database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// SQLite database file.
    pub path: PathBuf,
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout: Duration,
}

impl DbConfig {
    /// Creates a config for `path` with the default busy timeout.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Reads `PROJECTS_DB_PATH` and `PROJECTS_DB_BUSY_TIMEOUT_MS`.
    ///
    /// Missing or unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let path = lookup(DB_PATH_ENV)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        let busy_timeout = lookup(BUSY_TIMEOUT_ENV)
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map_or(DEFAULT_BUSY_TIMEOUT, Duration::from_millis);

        Self {
            path: PathBuf::from(path),
            busy_timeout,
        }
    }

    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }
}
