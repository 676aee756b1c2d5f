use std::{path::PathBuf, time::Duration};

/// How long a connection waits on a locked database before giving up.
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Runtime configuration describing where the SQLite database lives.
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Database file; created on first open.
    pub path: PathBuf,
    /// Lock wait applied to every connection.
    pub busy_timeout: Duration,
}

impl SqliteConfig {
    /// Construct a configuration for the database file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Override the busy timeout applied to every connection.
    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }
}
