//! Error types shared by the SQLite storage implementation.

use std::path::PathBuf;

use rusqlite::ffi::{self, ErrorCode};
use thiserror::Error;

use crate::dao::storage::{ConstraintViolation, StorageError};

/// Convenient result alias returning [`SqliteDaoError`] failures.
pub type SqliteResult<T> = Result<T, SqliteDaoError>;

/// Failures that can occur while interacting with SQLite.
#[derive(Debug, Error)]
pub enum SqliteDaoError {
    /// Creating the directory holding the database failed.
    #[error("failed to create database directory `{path}`")]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Filesystem error.
        #[source]
        source: std::io::Error,
    },
    /// Opening or configuring a connection failed.
    #[error("failed to open SQLite database `{path}`")]
    Open {
        /// Database file.
        path: PathBuf,
        /// Driver error.
        #[source]
        source: rusqlite::Error,
    },
    /// A statement or transaction failed.
    #[error("SQLite operation `{operation}` failed")]
    Query {
        /// Store operation that issued the statement.
        operation: &'static str,
        /// Driver error.
        #[source]
        source: rusqlite::Error,
    },
    /// The blocking worker running the operation panicked or was cancelled.
    #[error("SQLite worker for `{operation}` did not complete")]
    Worker {
        /// Store operation the worker was running.
        operation: &'static str,
        /// Join failure reported by tokio.
        #[source]
        source: tokio::task::JoinError,
    },
}

impl SqliteDaoError {
    /// Uniqueness rule behind this failure, when it is a constraint violation.
    pub fn constraint_violation(&self) -> Option<ConstraintViolation> {
        let SqliteDaoError::Query { source, .. } = self else {
            return None;
        };
        let rusqlite::Error::SqliteFailure(failure, message) = source else {
            return None;
        };
        if failure.code != ErrorCode::ConstraintViolation {
            return None;
        }
        if failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY {
            return Some(ConstraintViolation::UserEntry);
        }
        match message.as_deref() {
            Some(text) if text.contains("system_name") => Some(ConstraintViolation::SystemName),
            Some(text) if text.contains("user_id") => Some(ConstraintViolation::UserEntry),
            _ => None,
        }
    }
}

impl From<SqliteDaoError> for StorageError {
    fn from(err: SqliteDaoError) -> Self {
        match err.constraint_violation() {
            Some(violation) => StorageError::Constraint(violation),
            None => StorageError::unavailable(err.to_string(), err),
        }
    }
}
