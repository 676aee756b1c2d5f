use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Uniqueness rule of the entries table that rejected a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintViolation {
    /// `(contest_id, user_id)`: the user already holds an entry in this contest.
    UserEntry,
    /// `(contest_id, system_name)`: the system is already claimed in this contest.
    SystemName,
}

/// Error raised by storage backends regardless of the underlying database.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached or the operation failed.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// What the store was doing.
        message: String,
        /// Backend error.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A database-enforced uniqueness constraint rejected the write.
    #[error("unique constraint violated: {0:?}")]
    Constraint(ConstraintViolation),
    /// A persisted value could not be decoded into its expected type.
    #[error("corrupt value `{value}` stored under `{key}`")]
    Corrupt {
        /// Setting or column the value was read from.
        key: String,
        /// Raw stored text.
        value: String,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Construct a corrupt-value error for the given key.
    pub fn corrupt(key: impl Into<String>, value: impl Into<String>) -> Self {
        StorageError::Corrupt {
            key: key.into(),
            value: value.into(),
        }
    }
}
