use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::error;
use utoipa::ToSchema;
use validator::ValidationErrors;

use crate::{
    dao::storage::StorageError,
    state::lifecycle::{ContestEvent, ContestPhase, InvalidTransition},
};

/// Errors that can occur in service layer operations.
///
/// The `Display` output is the message shown to the caller.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Caller lacks admin rights for the action.
    #[error("You do not have permission to {action}.")]
    PermissionDenied {
        /// Human readable name of the refused action.
        action: &'static str,
    },
    /// System name is not on the allow-list.
    #[error("That is not a valid FOB system. Use /allowedsystems to see the list.")]
    InvalidSystem,
    /// Entries are closed.
    #[error("The contest is currently closed. No new entries are being accepted.")]
    ContestClosed,
    /// The soft deadline has elapsed.
    #[error(
        "The entry deadline (<t:{}:F>) has passed. No new entries are being accepted.",
        .deadline.unix_timestamp()
    )]
    DeadlinePassed {
        /// The deadline that elapsed.
        deadline: OffsetDateTime,
    },
    /// Caller already holds an entry in the current contest.
    #[error("You have already entered this contest with **{existing}**. Only one entry per member is allowed.")]
    DuplicateUser {
        /// The guess already on record.
        existing: String,
    },
    /// Another member already claimed the system.
    #[error("**{system}** has already been claimed by another member. Please choose a different system.")]
    SystemTaken {
        /// The claimed system.
        system: String,
    },
    /// A winner has already been drawn for the current contest.
    #[error("A winner has already been picked for this contest. Start a new contest with /newcontest.")]
    AlreadyHasWinner,
    /// Entries are already closed.
    #[error("The contest is already closed.")]
    AlreadyClosed,
    /// Entries are already open.
    #[error("The contest is already open.")]
    AlreadyOpen,
    /// Closing was attempted before anyone entered.
    #[error("There are no entries in this contest yet.")]
    NoEntries,
    /// Input could not be parsed or is out of range.
    #[error("{0}")]
    MalformedInput(String),
    /// Requested resource was not found.
    #[error("{0}")]
    NotFound(String),
    /// Storage backend failed.
    #[error("storage failure")]
    Storage(#[source] StorageError),
    /// Unexpected internal failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Stable machine-readable code for the error.
    pub fn reason(&self) -> &'static str {
        match self {
            ServiceError::PermissionDenied { .. } => "permission_denied",
            ServiceError::InvalidSystem => "invalid_system",
            ServiceError::ContestClosed => "contest_closed",
            ServiceError::DeadlinePassed { .. } => "deadline_passed",
            ServiceError::DuplicateUser { .. } => "duplicate_user",
            ServiceError::SystemTaken { .. } => "system_taken",
            ServiceError::AlreadyHasWinner => "already_has_winner",
            ServiceError::AlreadyClosed => "already_closed",
            ServiceError::AlreadyOpen => "already_open",
            ServiceError::NoEntries => "no_entries",
            ServiceError::MalformedInput(_) => "malformed_input",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::Storage(_) => "storage_error",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        ServiceError::Storage(err)
    }
}

impl From<InvalidTransition> for ServiceError {
    fn from(err: InvalidTransition) -> Self {
        match (err.from, err.event) {
            (ContestPhase::WinnerPicked, _) => ServiceError::AlreadyHasWinner,
            (ContestPhase::Closed, ContestEvent::Close | ContestEvent::DrawWinner) => {
                ServiceError::AlreadyClosed
            }
            (ContestPhase::Open, ContestEvent::Reopen) => ServiceError::AlreadyOpen,
            (from, event) => {
                ServiceError::Internal(format!("unexpected transition {event:?} from {from:?}"))
            }
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest {
            reason: "malformed_input",
            message: format!("validation failed: {}", err),
        }
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("{message}")]
    BadRequest {
        /// Machine-readable code.
        reason: &'static str,
        /// Message for the caller.
        message: String,
    },
    /// Caller identity is missing or malformed.
    #[error("{message}")]
    Unauthorized {
        /// Machine-readable code.
        reason: &'static str,
        /// Message for the caller.
        message: String,
    },
    /// Caller is known but lacks the required rights.
    #[error("{message}")]
    Forbidden {
        /// Machine-readable code.
        reason: &'static str,
        /// Message for the caller.
        message: String,
    },
    /// Requested resource not found.
    #[error("{message}")]
    NotFound {
        /// Machine-readable code.
        reason: &'static str,
        /// Message for the caller.
        message: String,
    },
    /// Conflict with current contest state.
    #[error("{message}")]
    Conflict {
        /// Machine-readable code.
        reason: &'static str,
        /// Message for the caller.
        message: String,
    },
    /// Internal server error.
    #[error("{message}")]
    Internal {
        /// Machine-readable code.
        reason: &'static str,
        /// Message for the caller.
        message: String,
    },
}

impl AppError {
    /// Missing or unparseable caller identity.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::Unauthorized {
            reason: "unauthorized",
            message: message.into(),
        }
    }

    fn reason(&self) -> &'static str {
        match self {
            AppError::BadRequest { reason, .. }
            | AppError::Unauthorized { reason, .. }
            | AppError::Forbidden { reason, .. }
            | AppError::NotFound { reason, .. }
            | AppError::Conflict { reason, .. }
            | AppError::Internal { reason, .. } => *reason,
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        let reason = err.reason();
        match err {
            ServiceError::Storage(source) => {
                error!(error = %source, details = ?source, "storage failure while serving request");
                AppError::Internal {
                    reason,
                    message: "Something went wrong while accessing contest data. An admin should check the logs.".into(),
                }
            }
            ServiceError::Internal(message) => {
                error!(%message, "internal failure while serving request");
                AppError::Internal {
                    reason,
                    message: "Something went wrong. An admin should check the logs.".into(),
                }
            }
            ServiceError::PermissionDenied { .. } => AppError::Forbidden {
                reason,
                message: err.to_string(),
            },
            ServiceError::InvalidSystem | ServiceError::MalformedInput(_) => {
                AppError::BadRequest {
                    reason,
                    message: err.to_string(),
                }
            }
            ServiceError::NotFound(_) => AppError::NotFound {
                reason,
                message: err.to_string(),
            },
            ServiceError::ContestClosed
            | ServiceError::DeadlinePassed { .. }
            | ServiceError::DuplicateUser { .. }
            | ServiceError::SystemTaken { .. }
            | ServiceError::AlreadyHasWinner
            | ServiceError::AlreadyClosed
            | ServiceError::AlreadyOpen
            | ServiceError::NoEntries => AppError::Conflict {
                reason,
                message: err.to_string(),
            },
        }
    }
}

/// JSON body returned for every failed request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Stable machine-readable code such as `system_taken`.
    pub reason: String,
    /// Message intended for the caller.
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorBody {
            reason: self.reason().to_string(),
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}
