//! DTO definitions used by the admin REST API and documentation layer.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{contest::EntryResponse, validation::validate_prize_list};
use crate::{
    dao::models::{ContestId, UserId},
    state::lifecycle::ContestPhase,
};

/// Close the contest and reveal where the FOB spawned.
#[derive(Debug, Deserialize, ToSchema)]
pub struct EndContestRequest {
    /// System the FOB spawned in, as typed.
    pub fob_system: String,
}

/// Outcome of closing the contest.
#[derive(Debug, Serialize, ToSchema)]
pub struct EndContestResponse {
    /// Contest that was closed.
    pub contest_id: ContestId,
    /// Normalized FOB system.
    pub fob_system: String,
    /// Drawn winner, absent when nobody guessed right.
    pub winner_user_id: Option<UserId>,
    /// Phase reached: `winner_picked` or `closed`.
    pub phase: ContestPhase,
    /// Human-readable summary for the admin.
    pub message: String,
}

/// Start a new contest with an entry deadline.
#[derive(Debug, Deserialize, ToSchema)]
pub struct NewContestRequest {
    /// RFC 3339 or `YYYY-MM-DD HH:MM` in the configured offset.
    pub deadline: String,
}

/// Freshly created contest.
#[derive(Debug, Serialize, ToSchema)]
pub struct NewContestResponse {
    /// Id of the new current contest.
    pub contest_id: ContestId,
    /// RFC 3339 opening time.
    pub opened_at: String,
    /// RFC 3339 UTC entry deadline.
    pub entry_deadline: String,
    /// Confirmation shown to the admin.
    pub message: String,
}

/// Set or move the entry deadline.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetDeadlineRequest {
    /// RFC 3339 or `YYYY-MM-DD HH:MM` in the configured offset.
    pub deadline: String,
}

/// Deadline currently in force.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeadlineResponse {
    /// RFC 3339 UTC deadline.
    pub entry_deadline: Option<String>,
    /// Unix seconds, handy for chat timestamp markup.
    pub unix_seconds: Option<i64>,
}

/// Replace the prize list.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SetPrizesRequest {
    /// Between one and four prizes, in award order.
    #[validate(custom(function = "validate_prize_list"))]
    pub prizes: Vec<String>,
}

/// Entries of the current contest.
#[derive(Debug, Serialize, ToSchema)]
pub struct EntryListResponse {
    /// Current contest.
    pub contest_id: ContestId,
    /// Entries ordered by user id.
    pub entries: Vec<EntryResponse>,
}

/// Location of a database backup.
#[derive(Debug, Serialize, ToSchema)]
pub struct BackupResponse {
    /// File name of the copy.
    pub file_name: String,
    /// Full path of the copy on the server.
    pub path: String,
}

/// Generic action acknowledgement used by admin endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse {
    /// What happened.
    pub message: String,
}

impl ActionResponse {
    /// Wrap a confirmation message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
