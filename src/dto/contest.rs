//! DTO definitions used by the participant-facing contest API.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::format_timestamp;
use crate::{
    dao::models::{ContestEntity, ContestId, EntryEntity, UserId},
    state::lifecycle::ContestPhase,
};

/// Guess submitted by a participant.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitEntryRequest {
    /// System name as typed; normalized before validation.
    pub system: String,
}

/// A stored entry.
#[derive(Debug, Serialize, ToSchema)]
pub struct EntryResponse {
    /// Contest the guess belongs to.
    pub contest_id: ContestId,
    /// Participant who made the guess.
    pub user_id: UserId,
    /// Normalized system name.
    pub system_name: String,
    /// RFC 3339 timestamp of the submission.
    pub entered_at: String,
}

impl From<EntryEntity> for EntryResponse {
    fn from(entry: EntryEntity) -> Self {
        Self {
            contest_id: entry.contest_id,
            user_id: entry.user_id,
            system_name: entry.system_name,
            entered_at: format_timestamp(entry.entered_at),
        }
    }
}

/// Allow-listed systems.
#[derive(Debug, Serialize, ToSchema)]
pub struct SystemsResponse {
    /// System names in display form.
    pub systems: Vec<String>,
}

/// Query string of the autocomplete endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SuggestQuery {
    /// Partially typed system name.
    #[serde(default)]
    pub q: String,
}

/// Ordered prize list.
#[derive(Debug, Serialize, ToSchema)]
pub struct PrizesResponse {
    /// Prizes in award order.
    pub prizes: Vec<String>,
}

/// One titled block of the rules.
#[derive(Debug, Serialize, ToSchema)]
pub struct RulesSection {
    /// Heading.
    pub name: String,
    /// Markdown text.
    pub body: String,
}

/// Static contest rules.
#[derive(Debug, Serialize, ToSchema)]
pub struct RulesResponse {
    /// Heading of the rules card.
    pub title: String,
    /// Introductory line.
    pub description: String,
    /// Rule blocks in display order.
    pub sections: Vec<RulesSection>,
    /// Closing line.
    pub footer: String,
}

/// One command listed by the help card.
#[derive(Debug, Serialize, ToSchema)]
pub struct CommandHelp {
    /// Chat command name, with its leading slash.
    pub command: String,
    /// What the command does.
    pub description: String,
    /// REST route serving the same operation.
    pub route: String,
}

/// Command reference for participants and admins.
#[derive(Debug, Serialize, ToSchema)]
pub struct HelpResponse {
    /// Heading of the help card.
    pub title: String,
    /// Introductory line.
    pub description: String,
    /// Commands any participant may use.
    pub user_commands: Vec<CommandHelp>,
    /// Commands reserved to admins.
    pub admin_commands: Vec<CommandHelp>,
    /// Closing line.
    pub footer: String,
}

/// Read-only snapshot of the current contest.
#[derive(Debug, Serialize, ToSchema)]
pub struct ContestStatusResponse {
    /// Current contest.
    pub contest_id: ContestId,
    /// RFC 3339 opening time, absent if the contest row is missing.
    pub opened_at: Option<String>,
    /// Lifecycle phase derived from the flags.
    pub phase: ContestPhase,
    /// Explicit open flag; entries also require the deadline not to have passed.
    pub contest_open: bool,
    /// Whether a winner has been drawn.
    pub winner_picked: bool,
    /// RFC 3339 UTC deadline, if one is set.
    pub entry_deadline: Option<String>,
    /// Whether the deadline lies in the past.
    pub deadline_passed: bool,
    /// Entries submitted so far.
    pub entry_count: u64,
    /// System recorded when the contest ended.
    pub fob_system: Option<String>,
    /// Drawn winner.
    pub winner_user_id: Option<UserId>,
    /// System the winner guessed.
    pub winner_system: Option<String>,
}

/// One row of the contest history.
#[derive(Debug, Serialize, ToSchema)]
pub struct ContestSummary {
    /// Contest id.
    pub contest_id: ContestId,
    /// RFC 3339 opening time.
    pub opened_at: String,
    /// Where the FOB spawned, once recorded.
    pub fob_system: Option<String>,
    /// Winner, if one was drawn.
    pub winner_user_id: Option<UserId>,
    /// System the winner guessed.
    pub winner_system: Option<String>,
}

impl From<ContestEntity> for ContestSummary {
    fn from(contest: ContestEntity) -> Self {
        Self {
            contest_id: contest.id,
            opened_at: format_timestamp(contest.opened_at),
            fob_system: contest.fob_system,
            winner_user_id: contest.winner_user_id,
            winner_system: contest.winner_system,
        }
    }
}

/// Current server time.
#[derive(Debug, Serialize, ToSchema)]
pub struct UtcNowResponse {
    /// RFC 3339 UTC timestamp.
    pub utc: String,
    /// Same instant as Unix seconds.
    pub unix_seconds: i64,
}
