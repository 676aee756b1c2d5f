/// SQLite implementation of [`ContestStore`].
pub mod sqlite;

use std::{collections::HashMap, path::PathBuf};

use futures::future::BoxFuture;
use time::OffsetDateTime;

use crate::dao::models::{ContestEntity, ContestId, EntryEntity, UserId};
use crate::dao::storage::StorageResult;

/// Raw contents of the settings table, keyed by setting name.
pub type SettingsMap = HashMap<String, String>;

/// Keys of the global settings table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    /// Id of the contest entries go to.
    CurrentContestId,
    /// `1` while entries are accepted.
    ContestOpen,
    /// `1` once the current contest has a winner.
    WinnerPicked,
    /// System recorded when the current contest ended.
    FobSystem,
    /// JSON array of prize lines.
    PrizesText,
    /// RFC 3339 entry deadline.
    EntryDeadline,
    /// Message currently showing the countdown.
    CountdownMessageId,
    /// Channel the countdown is posted in.
    CountdownChannelId,
}

impl SettingKey {
    /// Name of the key as stored in the settings table.
    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::CurrentContestId => "current_contest_id",
            SettingKey::ContestOpen => "contest_open",
            SettingKey::WinnerPicked => "winner_picked",
            SettingKey::FobSystem => "fob_system",
            SettingKey::PrizesText => "prizes_text",
            SettingKey::EntryDeadline => "entry_deadline",
            SettingKey::CountdownMessageId => "countdown_message_id",
            SettingKey::CountdownChannelId => "countdown_channel_id",
        }
    }
}

/// Abstraction over the persistence layer for contests, entries and settings.
///
/// Every call is atomic on its own; no transaction spans two calls, so callers
/// running multi-step flows re-read state instead of assuming earlier reads hold.
pub trait ContestStore: Send + Sync {
    /// Every stored setting.
    fn load_settings(&self) -> BoxFuture<'static, StorageResult<SettingsMap>>;
    /// Insert or overwrite one setting.
    fn put_setting(&self, key: SettingKey, value: String) -> BoxFuture<'static, StorageResult<()>>;
    /// Remove a setting; missing keys are not an error.
    fn clear_setting(&self, key: SettingKey) -> BoxFuture<'static, StorageResult<()>>;
    /// Fetch a contest by id.
    fn find_contest(&self, id: ContestId)
    -> BoxFuture<'static, StorageResult<Option<ContestEntity>>>;
    /// Contests newest first, optionally restricted to those with a winner.
    fn list_contests(&self, winners_only: bool)
    -> BoxFuture<'static, StorageResult<Vec<ContestEntity>>>;
    /// Create a fresh contest and make it current with open entries and cleared outcome.
    fn begin_contest(
        &self,
        opened_at: OffsetDateTime,
    ) -> BoxFuture<'static, StorageResult<ContestEntity>>;
    /// Close entries and record the FOB system plus the optional winner in one step.
    fn conclude_contest(
        &self,
        contest_id: ContestId,
        fob_system: String,
        winner: Option<UserId>,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// The entry a user holds in a contest.
    fn find_entry(
        &self,
        contest_id: ContestId,
        user_id: UserId,
    ) -> BoxFuture<'static, StorageResult<Option<EntryEntity>>>;
    /// The entry that claimed a system in a contest.
    fn find_entry_by_system(
        &self,
        contest_id: ContestId,
        system_name: String,
    ) -> BoxFuture<'static, StorageResult<Option<EntryEntity>>>;
    /// Entries of a contest ordered by user id.
    fn list_entries(&self, contest_id: ContestId)
    -> BoxFuture<'static, StorageResult<Vec<EntryEntity>>>;
    /// Number of entries in a contest.
    fn count_entries(&self, contest_id: ContestId) -> BoxFuture<'static, StorageResult<u64>>;
    /// Insert a new entry; uniqueness violations surface as `StorageError::Constraint`.
    fn insert_entry(&self, entry: EntryEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Write a point-in-time copy of the store and return its location.
    fn backup(&self, taken_at: OffsetDateTime) -> BoxFuture<'static, StorageResult<PathBuf>>;
    /// Cheap round trip used by the health endpoint.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
