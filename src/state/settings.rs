//! Typed view over the global settings table.

use std::str::FromStr;

use serde_json::Value;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
    dao::{
        contest_store::{SettingKey, SettingsMap},
        models::{ChannelId, ContestId, MessageId},
        storage::{StorageError, StorageResult},
    },
    state::lifecycle::ContestPhase,
};

/// Snapshot of every global setting, decoded into domain types.
///
/// Built fresh from the store for each command so no component keeps global
/// state in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Contest that entries and admin actions currently apply to.
    pub current_contest_id: ContestId,
    /// Explicit open flag toggled by admins.
    pub contest_open: bool,
    /// Whether a winner has been drawn for the current contest.
    pub winner_picked: bool,
    /// Actual spawn system recorded on close.
    pub fob_system: Option<String>,
    /// Ordered prize list.
    pub prizes: Vec<String>,
    /// Soft deadline after which entries are refused.
    pub entry_deadline: Option<OffsetDateTime>,
    /// Live countdown message, edited in place on each tick.
    pub countdown_message_id: Option<MessageId>,
    /// Channel the countdown message is posted in.
    pub countdown_channel_id: Option<ChannelId>,
}

impl Settings {
    /// Decode the raw settings map, applying defaults for missing keys.
    pub fn from_map(map: &SettingsMap) -> StorageResult<Self> {
        let raw = |key: SettingKey| {
            map.get(key.as_str())
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
        };

        let current_contest_id = match raw(SettingKey::CurrentContestId) {
            Some(value) => ContestId(parse_value(SettingKey::CurrentContestId, value)?),
            None => ContestId(1),
        };

        let entry_deadline = raw(SettingKey::EntryDeadline)
            .map(|value| {
                OffsetDateTime::parse(value, &Rfc3339)
                    .map_err(|_| StorageError::corrupt(SettingKey::EntryDeadline.as_str(), value))
            })
            .transpose()?;

        Ok(Self {
            current_contest_id,
            contest_open: parse_flag(SettingKey::ContestOpen, raw(SettingKey::ContestOpen), true)?,
            winner_picked: parse_flag(
                SettingKey::WinnerPicked,
                raw(SettingKey::WinnerPicked),
                false,
            )?,
            fob_system: raw(SettingKey::FobSystem).map(str::to_owned),
            prizes: decode_prizes(map.get(SettingKey::PrizesText.as_str()).map(String::as_str)),
            entry_deadline,
            countdown_message_id: raw(SettingKey::CountdownMessageId)
                .map(|value| parse_value(SettingKey::CountdownMessageId, value))
                .transpose()?,
            countdown_channel_id: raw(SettingKey::CountdownChannelId)
                .map(|value| parse_value(SettingKey::CountdownChannelId, value))
                .transpose()?,
        })
    }

    /// Lifecycle phase implied by the open and winner flags.
    pub fn phase(&self) -> ContestPhase {
        if self.winner_picked {
            ContestPhase::WinnerPicked
        } else if self.contest_open {
            ContestPhase::Open
        } else {
            ContestPhase::Closed
        }
    }

    /// Whether a deadline is set and `now` is at or past it.
    pub fn deadline_elapsed(&self, now: OffsetDateTime) -> bool {
        self.entry_deadline.is_some_and(|deadline| now >= deadline)
    }
}

/// Decode the stored prize list.
///
/// Current releases store a JSON array; older ones stored a single plain-text
/// blob, which is returned as a one-element list.
pub fn decode_prizes(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.filter(|value| !value.trim().is_empty()) else {
        return Vec::new();
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(text) => text,
                other => other.to_string(),
            })
            .collect(),
        _ => vec![raw.to_owned()],
    }
}

/// Encode a prize list for the settings table.
pub fn encode_prizes(prizes: &[String]) -> String {
    Value::Array(prizes.iter().cloned().map(Value::String).collect()).to_string()
}

fn parse_value<T: FromStr>(key: SettingKey, value: &str) -> StorageResult<T> {
    value
        .parse()
        .map_err(|_| StorageError::corrupt(key.as_str(), value))
}

fn parse_flag(key: SettingKey, value: Option<&str>, default: bool) -> StorageResult<bool> {
    match value {
        None => Ok(default),
        Some("1") | Some("true") => Ok(true),
        Some("0") | Some("false") => Ok(false),
        Some(other) => Err(StorageError::corrupt(key.as_str(), other)),
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn map(pairs: &[(SettingKey, &str)]) -> SettingsMap {
        pairs
            .iter()
            .map(|(key, value)| (key.as_str().to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn empty_map_uses_defaults() {
        let settings = Settings::from_map(&SettingsMap::new()).unwrap();
        assert_eq!(settings.current_contest_id, ContestId(1));
        assert!(settings.contest_open);
        assert!(!settings.winner_picked);
        assert_eq!(settings.fob_system, None);
        assert!(settings.prizes.is_empty());
        assert_eq!(settings.phase(), ContestPhase::Open);
        assert!(!settings.deadline_elapsed(OffsetDateTime::now_utc()));
    }

    #[test]
    fn flags_drive_the_phase() {
        let closed = map(&[(SettingKey::ContestOpen, "0"), (SettingKey::WinnerPicked, "0")]);
        assert_eq!(Settings::from_map(&closed).unwrap().phase(), ContestPhase::Closed);

        let won = map(&[(SettingKey::ContestOpen, "0"), (SettingKey::WinnerPicked, "1")]);
        assert_eq!(Settings::from_map(&won).unwrap().phase(), ContestPhase::WinnerPicked);
    }

    #[test]
    fn typed_values_are_decoded() {
        let raw = map(&[
            (SettingKey::CurrentContestId, "7"),
            (SettingKey::FobSystem, "Tama"),
            (SettingKey::EntryDeadline, "2025-03-01T18:00:00+00:00"),
            (SettingKey::CountdownMessageId, "1234567890123"),
            (SettingKey::CountdownChannelId, "42"),
        ]);
        let settings = Settings::from_map(&raw).unwrap();
        assert_eq!(settings.current_contest_id, ContestId(7));
        assert_eq!(settings.fob_system.as_deref(), Some("Tama"));
        assert_eq!(settings.entry_deadline, Some(datetime!(2025-03-01 18:00 UTC)));
        assert_eq!(settings.countdown_message_id, Some(MessageId(1_234_567_890_123)));
        assert_eq!(settings.countdown_channel_id, Some(ChannelId(42)));

        assert!(!settings.deadline_elapsed(datetime!(2025-03-01 17:59 UTC)));
        assert!(settings.deadline_elapsed(datetime!(2025-03-01 18:00 UTC)));
    }

    #[test]
    fn corrupt_values_are_reported() {
        let raw = map(&[(SettingKey::CurrentContestId, "seven")]);
        assert!(matches!(
            Settings::from_map(&raw),
            Err(StorageError::Corrupt { key, .. }) if key == "current_contest_id"
        ));
    }

    #[test]
    fn prizes_accept_json_and_legacy_text() {
        assert_eq!(
            decode_prizes(Some(r#"["1B ISK","500M ISK"]"#)),
            vec!["1B ISK".to_string(), "500M ISK".to_string()]
        );
        assert_eq!(
            decode_prizes(Some("1B ISK to the winner")),
            vec!["1B ISK to the winner".to_string()]
        );
        assert_eq!(decode_prizes(Some("")), Vec::<String>::new());
        assert_eq!(decode_prizes(None), Vec::<String>::new());

        let prizes = vec!["Skiff".to_string(), "PLEX \"x2\"".to_string()];
        assert_eq!(decode_prizes(Some(&encode_prizes(&prizes))), prizes);
    }
}
