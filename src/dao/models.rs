use std::{fmt, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use time::OffsetDateTime;
use utoipa::ToSchema;

macro_rules! snowflake_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay,
            DeserializeFromStr, ToSchema,
        )]
        #[schema(value_type = String)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

snowflake_id!(
    /// Opaque identifier of a chat-platform user.
    UserId
);
snowflake_id!(
    /// Identifier of the channel a message lives in.
    ChannelId
);
snowflake_id!(
    /// Identifier of a message previously sent through the notification channel.
    MessageId
);

/// Monotonic identifier assigned to a contest row at creation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct ContestId(pub i64);

impl fmt::Display for ContestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One round of the prediction game as persisted in the contests table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContestEntity {
    /// Primary key, assigned by the store.
    pub id: ContestId,
    /// When the contest was opened.
    pub opened_at: OffsetDateTime,
    /// System the FOB actually spawned in, recorded when the contest is closed.
    pub fob_system: Option<String>,
    /// Winner picked among the correct guesses, if any.
    pub winner_user_id: Option<UserId>,
    /// System the winner guessed (always equal to `fob_system` when set).
    pub winner_system: Option<String>,
}

impl ContestEntity {
    /// Whether a winner has been recorded for this contest.
    pub fn has_winner(&self) -> bool {
        self.winner_user_id.is_some()
    }
}

/// A single participant's guess for a contest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryEntity {
    /// Contest the guess belongs to.
    pub contest_id: ContestId,
    /// Participant who made the guess.
    pub user_id: UserId,
    /// Normalized system name.
    pub system_name: String,
    /// Submission time.
    pub entered_at: OffsetDateTime,
}
