//! Periodic countdown message kept in sync with the entry deadline.
//!
//! A single message is edited in place on every tick. Its id lives in the
//! settings table so restarts keep editing the same message instead of
//! posting a new one.

use thiserror::Error;
use time::OffsetDateTime;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info, warn};

use crate::{
    dao::{
        contest_store::SettingKey,
        models::{ChannelId, ContestId, MessageId},
        storage::StorageError,
    },
    services::notifier::{Embed, NotifyError, OutboundMessage},
    state::{SharedState, settings::Settings},
};

const COUNTDOWN_COLOR: u32 = 0x00FFAA;
const DEADLINE_REACHED_COLOR: u32 = 0xFF0000;

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No deadline is set.
    NoDeadline,
    /// A deadline is set but there is no channel to post in.
    NoChannel,
    /// A new countdown message was posted.
    Posted(MessageId),
    /// The tracked message was edited in place.
    Updated(MessageId),
    /// The tracked message had disappeared; a replacement was posted.
    Reposted(MessageId),
    /// The deadline passed; the tracked message now shows the terminal form.
    Finished(MessageId),
    /// The deadline passed and no message is tracked anymore.
    Dormant,
    /// The tick failed; the error was logged.
    Failed,
}

#[derive(Debug, Error)]
enum TickError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("notification failed: {0}")]
    Notify(#[from] NotifyError),
}

/// Run the countdown forever on the configured interval.
pub async fn run(state: SharedState) {
    let period = state.config().countdown_interval;
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(period_secs = period.as_secs(), "countdown scheduler started");

    loop {
        ticker.tick().await;
        tick(&state).await;
    }
}

/// Run one tick against the current time.
pub async fn tick(state: &SharedState) -> TickOutcome {
    tick_at(state, OffsetDateTime::now_utc()).await
}

/// Run one tick as if the current time were `now`.
///
/// Ticks are serialized; failures are logged and reported as [`TickOutcome::Failed`].
pub async fn tick_at(state: &SharedState, now: OffsetDateTime) -> TickOutcome {
    let _guard = state.countdown_gate().lock().await;
    match try_tick(state, now).await {
        Ok(outcome) => {
            debug!(?outcome, "countdown tick completed");
            outcome
        }
        Err(err) => {
            error!(error = %err, "countdown tick failed");
            TickOutcome::Failed
        }
    }
}

/// Delete the tracked countdown message, if any, and forget its id.
///
/// Used when the deadline is cleared or a new contest starts.
pub async fn retire_message(state: &SharedState) -> Result<(), StorageError> {
    let _guard = state.countdown_gate().lock().await;
    let settings = load_settings(state).await?;
    let Some(message_id) = settings.countdown_message_id else {
        return Ok(());
    };

    if let Some(channel) = countdown_channel(state, &settings) {
        match state.notifier().delete(channel, message_id).await {
            Ok(()) => info!(message_id = %message_id, "deleted countdown message"),
            Err(NotifyError::NotFound) => debug!(message_id = %message_id, "countdown message already gone"),
            Err(err) => warn!(
                message_id = %message_id,
                error = %err,
                "failed to delete previous countdown message"
            ),
        }
    }

    state
        .store()
        .clear_setting(SettingKey::CountdownMessageId)
        .await
}

async fn try_tick(state: &SharedState, now: OffsetDateTime) -> Result<TickOutcome, TickError> {
    let settings = load_settings(state).await?;
    let Some(deadline) = settings.entry_deadline else {
        return Ok(TickOutcome::NoDeadline);
    };
    let Some(channel) = countdown_channel(state, &settings) else {
        return Ok(TickOutcome::NoChannel);
    };
    let tracked = settings.countdown_message_id;

    if now >= deadline {
        let Some(message_id) = tracked else {
            return Ok(TickOutcome::Dormant);
        };
        match state
            .notifier()
            .edit(channel, message_id, render_deadline_reached())
            .await
        {
            Ok(()) => {}
            Err(NotifyError::NotFound) => {
                debug!(message_id = %message_id, "final countdown message already gone");
            }
            Err(err) => return Err(err.into()),
        }
        state
            .store()
            .clear_setting(SettingKey::CountdownMessageId)
            .await?;
        info!(message_id = %message_id, "entry deadline reached; countdown finished");
        return Ok(TickOutcome::Finished(message_id));
    }

    let message = render_countdown(settings.current_contest_id, deadline, now);
    match tracked {
        Some(message_id) => match state.notifier().edit(channel, message_id, message.clone()).await {
            Ok(()) => Ok(TickOutcome::Updated(message_id)),
            Err(NotifyError::NotFound) => {
                let replacement = post(state, channel, message).await?;
                info!(
                    previous = %message_id,
                    message_id = %replacement,
                    "countdown message was deleted; posted a new one"
                );
                Ok(TickOutcome::Reposted(replacement))
            }
            Err(err) => Err(err.into()),
        },
        None => {
            let message_id = post(state, channel, message).await?;
            info!(channel = %channel, message_id = %message_id, "posted countdown message");
            Ok(TickOutcome::Posted(message_id))
        }
    }
}

async fn post(
    state: &SharedState,
    channel: ChannelId,
    message: OutboundMessage,
) -> Result<MessageId, TickError> {
    let message_id = state.notifier().send(channel, message).await?;
    state
        .store()
        .put_setting(SettingKey::CountdownMessageId, message_id.to_string())
        .await?;
    Ok(message_id)
}

async fn load_settings(state: &SharedState) -> Result<Settings, StorageError> {
    let raw = state.store().load_settings().await?;
    Settings::from_map(&raw)
}

fn countdown_channel(state: &SharedState, settings: &Settings) -> Option<ChannelId> {
    settings
        .countdown_channel_id
        .or(state.config().announce_channel_id)
}

/// Countdown card showing the time left until `deadline`.
pub fn render_countdown(
    contest_id: ContestId,
    deadline: OffsetDateTime,
    now: OffsetDateTime,
) -> OutboundMessage {
    let timestamp = deadline.unix_timestamp();
    let embed = Embed::new(format!("Contest #{contest_id} Countdown"), COUNTDOWN_COLOR)
        .description("Time remaining until entry deadline:")
        .field("Time Remaining", format_remaining(deadline - now))
        .field("Deadline", format!("<t:{timestamp}:F> (<t:{timestamp}:R>)"))
        .footer("Use /enter to submit your guess!");
    OutboundMessage::embed(embed)
}

/// Terminal card shown once the deadline has passed.
pub fn render_deadline_reached() -> OutboundMessage {
    OutboundMessage::embed(
        Embed::new("Contest Deadline Reached!", DEADLINE_REACHED_COLOR)
            .description("Entry deadline has passed. No more entries are being accepted."),
    )
}

/// Render a positive duration as days, hours and minutes.
///
/// Days appear only when non-zero, hours when non-zero or when days are shown,
/// minutes always.
pub fn format_remaining(remaining: time::Duration) -> String {
    let days = remaining.whole_days();
    let hours = remaining.whole_hours() % 24;
    let minutes = remaining.whole_minutes() % 60;

    let mut parts = Vec::with_capacity(3);
    if days > 0 {
        parts.push(unit(days, "day"));
    }
    if hours > 0 || days > 0 {
        parts.push(unit(hours, "hour"));
    }
    parts.push(unit(minutes, "minute"));
    parts.join(" ")
}

fn unit(value: i64, name: &str) -> String {
    let plural = if value == 1 { "" } else { "s" };
    format!("**{value}** {name}{plural}")
}
