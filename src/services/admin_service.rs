//! Admin commands: lifecycle transitions, deadline and prize management, backups.

use rand::{rng, seq::IndexedRandom};
use time::{
    OffsetDateTime, PrimitiveDateTime, UtcOffset, format_description::BorrowedFormatItem,
    format_description::well_known::Rfc3339, macros::format_description,
};
use tracing::{info, warn};

use crate::{
    dao::{
        contest_store::SettingKey,
        models::{ChannelId, ContestId, UserId},
    },
    dto::{
        admin::{
            ActionResponse, BackupResponse, DeadlineResponse, EndContestResponse,
            EntryListResponse, NewContestResponse,
        },
        contest::{EntryResponse, PrizesResponse},
        format_timestamp,
        validation::validate_prize_list,
    },
    error::ServiceError,
    services::{
        countdown,
        notifier::{Embed, OutboundMessage},
    },
    state::{
        Caller, SharedState,
        lifecycle::ContestEvent,
        settings::encode_prizes,
        transitions::{run_decided_transition, run_transition},
    },
};

const NAIVE_DEADLINE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");
const WINNER_COLOR: u32 = 0xFFD700;
const NO_WINNER_COLOR: u32 = 0xFF6B6B;

/// Close entries, record where the FOB spawned and draw a winner among the correct guesses.
///
/// Guards run in order: admin rights, contest phase, at least one entry, FOB
/// system on the allow-list. The soft deadline does not block this action.
pub async fn end_contest(
    state: &SharedState,
    caller: &Caller,
    raw_fob_system: &str,
) -> Result<EndContestResponse, ServiceError> {
    caller.require_admin("end the contest")?;

    let (outcome, phase) = run_decided_transition(state, ContestEvent::Close, |settings| async move {
        let contest_id = settings.current_contest_id;
        let store = state.store();
        if store.count_entries(contest_id).await? == 0 {
            return Err(ServiceError::NoEntries);
        }

        let fob_system = state
            .systems()
            .resolve(raw_fob_system)
            .ok_or(ServiceError::InvalidSystem)?;

        let matching: Vec<UserId> = store
            .list_entries(contest_id)
            .await?
            .into_iter()
            .filter(|entry| entry.system_name == fob_system)
            .map(|entry| entry.user_id)
            .collect();
        let winner = matching.choose(&mut rng()).copied();

        store
            .conclude_contest(contest_id, fob_system.clone(), winner)
            .await?;

        let event = match winner {
            Some(_) => ContestEvent::DrawWinner,
            None => ContestEvent::Close,
        };
        let outcome = ContestOutcome {
            contest_id,
            fob_system,
            winner,
            prizes: settings.prizes,
        };
        Ok((outcome, event))
    })
    .await?;

    info!(
        contest_id = %outcome.contest_id,
        fob_system = %outcome.fob_system,
        winner = ?outcome.winner,
        "contest ended"
    );
    announce_outcome(state, caller, &outcome).await;

    let message = match outcome.winner {
        Some(winner) => format!(
            "Contest #{} has ended. FOB system: {}. Winner: <@{winner}>.",
            outcome.contest_id, outcome.fob_system
        ),
        None => format!(
            "Contest #{} has ended. FOB system was: {}. No entries guessed correctly.",
            outcome.contest_id, outcome.fob_system
        ),
    };

    Ok(EndContestResponse {
        contest_id: outcome.contest_id,
        fob_system: outcome.fob_system,
        winner_user_id: outcome.winner,
        phase,
        message,
    })
}

/// Accept entries again after a close without winner.
///
/// An entry deadline that already elapsed is cleared so the reopened contest
/// actually accepts guesses; a future deadline is kept.
pub async fn open_contest(
    state: &SharedState,
    caller: &Caller,
) -> Result<ActionResponse, ServiceError> {
    caller.require_admin("open the contest")?;

    let (cleared_deadline, _) =
        run_transition(state, ContestEvent::Reopen, |settings| async move {
            let store = state.store();
            store
                .put_setting(SettingKey::ContestOpen, "1".to_string())
                .await?;
            if settings.deadline_elapsed(OffsetDateTime::now_utc()) {
                countdown::retire_message(state).await?;
                store.clear_setting(SettingKey::EntryDeadline).await?;
                return Ok(true);
            }
            Ok(false)
        })
        .await?;

    let mut message =
        "The contest has been re-opened. New entries are now accepted.".to_string();
    if cleared_deadline {
        countdown::tick(state).await;
        message.push_str(" The elapsed entry deadline was cleared; use /setdeadline to set a new one.");
    }
    Ok(ActionResponse::new(message))
}

/// Supersede the current contest with a fresh one and set its entry deadline.
///
/// The deadline is validated first, so a bad value creates nothing.
pub async fn new_contest(
    state: &SharedState,
    caller: &Caller,
    raw_deadline: &str,
) -> Result<NewContestResponse, ServiceError> {
    caller.require_admin("start a new contest")?;

    let now = OffsetDateTime::now_utc();
    let deadline = parse_deadline(raw_deadline, state.config().deadline_offset, now)?;
    let channel = command_channel(state, caller);

    let (contest, _) = run_transition(state, ContestEvent::StartNew, |_| async move {
        countdown::retire_message(state).await?;

        let store = state.store();
        let contest = store.begin_contest(now).await?;
        store
            .put_setting(SettingKey::EntryDeadline, format_timestamp(deadline))
            .await?;
        if let Some(channel) = channel {
            store
                .put_setting(SettingKey::CountdownChannelId, channel.to_string())
                .await?;
        }
        Ok(contest)
    })
    .await?;

    info!(contest_id = %contest.id, deadline = %deadline, "new contest started");
    countdown::tick(state).await;

    let opened_at = format_timestamp(contest.opened_at);
    let entry_deadline = format_timestamp(deadline);
    let timestamp = deadline.unix_timestamp();
    Ok(NewContestResponse {
        contest_id: contest.id,
        message: format!(
            "New contest started: Contest #{} [{opened_at}]. Entry deadline set to <t:{timestamp}:F> (<t:{timestamp}:R>). FOB system reset and entries are now OPEN.",
            contest.id
        ),
        opened_at,
        entry_deadline,
    })
}

/// Set or move the entry deadline of the current contest and refresh the countdown.
pub async fn set_deadline(
    state: &SharedState,
    caller: &Caller,
    raw_deadline: &str,
) -> Result<DeadlineResponse, ServiceError> {
    caller.require_admin("set the entry deadline")?;

    let deadline = parse_deadline(
        raw_deadline,
        state.config().deadline_offset,
        OffsetDateTime::now_utc(),
    )?;
    let channel = command_channel(state, caller);

    {
        let _gate = state.lifecycle_gate().lock().await;
        let settings = state.settings().await?;
        if settings.winner_picked {
            return Err(ServiceError::AlreadyHasWinner);
        }

        let store = state.store();
        if let Some(channel) = channel.filter(|channel| settings.countdown_channel_id != Some(*channel)) {
            countdown::retire_message(state).await?;
            store
                .put_setting(SettingKey::CountdownChannelId, channel.to_string())
                .await?;
        }
        store
            .put_setting(SettingKey::EntryDeadline, format_timestamp(deadline))
            .await?;
    }

    info!(deadline = %deadline, "entry deadline set");
    countdown::tick(state).await;

    Ok(DeadlineResponse {
        entry_deadline: Some(format_timestamp(deadline)),
        unix_seconds: Some(deadline.unix_timestamp()),
    })
}

/// Remove the entry deadline and the countdown message that tracked it.
pub async fn clear_deadline(
    state: &SharedState,
    caller: &Caller,
) -> Result<ActionResponse, ServiceError> {
    caller.require_admin("clear the entry deadline")?;

    let had_deadline = {
        let _gate = state.lifecycle_gate().lock().await;
        let settings = state.settings().await?;
        countdown::retire_message(state).await?;
        state
            .store()
            .clear_setting(SettingKey::EntryDeadline)
            .await?;
        settings.entry_deadline.is_some()
    };

    countdown::tick(state).await;

    let message = if had_deadline {
        info!("entry deadline cleared");
        "Entry deadline cleared. The countdown has been removed."
    } else {
        "No entry deadline was set."
    };
    Ok(ActionResponse::new(message))
}

/// Replace the ordered prize list.
pub async fn set_prizes(
    state: &SharedState,
    caller: &Caller,
    prizes: Vec<String>,
) -> Result<PrizesResponse, ServiceError> {
    caller.require_admin("set prizes")?;

    let prizes: Vec<String> = prizes
        .into_iter()
        .map(|prize| prize.trim().to_string())
        .collect();
    validate_prize_list(&prizes).map_err(|err| {
        ServiceError::MalformedInput(
            err.message
                .map(|message| message.into_owned())
                .unwrap_or_else(|| "Invalid prize list".into()),
        )
    })?;

    state
        .store()
        .put_setting(SettingKey::PrizesText, encode_prizes(&prizes))
        .await?;
    info!(count = prizes.len(), "prize list updated");
    Ok(PrizesResponse { prizes })
}

/// Every entry of the current contest, ordered by user id.
pub async fn list_entries(
    state: &SharedState,
    caller: &Caller,
) -> Result<EntryListResponse, ServiceError> {
    caller.require_admin("view all entries")?;

    let settings = state.settings().await?;
    let entries = state
        .store()
        .list_entries(settings.current_contest_id)
        .await?
        .into_iter()
        .map(EntryResponse::from)
        .collect();
    Ok(EntryListResponse {
        contest_id: settings.current_contest_id,
        entries,
    })
}

/// Write a timestamped copy of the database next to it.
pub async fn backup_database(
    state: &SharedState,
    caller: &Caller,
) -> Result<BackupResponse, ServiceError> {
    caller.require_admin("back up the database")?;

    let path = state.store().backup(OffsetDateTime::now_utc()).await?;
    info!(path = %path.display(), "database backed up");
    Ok(BackupResponse {
        file_name: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        path: path.display().to_string(),
    })
}

/// Parse an admin-supplied deadline and require it to lie after `now`.
///
/// Accepts RFC 3339, or `YYYY-MM-DD HH:MM` interpreted in `offset`.
pub fn parse_deadline(
    raw: &str,
    offset: UtcOffset,
    now: OffsetDateTime,
) -> Result<OffsetDateTime, ServiceError> {
    let raw = raw.trim();
    let parsed = OffsetDateTime::parse(raw, &Rfc3339)
        .ok()
        .or_else(|| {
            PrimitiveDateTime::parse(raw, NAIVE_DEADLINE_FORMAT)
                .ok()
                .map(|naive| naive.assume_offset(offset))
        })
        .ok_or_else(|| {
            ServiceError::MalformedInput(format!(
                "Invalid deadline `{raw}`. Use YYYY-MM-DD HH:MM (e.g. 2026-02-16 14:30) or an RFC 3339 timestamp."
            ))
        })?
        .to_offset(UtcOffset::UTC);

    if parsed <= now {
        return Err(ServiceError::MalformedInput(
            "Deadline must be in the future.".into(),
        ));
    }
    Ok(parsed)
}

/// Channel the caller issued the command from, else the configured announce channel.
fn command_channel(state: &SharedState, caller: &Caller) -> Option<ChannelId> {
    caller.channel_id.or(state.config().announce_channel_id)
}

struct ContestOutcome {
    contest_id: ContestId,
    fob_system: String,
    winner: Option<UserId>,
    prizes: Vec<String>,
}

/// Public announcement of the contest result.
fn render_outcome(outcome: &ContestOutcome) -> OutboundMessage {
    match outcome.winner {
        Some(winner) => {
            let prizes = if outcome.prizes.is_empty() {
                "Prize details to be announced by admins.".to_string()
            } else {
                numbered(&outcome.prizes)
            };
            OutboundMessage::embed(
                Embed::new("Contest Winner Announced!", WINNER_COLOR)
                    .description(format!(
                        "The Guristas FOB Contest #{} has concluded!",
                        outcome.contest_id
                    ))
                    .field("FOB System", format!("**{}**", outcome.fob_system))
                    .field("Winner", format!("<@{winner}>"))
                    .field("Prizes", prizes)
                    .footer("Congratulations to the winner! o7"),
            )
            .with_content(format!("<@{winner}>"))
        }
        None => OutboundMessage::embed(
            Embed::new("Contest Ended - No Winner", NO_WINNER_COLOR)
                .description(format!(
                    "The Guristas FOB Contest #{} has concluded.",
                    outcome.contest_id
                ))
                .field("FOB System", format!("**{}**", outcome.fob_system))
                .field(
                    "Result",
                    "No pilots guessed correctly. Better luck in the next contest!",
                )
                .footer("Fly dangerous o7"),
        ),
    }
}

async fn announce_outcome(state: &SharedState, caller: &Caller, outcome: &ContestOutcome) {
    let Some(channel) = command_channel(state, caller) else {
        info!(contest_id = %outcome.contest_id, "no channel to announce the result in");
        return;
    };
    if let Err(err) = state.notifier().send(channel, render_outcome(outcome)).await {
        warn!(
            contest_id = %outcome.contest_id,
            channel = %channel,
            error = %err,
            "failed to post contest result announcement"
        );
    }
}

/// Render prizes as `1. first` lines.
pub(crate) fn numbered(prizes: &[String]) -> String {
    prizes
        .iter()
        .enumerate()
        .map(|(idx, prize)| format!("{}. {prize}", idx + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use time::{Duration, macros::datetime, macros::offset};

    use super::*;
    use crate::{
        dao::contest_store::ContestStore,
        services::entry_service::submit_entry,
        state::lifecycle::ContestPhase,
        test_support::{ADMIN_CHANNEL, TestContext, admin, user},
    };

    fn in_days(days: i64) -> String {
        (OffsetDateTime::now_utc() + Duration::days(days))
            .format(&Rfc3339)
            .unwrap()
    }

    #[tokio::test]
    async fn ending_requires_admin_and_entries() {
        let ctx = TestContext::new(&["Tama"]);
        assert!(matches!(
            end_contest(&ctx.state, &user(10), "Tama").await,
            Err(ServiceError::PermissionDenied { .. })
        ));
        assert!(matches!(
            end_contest(&ctx.state, &admin(), "Tama").await,
            Err(ServiceError::NoEntries)
        ));
        assert!(ctx.settings().await.contest_open);
    }

    #[tokio::test]
    async fn unknown_fob_system_leaves_contest_open() {
        let ctx = TestContext::new(&["Tama"]);
        submit_entry(&ctx.state, &user(10), "Tama").await.unwrap();

        assert!(matches!(
            end_contest(&ctx.state, &admin(), "Jita").await,
            Err(ServiceError::InvalidSystem)
        ));
        let settings = ctx.settings().await;
        assert!(settings.contest_open);
        assert_eq!(settings.fob_system, None);
    }

    #[tokio::test]
    async fn correct_guess_wins_and_locks_the_contest() {
        let ctx = TestContext::new(&["Tama", "Vey"]);
        submit_entry(&ctx.state, &user(11), "Tama").await.unwrap();
        submit_entry(&ctx.state, &user(12), "Vey").await.unwrap();

        let outcome = end_contest(&ctx.state, &admin(), " tama").await.unwrap();
        assert_eq!(outcome.fob_system, "Tama");
        assert_eq!(outcome.winner_user_id, Some(UserId(11)));
        assert_eq!(outcome.phase, ContestPhase::WinnerPicked);

        let settings = ctx.settings().await;
        assert!(!settings.contest_open);
        assert!(settings.winner_picked);
        assert_eq!(settings.fob_system.as_deref(), Some("Tama"));

        let contest = ctx
            .store
            .find_contest(settings.current_contest_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(contest.winner_user_id, Some(UserId(11)));
        assert_eq!(contest.winner_system.as_deref(), Some("Tama"));

        let announcement = ctx.notifier.messages();
        assert_eq!(announcement.len(), 1);
        assert_eq!(announcement[0].1.channel, ADMIN_CHANNEL);
        assert_eq!(announcement[0].1.message.content.as_deref(), Some("<@11>"));
        assert_eq!(
            announcement[0].1.message.embeds[0].title,
            "Contest Winner Announced!"
        );

        assert!(matches!(
            end_contest(&ctx.state, &admin(), "Vey").await,
            Err(ServiceError::AlreadyHasWinner)
        ));
        assert!(matches!(
            open_contest(&ctx.state, &admin()).await,
            Err(ServiceError::AlreadyHasWinner)
        ));
        assert!(matches!(
            set_deadline(&ctx.state, &admin(), &in_days(1)).await,
            Err(ServiceError::AlreadyHasWinner)
        ));
    }

    #[tokio::test]
    async fn close_without_match_can_be_reopened() {
        let ctx = TestContext::new(&["Tama", "Vey"]);
        submit_entry(&ctx.state, &user(11), "Tama").await.unwrap();

        let outcome = end_contest(&ctx.state, &admin(), "Vey").await.unwrap();
        assert_eq!(outcome.winner_user_id, None);
        assert_eq!(outcome.phase, ContestPhase::Closed);
        assert_eq!(
            ctx.notifier.messages()[0].1.message.embeds[0].title,
            "Contest Ended - No Winner"
        );

        assert!(matches!(
            end_contest(&ctx.state, &admin(), "Vey").await,
            Err(ServiceError::AlreadyClosed)
        ));
        assert!(matches!(
            submit_entry(&ctx.state, &user(12), "Vey").await,
            Err(ServiceError::ContestClosed)
        ));

        open_contest(&ctx.state, &admin()).await.unwrap();
        assert!(matches!(
            open_contest(&ctx.state, &admin()).await,
            Err(ServiceError::AlreadyOpen)
        ));
        submit_entry(&ctx.state, &user(12), "Vey").await.unwrap();
    }

    #[tokio::test]
    async fn reopening_clears_an_elapsed_deadline() {
        let ctx = TestContext::new(&["Tama", "Vey"]);
        submit_entry(&ctx.state, &user(11), "Tama").await.unwrap();
        end_contest(&ctx.state, &admin(), "Vey").await.unwrap();
        ctx.put(SettingKey::EntryDeadline, "2020-01-01T00:00:00Z").await;

        let response = open_contest(&ctx.state, &admin()).await.unwrap();
        assert!(response.message.contains("cleared"));
        assert_eq!(ctx.settings().await.entry_deadline, None);
    }

    #[tokio::test]
    async fn reopening_past_the_deadline_removes_the_countdown_message() {
        let ctx = TestContext::new(&["Tama", "Vey"]);
        set_deadline(&ctx.state, &admin(), &in_days(2)).await.unwrap();
        let message_id = ctx.settings().await.countdown_message_id.unwrap();
        submit_entry(&ctx.state, &user(11), "Tama").await.unwrap();
        end_contest(&ctx.state, &admin(), "Vey").await.unwrap();
        ctx.put(SettingKey::EntryDeadline, "2020-01-01T00:00:00Z").await;

        open_contest(&ctx.state, &admin()).await.unwrap();
        let settings = ctx.settings().await;
        assert_eq!(settings.entry_deadline, None);
        assert_eq!(settings.countdown_message_id, None);
        assert!(ctx.notifier.message(message_id).is_none());

        // A later deadline posts a fresh countdown instead of editing the old one.
        set_deadline(&ctx.state, &admin(), &in_days(1)).await.unwrap();
        let fresh = ctx.settings().await.countdown_message_id.unwrap();
        assert_ne!(fresh, message_id);
    }

    #[tokio::test]
    async fn new_contest_keeps_history_and_starts_countdown() {
        let ctx = TestContext::new(&["Tama", "Vey"]);
        submit_entry(&ctx.state, &user(11), "Tama").await.unwrap();
        end_contest(&ctx.state, &admin(), "Tama").await.unwrap();

        let created = new_contest(&ctx.state, &admin(), &in_days(3)).await.unwrap();
        assert_eq!(created.contest_id, ContestId(2));

        let settings = ctx.settings().await;
        assert_eq!(settings.current_contest_id, ContestId(2));
        assert!(settings.contest_open);
        assert!(!settings.winner_picked);
        assert_eq!(settings.fob_system, None);
        assert!(settings.entry_deadline.is_some());
        assert_eq!(settings.countdown_channel_id, Some(ADMIN_CHANNEL));
        let message_id = settings.countdown_message_id.unwrap();
        assert_eq!(
            ctx.notifier.message(message_id).unwrap().channel,
            ADMIN_CHANNEL
        );

        let history = ctx.store.list_contests(false).await.unwrap();
        assert_eq!(history.len(), 2);
        let first = ctx.store.find_contest(ContestId(1)).await.unwrap().unwrap();
        assert_eq!(first.winner_user_id, Some(UserId(11)));

        // The previous winner may claim the same system again.
        submit_entry(&ctx.state, &user(11), "Tama").await.unwrap();
    }

    #[tokio::test]
    async fn bad_deadline_creates_nothing() {
        let ctx = TestContext::new(&["Tama"]);
        assert!(matches!(
            new_contest(&ctx.state, &admin(), "tomorrow-ish").await,
            Err(ServiceError::MalformedInput(_))
        ));
        assert!(matches!(
            new_contest(&ctx.state, &admin(), "2020-01-01 10:00").await,
            Err(ServiceError::MalformedInput(_))
        ));
        assert!(matches!(
            new_contest(&ctx.state, &user(10), &in_days(1)).await,
            Err(ServiceError::PermissionDenied { .. })
        ));
        assert_eq!(ctx.store.list_contests(false).await.unwrap().len(), 1);
        assert_eq!(ctx.settings().await.current_contest_id, ContestId(1));
    }

    #[tokio::test]
    async fn setting_the_deadline_posts_then_edits_countdown() {
        let ctx = TestContext::new(&["Tama"]);

        let first = set_deadline(&ctx.state, &admin(), &in_days(2)).await.unwrap();
        assert!(first.unix_seconds.is_some());
        let message_id = ctx.settings().await.countdown_message_id.unwrap();

        set_deadline(&ctx.state, &admin(), &in_days(4)).await.unwrap();
        assert_eq!(ctx.settings().await.countdown_message_id, Some(message_id));
        assert_eq!(ctx.notifier.messages().len(), 1);

        clear_deadline(&ctx.state, &admin()).await.unwrap();
        let settings = ctx.settings().await;
        assert_eq!(settings.entry_deadline, None);
        assert_eq!(settings.countdown_message_id, None);
        assert!(ctx.notifier.message(message_id).is_none());
    }

    #[tokio::test]
    async fn prizes_are_trimmed_and_bounded() {
        let ctx = TestContext::new(&["Tama"]);
        assert!(matches!(
            set_prizes(&ctx.state, &user(10), vec!["1B ISK".into()]).await,
            Err(ServiceError::PermissionDenied { .. })
        ));

        let stored = set_prizes(&ctx.state, &admin(), vec![" 1B ISK ".into(), "Skin".into()])
            .await
            .unwrap();
        assert_eq!(stored.prizes, vec!["1B ISK", "Skin"]);
        assert_eq!(ctx.settings().await.prizes, vec!["1B ISK", "Skin"]);

        let too_many = (0..5).map(|idx| format!("prize {idx}")).collect();
        assert!(matches!(
            set_prizes(&ctx.state, &admin(), too_many).await,
            Err(ServiceError::MalformedInput(_))
        ));
        assert_eq!(ctx.settings().await.prizes.len(), 2);
    }

    #[tokio::test]
    async fn entries_and_backups_are_admin_only() {
        let ctx = TestContext::new(&["Tama", "Vey"]);
        submit_entry(&ctx.state, &user(12), "Vey").await.unwrap();
        submit_entry(&ctx.state, &user(11), "Tama").await.unwrap();

        assert!(matches!(
            list_entries(&ctx.state, &user(11)).await,
            Err(ServiceError::PermissionDenied { .. })
        ));
        let listed = list_entries(&ctx.state, &admin()).await.unwrap();
        let users: Vec<_> = listed.entries.iter().map(|entry| entry.user_id).collect();
        assert_eq!(users, vec![UserId(11), UserId(12)]);

        let backup = backup_database(&ctx.state, &admin()).await.unwrap();
        assert!(backup.file_name.ends_with(".db"));
        assert!(std::path::Path::new(&backup.path).exists());
    }

    #[test]
    fn deadlines_parse_in_both_formats() {
        let now = datetime!(2026-02-01 00:00 UTC);

        let naive = parse_deadline("2026-02-16 14:30", offset!(+2), now).unwrap();
        assert_eq!(naive, datetime!(2026-02-16 12:30 UTC));

        let rfc = parse_deadline("2026-02-16T14:30:00-05:00", offset!(UTC), now).unwrap();
        assert_eq!(rfc, datetime!(2026-02-16 19:30 UTC));

        assert!(parse_deadline("2026-01-31 23:59", offset!(UTC), now).is_err());
        assert!(parse_deadline("2026-02-01 00:00", offset!(UTC), now).is_err());
        assert!(parse_deadline("16/02/2026", offset!(UTC), now).is_err());
    }
}
