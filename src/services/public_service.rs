//! Service helpers that expose read-only projections of the contest to participants.

use time::OffsetDateTime;

use crate::{
    dto::{
        contest::{
            CommandHelp, ContestStatusResponse, ContestSummary, HelpResponse, PrizesResponse,
            RulesResponse, RulesSection, SystemsResponse, UtcNowResponse,
        },
        format_timestamp,
    },
    error::ServiceError,
    state::SharedState,
};

/// Every system a guess may name, sorted alphabetically.
pub fn allowed_systems(state: &SharedState) -> SystemsResponse {
    SystemsResponse {
        systems: state.systems().sorted_names(),
    }
}

/// Autocomplete candidates for a partially typed system name.
pub fn suggest_systems(state: &SharedState, query: &str) -> SystemsResponse {
    SystemsResponse {
        systems: state.systems().suggest(query),
    }
}

/// Prizes of the current contest, in announcement order.
pub async fn prizes(state: &SharedState) -> Result<PrizesResponse, ServiceError> {
    let settings = state.settings().await?;
    Ok(PrizesResponse {
        prizes: settings.prizes,
    })
}

/// Static contest rules.
pub fn rules() -> RulesResponse {
    let section = |name: &str, body: &str| RulesSection {
        name: name.to_string(),
        body: body.to_string(),
    };

    RulesResponse {
        title: "Black Rabbits Guristas FOB Contest".into(),
        description: "Predict the system where the next Guristas FOB will spawn.".into(),
        sections: vec![
            section(
                "How to enter",
                "Use /enter with a system from the allowed list. One guess per pilot, \
                 and each system can only be claimed by one pilot.",
            ),
            section(
                "Prizes",
                "Use /prizes to see what the winner receives.",
            ),
            section(
                "Contest timing",
                "Entries close at the announced deadline or when an admin closes the contest, \
                 whichever comes first. Use /conteststatus to check the countdown.",
            ),
            section(
                "Winner selection",
                "When the FOB spawns, an admin runs /endcontest with its system. \
                 The pilot who guessed that system wins. If nobody guessed it, there is no winner.",
            ),
        ],
        footer: "Fly dangerous o7".into(),
    }
}

/// Command reference, grouped by who may run each command.
pub fn help() -> HelpResponse {
    let command = |name: &str, description: &str, route: &str| CommandHelp {
        command: format!("/{name}"),
        description: description.to_string(),
        route: route.to_string(),
    };

    HelpResponse {
        title: "FOB Contest Bot Commands".into(),
        description: "Commands for the Guristas FOB Contest".into(),
        user_commands: vec![
            command("allowedsystems", "Show the list of allowed FOB systems", "GET /contest/systems"),
            command("contesthistory", "Show history of all contests", "GET /contest/history"),
            command("conteststatus", "Show current contest status", "GET /contest/status"),
            command("enter", "Enter the contest with your system guess", "POST /contest/entries"),
            command("myguess", "Show your current entry", "GET /contest/entries/me"),
            command("pastwinners", "Show previous contest winners", "GET /contest/winners"),
            command("prizes", "Show prize information", "GET /contest/prizes"),
            command("rules", "Show contest rules", "GET /contest/rules"),
            command("utcnow", "Show current UTC time", "GET /contest/time"),
        ],
        admin_commands: vec![
            command("backupdb", "Back up the database", "POST /admin/backup"),
            command("cleardeadline", "Remove entry deadline", "DELETE /admin/deadline"),
            command("endcontest", "Close entries and pick winner", "POST /admin/contest/end"),
            command("listentries", "List all entries", "GET /admin/entries"),
            command("newcontest", "Start a new contest", "POST /admin/contest/new"),
            command("opencontest", "Re-open entries", "POST /admin/contest/open"),
            command("setdeadline", "Set entry deadline", "PUT /admin/deadline"),
            command("setprizes", "Set the ordered prize list (1-4 prizes)", "PUT /admin/prizes"),
        ],
        footer: "Use /helpcontest anytime to see this list".into(),
    }
}

/// Snapshot of the current contest: phase, deadline, entry count and outcome.
pub async fn contest_status(state: &SharedState) -> Result<ContestStatusResponse, ServiceError> {
    let settings = state.settings().await?;
    let contest_id = settings.current_contest_id;
    let store = state.store();
    let contest = store.find_contest(contest_id).await?;
    let entry_count = store.count_entries(contest_id).await?;

    let (opened_at, winner_user_id, winner_system) = match contest {
        Some(contest) => (
            Some(format_timestamp(contest.opened_at)),
            contest.winner_user_id,
            contest.winner_system,
        ),
        None => (None, None, None),
    };

    Ok(ContestStatusResponse {
        contest_id,
        opened_at,
        phase: settings.phase(),
        contest_open: settings.contest_open,
        winner_picked: settings.winner_picked,
        entry_deadline: settings.entry_deadline.map(format_timestamp),
        deadline_passed: settings.deadline_elapsed(OffsetDateTime::now_utc()),
        entry_count,
        fob_system: settings.fob_system,
        winner_user_id,
        winner_system,
    })
}

/// All contests, newest first.
pub async fn contest_history(state: &SharedState) -> Result<Vec<ContestSummary>, ServiceError> {
    list_contests(state, false).await
}

/// Contests that produced a winner, newest first.
pub async fn past_winners(state: &SharedState) -> Result<Vec<ContestSummary>, ServiceError> {
    list_contests(state, true).await
}

/// Current server time.
pub fn utc_now() -> UtcNowResponse {
    let now = OffsetDateTime::now_utc();
    UtcNowResponse {
        utc: format_timestamp(now),
        unix_seconds: now.unix_timestamp(),
    }
}

async fn list_contests(
    state: &SharedState,
    winners_only: bool,
) -> Result<Vec<ContestSummary>, ServiceError> {
    Ok(state
        .store()
        .list_contests(winners_only)
        .await?
        .into_iter()
        .map(ContestSummary::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dao::{contest_store::SettingKey, models::UserId},
        services::{
            admin_service::{end_contest, new_contest},
            entry_service::submit_entry,
        },
        state::lifecycle::ContestPhase,
        test_support::{TestContext, admin, user},
    };

    #[tokio::test]
    async fn status_reflects_entries_and_winner() {
        let ctx = TestContext::new(&["Tama", "Vey"]);

        let fresh = contest_status(&ctx.state).await.unwrap();
        assert_eq!(fresh.phase, ContestPhase::Open);
        assert_eq!(fresh.entry_count, 0);
        assert!(!fresh.deadline_passed);
        assert!(fresh.opened_at.is_some());

        submit_entry(&ctx.state, &user(11), "Tama").await.unwrap();
        submit_entry(&ctx.state, &user(12), "Vey").await.unwrap();
        end_contest(&ctx.state, &admin(), "Tama").await.unwrap();

        let status = contest_status(&ctx.state).await.unwrap();
        assert_eq!(status.phase, ContestPhase::WinnerPicked);
        assert_eq!(status.entry_count, 2);
        assert_eq!(status.fob_system.as_deref(), Some("Tama"));
        assert_eq!(status.winner_user_id, Some(UserId(11)));
        assert_eq!(status.winner_system.as_deref(), Some("Tama"));
    }

    #[tokio::test]
    async fn elapsed_deadline_is_reported() {
        let ctx = TestContext::new(&["Tama"]);
        ctx.put(SettingKey::EntryDeadline, "2020-01-01T00:00:00Z").await;

        let status = contest_status(&ctx.state).await.unwrap();
        assert!(status.deadline_passed);
        assert_eq!(status.entry_deadline.as_deref(), Some("2020-01-01T00:00:00Z"));
        assert_eq!(status.phase, ContestPhase::Open);
    }

    #[tokio::test]
    async fn history_and_winners_are_newest_first() {
        let ctx = TestContext::new(&["Tama", "Vey"]);
        submit_entry(&ctx.state, &user(11), "Tama").await.unwrap();
        end_contest(&ctx.state, &admin(), "Tama").await.unwrap();

        let deadline = format_timestamp(OffsetDateTime::now_utc() + time::Duration::days(2));
        new_contest(&ctx.state, &admin(), &deadline).await.unwrap();
        submit_entry(&ctx.state, &user(12), "Tama").await.unwrap();
        end_contest(&ctx.state, &admin(), "Vey").await.unwrap();

        let history = contest_history(&ctx.state).await.unwrap();
        let ids: Vec<_> = history.iter().map(|contest| contest.contest_id.0).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(history[0].winner_user_id, None);
        assert_eq!(history[0].fob_system.as_deref(), Some("Vey"));

        let winners = past_winners(&ctx.state).await.unwrap();
        assert_eq!(winners.len(), 1);
        assert_eq!(winners[0].winner_user_id, Some(UserId(11)));
    }

    #[tokio::test]
    async fn prizes_fall_back_to_legacy_text() {
        let ctx = TestContext::new(&["Tama"]);
        assert!(prizes(&ctx.state).await.unwrap().prizes.is_empty());

        ctx.put(SettingKey::PrizesText, "500M ISK and a hug").await;
        assert_eq!(
            prizes(&ctx.state).await.unwrap().prizes,
            vec!["500M ISK and a hug"]
        );
    }

    #[test]
    fn systems_are_listed_and_suggested() {
        let ctx = TestContext::new(&["Vey", "Tama", "Old Man Star"]);
        assert_eq!(
            allowed_systems(&ctx.state).systems,
            vec!["Old Man Star", "Tama", "Vey"]
        );
        assert_eq!(suggest_systems(&ctx.state, "MA").systems, vec!["Old Man Star", "Tama"]);
        assert_eq!(suggest_systems(&ctx.state, "").systems.len(), 3);
        assert!(suggest_systems(&ctx.state, "jita").systems.is_empty());
    }

    #[test]
    fn time_and_rules_are_static_projections() {
        let now = utc_now();
        assert!(now.utc.ends_with('Z'));
        assert!(now.unix_seconds > 1_700_000_000);

        let rules = rules();
        assert_eq!(rules.sections.len(), 4);
        assert!(rules.sections[3].body.contains("/endcontest"));
    }

    #[test]
    fn help_lists_user_and_admin_commands_with_their_routes() {
        let help = help();
        let names = |commands: &[CommandHelp]| {
            commands
                .iter()
                .map(|command| command.command.clone())
                .collect::<Vec<_>>()
        };

        assert_eq!(help.user_commands.len(), 9);
        assert_eq!(help.admin_commands.len(), 8);
        assert!(names(&help.user_commands).contains(&"/enter".to_string()));
        assert!(names(&help.admin_commands).contains(&"/endcontest".to_string()));
        assert!(help.admin_commands.iter().all(|command| command.route.contains("/admin/")));
        assert!(help.user_commands.iter().all(|command| command.route.contains("/contest/")));
    }
}
