//! Participant entries: the validation pipeline behind `/enter` and `/myguess`.

use time::OffsetDateTime;
use tracing::{info, warn};

use crate::{
    dao::{
        models::{ContestId, EntryEntity, UserId},
        storage::{ConstraintViolation, StorageError},
    },
    dto::contest::EntryResponse,
    error::ServiceError,
    state::{Caller, SharedState},
};

/// Validate and record a guess for the current contest.
///
/// Checks run in a fixed order and stop at the first failure: allow-list,
/// open flag, deadline, existing entry of the caller, system already claimed.
/// The pre-checks only produce friendlier errors; the database unique keys
/// decide races between concurrent submissions.
pub async fn submit_entry(
    state: &SharedState,
    caller: &Caller,
    raw_system: &str,
) -> Result<EntryResponse, ServiceError> {
    let system = state
        .systems()
        .resolve(raw_system)
        .ok_or(ServiceError::InvalidSystem)?;

    let settings = state.settings().await?;
    if !settings.phase().accepts_entries() {
        return Err(ServiceError::ContestClosed);
    }

    let now = OffsetDateTime::now_utc();
    if let Some(deadline) = settings.entry_deadline.filter(|deadline| now >= *deadline) {
        return Err(ServiceError::DeadlinePassed { deadline });
    }

    let contest_id = settings.current_contest_id;
    let store = state.store();
    if let Some(existing) = store.find_entry(contest_id, caller.user_id).await? {
        return Err(ServiceError::DuplicateUser {
            existing: existing.system_name,
        });
    }
    if store
        .find_entry_by_system(contest_id, system.clone())
        .await?
        .is_some()
    {
        return Err(ServiceError::SystemTaken { system });
    }

    let entry = EntryEntity {
        contest_id,
        user_id: caller.user_id,
        system_name: system,
        entered_at: now,
    };

    match store.insert_entry(entry.clone()).await {
        Ok(()) => {
            info!(
                contest_id = %contest_id,
                user_id = %caller.user_id,
                system = %entry.system_name,
                "entry recorded"
            );
            Ok(entry.into())
        }
        Err(StorageError::Constraint(violation)) => {
            Err(conflict_error(state, contest_id, caller.user_id, entry.system_name, violation).await)
        }
        Err(err) => Err(err.into()),
    }
}

/// The caller's entry in the current contest.
pub async fn my_entry(state: &SharedState, caller: &Caller) -> Result<EntryResponse, ServiceError> {
    let settings = state.settings().await?;
    state
        .store()
        .find_entry(settings.current_contest_id, caller.user_id)
        .await?
        .map(EntryResponse::from)
        .ok_or_else(|| {
            ServiceError::NotFound(
                "You have not entered the current contest yet. Use /enter to submit your system guess."
                    .into(),
            )
        })
}

/// Translate a unique-key rejection into the error the pre-checks would have produced.
async fn conflict_error(
    state: &SharedState,
    contest_id: ContestId,
    user_id: UserId,
    system: String,
    violation: ConstraintViolation,
) -> ServiceError {
    warn!(
        contest_id = %contest_id,
        user_id = %user_id,
        system = %system,
        ?violation,
        "concurrent entry lost the race"
    );
    match violation {
        ConstraintViolation::SystemName => ServiceError::SystemTaken { system },
        ConstraintViolation::UserEntry => match state.store().find_entry(contest_id, user_id).await {
            Ok(Some(existing)) => ServiceError::DuplicateUser {
                existing: existing.system_name,
            },
            Ok(None) => ServiceError::DuplicateUser { existing: system },
            Err(err) => err.into(),
        },
    }
}
