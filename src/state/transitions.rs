use std::future::Future;

use tracing::info;

use crate::{
    error::ServiceError,
    state::{
        SharedState,
        lifecycle::{ContestEvent, ContestPhase},
        settings::Settings,
    },
};

/// Validate `event` against the current phase, then run `work` while holding the lifecycle gate.
///
/// `work` receives the settings the guard was evaluated against and is
/// responsible for persisting the new flags. Returns the work's value and the
/// phase the event leads to.
pub async fn run_transition<F, Fut, T>(
    state: &SharedState,
    event: ContestEvent,
    work: F,
) -> Result<(T, ContestPhase), ServiceError>
where
    F: FnOnce(Settings) -> Fut,
    Fut: Future<Output = Result<T, ServiceError>>,
{
    run_decided_transition(state, event, move |settings| {
        let pending = work(settings);
        async move { Ok((pending.await?, event)) }
    })
    .await
}

/// Like [`run_transition`], but `work` reports which event actually happened.
///
/// `guard` is checked before `work` runs; the event returned by `work` must be
/// valid from the same phase and decides the phase reached.
pub async fn run_decided_transition<F, Fut, T>(
    state: &SharedState,
    guard: ContestEvent,
    work: F,
) -> Result<(T, ContestPhase), ServiceError>
where
    F: FnOnce(Settings) -> Fut,
    Fut: Future<Output = Result<(T, ContestEvent), ServiceError>>,
{
    let gate = state.lifecycle_gate().lock().await;
    let settings = state.settings().await?;
    let from = settings.phase();
    let contest_id = settings.current_contest_id;
    from.apply(guard)?;

    let (value, event) = work(settings).await?;
    let next = from.apply(event)?;
    drop(gate);

    info!(
        contest_id = %contest_id,
        from = ?from,
        to = ?next,
        event = ?event,
        "contest transition applied"
    );
    Ok((value, next))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::{dao::contest_store::SettingKey, test_support::TestContext};

    #[tokio::test]
    async fn decided_event_sets_the_resulting_phase() {
        let ctx = TestContext::new(&["Tama"]);
        let (value, phase) =
            run_decided_transition(&ctx.state, ContestEvent::Close, |_| async {
                Ok((7, ContestEvent::DrawWinner))
            })
            .await
            .unwrap();
        assert_eq!((value, phase), (7, ContestPhase::WinnerPicked));
    }

    #[tokio::test]
    async fn guard_failure_skips_the_work() {
        let ctx = TestContext::new(&["Tama"]);
        ctx.put(SettingKey::ContestOpen, "0").await;

        let ran = AtomicBool::new(false);
        let flag = &ran;
        let result = run_transition(&ctx.state, ContestEvent::Close, move |_| async move {
            flag.store(true, Ordering::SeqCst);
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(ServiceError::AlreadyClosed)));
        assert!(!ran.load(Ordering::SeqCst));
    }
}
