use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Phases a contest moves through between two `newcontest` actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContestPhase {
    /// Entries are accepted (subject to the soft deadline).
    Open,
    /// Entries are closed and no winner has been drawn.
    Closed,
    /// A winner was drawn; terminal until a new contest starts.
    WinnerPicked,
}

/// Admin actions that move the current contest between phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContestEvent {
    /// End the contest with a FOB system nobody guessed.
    Close,
    /// End the contest with a FOB system that at least one entry matched.
    DrawWinner,
    /// Accept entries again after a close without winner.
    Reopen,
    /// Supersede the current contest with a fresh one.
    StartNew,
}

/// Error returned when attempting to apply an invalid transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// The phase the contest was in when the invalid event was received.
    pub from: ContestPhase,
    /// The event that cannot be applied from this phase.
    pub event: ContestEvent,
}

impl ContestPhase {
    /// Compute the phase reached by applying `event`, if the transition is valid.
    pub fn apply(self, event: ContestEvent) -> Result<ContestPhase, InvalidTransition> {
        let next = match (self, event) {
            (_, ContestEvent::StartNew) => ContestPhase::Open,
            (ContestPhase::Open, ContestEvent::Close) => ContestPhase::Closed,
            (ContestPhase::Open, ContestEvent::DrawWinner) => ContestPhase::WinnerPicked,
            (ContestPhase::Closed, ContestEvent::Reopen) => ContestPhase::Open,
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        Ok(next)
    }

    /// Whether the explicit open flag allows entries.
    pub fn accepts_entries(self) -> bool {
        self == ContestPhase::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_and_reopen_cycle() {
        let closed = ContestPhase::Open.apply(ContestEvent::Close).unwrap();
        assert_eq!(closed, ContestPhase::Closed);
        assert_eq!(closed.apply(ContestEvent::Reopen).unwrap(), ContestPhase::Open);
    }

    #[test]
    fn winner_is_terminal_until_new_contest() {
        let won = ContestPhase::Open.apply(ContestEvent::DrawWinner).unwrap();
        assert_eq!(won, ContestPhase::WinnerPicked);

        for event in [ContestEvent::Close, ContestEvent::DrawWinner, ContestEvent::Reopen] {
            assert_eq!(
                won.apply(event),
                Err(InvalidTransition {
                    from: ContestPhase::WinnerPicked,
                    event,
                })
            );
        }
        assert_eq!(won.apply(ContestEvent::StartNew).unwrap(), ContestPhase::Open);
    }

    #[test]
    fn new_contest_is_always_allowed() {
        for phase in [ContestPhase::Open, ContestPhase::Closed, ContestPhase::WinnerPicked] {
            assert_eq!(phase.apply(ContestEvent::StartNew).unwrap(), ContestPhase::Open);
        }
    }

    #[test]
    fn invalid_transitions_are_rejected() {
        assert!(ContestPhase::Open.apply(ContestEvent::Reopen).is_err());
        assert!(ContestPhase::Closed.apply(ContestEvent::Close).is_err());
        assert!(ContestPhase::Closed.apply(ContestEvent::DrawWinner).is_err());
    }

    #[test]
    fn only_open_accepts_entries() {
        assert!(ContestPhase::Open.accepts_entries());
        assert!(!ContestPhase::Closed.accepts_entries());
        assert!(!ContestPhase::WinnerPicked.accepts_entries());
    }
}
