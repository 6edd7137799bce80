use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum RoundPhase {
    #[default]
    AwaitingRound,
    Guessing,
    Revealed,
    SessionOver,
}

impl RoundPhase {
    pub fn accepts_guesses(&self) -> bool {
        *self == RoundPhase::Guessing
    }

    /// Phases in which a new round may be started.
    pub fn can_start_round(&self) -> bool {
        matches!(self, RoundPhase::AwaitingRound | RoundPhase::Revealed)
    }

    /// The timed-mode countdown only runs while a round is on screen.
    pub fn runs_clock(&self) -> bool {
        matches!(self, RoundPhase::Guessing | RoundPhase::Revealed)
    }
}

/// Identifies one creature fetch. Results carrying an older ticket are stale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FetchTicket(pub u64);

impl FetchTicket {
    pub fn next(&self) -> FetchTicket {
        FetchTicket(self.0 + 1)
    }
}
