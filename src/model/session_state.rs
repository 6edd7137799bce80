use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Countdown, Difficulty, GameMode};

/// Per-session counters. Replaced wholesale whenever the mode or
/// difficulty changes or the player starts over.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionState {
    pub session_id: Uuid,
    pub score: u32,
    pub streak: u32,
    pub rounds_played: u32,
    pub mode: GameMode,
    pub difficulty: Difficulty,
    /// Survival mode only.
    pub lives_remaining: Option<u32>,
    /// Timed mode only.
    pub countdown: Option<Countdown>,
}

impl SessionState {
    pub fn new(mode: GameMode, difficulty: Difficulty) -> Self {
        Self {
            session_id: Uuid::nil(),
            score: 0,
            streak: 0,
            rounds_played: 0,
            mode,
            difficulty,
            lives_remaining: mode.starting_lives(),
            countdown: mode.time_limit().map(Countdown::new),
        }
    }

    pub fn with_session_id(mut self, session_id: Uuid) -> Self {
        self.session_id = session_id;
        self
    }

    pub fn time_remaining_secs(&self) -> Option<u32> {
        self.countdown.as_ref().map(Countdown::remaining_secs)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(GameMode::default(), Difficulty::default())
    }
}
