use std::time::Duration;

use super::{
    AchievementId, CreatureRecord, Difficulty, GameMode, HintKind, PersistentStats,
    SessionOverReason,
};
use crate::error::GameError;
use crate::game::settings::Settings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessOutcome {
    /// Exact match.
    Perfect,
    /// Accepted by fuzzy matching.
    CloseMatch,
    /// Wrong, but at least half similar.
    Warm,
    Miss,
    OutOfAttempts { answer: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEngineEvent {
    SessionStarted {
        mode: GameMode,
        difficulty: Difficulty,
    },
    LoadingStarted,
    FetchFailed {
        message: String,
        retry_after: Duration,
    },
    RoundStarted {
        image_ref: String,
    },
    GuessResult {
        outcome: GuessOutcome,
        similarity: u8,
        attempts_left: u32,
    },
    HintRevealed {
        kind: HintKind,
        text: String,
    },
    RoundRevealed(CreatureRecord),
    AchievementUnlocked(AchievementId),
    ScoreChanged {
        score: u32,
        streak: u32,
    },
    AttemptsChanged(u32),
    TimerChanged(u32),
    LivesChanged(u32),
    SessionOver {
        final_score: u32,
        reason: SessionOverReason,
    },
    StatsChanged(PersistentStats),
    SettingsChanged(Settings),
    CommandRejected(GameError),
}
