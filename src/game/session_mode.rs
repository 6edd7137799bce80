use log::debug;

use crate::model::{
    Difficulty, GameMode, RoundPhase, SessionOverReason, SessionState, TickOutcome,
};

/// What the mode rules decided after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeVerdict {
    Continue,
    TimerChanged(u32),
    LifeLost { lives_remaining: u32 },
    SessionOver(SessionOverReason),
}

pub struct SessionModeController;

impl SessionModeController {
    /// A fresh session for `mode`, with the previous countdown cancelled so
    /// a stray tick cannot reach it.
    pub fn reset(previous: &mut SessionState, mode: GameMode, difficulty: Difficulty) -> SessionState {
        Self::cancel_timer(previous);
        SessionState::new(mode, difficulty)
    }

    /// One elapsed second. The clock only runs while a round is on screen.
    pub fn on_tick(session: &mut SessionState, phase: RoundPhase) -> ModeVerdict {
        if !phase.runs_clock() {
            return ModeVerdict::Continue;
        }
        let Some(countdown) = session.countdown.as_mut() else {
            return ModeVerdict::Continue;
        };
        match countdown.tick() {
            TickOutcome::Ignored => ModeVerdict::Continue,
            TickOutcome::Running(remaining) => ModeVerdict::TimerChanged(remaining.as_secs() as u32),
            TickOutcome::Expired => ModeVerdict::SessionOver(SessionOverReason::Timeout),
        }
    }

    /// A round ended with every attempt used up.
    pub fn on_round_lost(session: &mut SessionState) -> ModeVerdict {
        match session.mode {
            GameMode::Survival => {
                let lives = session.lives_remaining.unwrap_or(0).saturating_sub(1);
                session.lives_remaining = Some(lives);
                debug!(target: "game_state", "Life lost; {} remaining", lives);
                if lives == 0 {
                    ModeVerdict::SessionOver(SessionOverReason::OutOfLives)
                } else {
                    ModeVerdict::LifeLost {
                        lives_remaining: lives,
                    }
                }
            }
            GameMode::Normal | GameMode::Timed => ModeVerdict::Continue,
        }
    }

    pub fn cancel_timer(session: &mut SessionState) {
        if let Some(countdown) = session.countdown.as_mut() {
            countdown.cancel();
        }
    }
}
