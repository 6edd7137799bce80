use std::cell::RefCell;
use std::rc::Rc;

use crate::events::EventHandler;
use crate::model::{
    CreatureRecord, GameEngineEvent, GameMode, HintKind, PersistentStats, MAX_ATTEMPTS,
};

/// Everything a front end shows next to the silhouette, kept current from
/// engine events.
#[derive(Debug, Clone, PartialEq)]
pub struct HudProjection {
    pub mode: GameMode,
    pub score: u32,
    pub streak: u32,
    pub attempts_left: u32,
    pub time_left: Option<u32>,
    pub lives: Option<u32>,
    pub hints: Vec<(HintKind, String)>,
    pub loading: bool,
    pub revealed: Option<CreatureRecord>,
    pub stats: PersistentStats,
    pub session_over: bool,
}

impl Default for HudProjection {
    fn default() -> Self {
        Self {
            mode: GameMode::default(),
            score: 0,
            streak: 0,
            attempts_left: MAX_ATTEMPTS,
            time_left: None,
            lives: None,
            hints: vec![],
            loading: false,
            revealed: None,
            stats: PersistentStats::default(),
            session_over: false,
        }
    }
}

impl HudProjection {
    pub fn new() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::default()))
    }

    /// One status line, e.g. `Score 20 | Streak 2 | Attempts 3 | Time 41s`.
    pub fn status_line(&self) -> String {
        let mut parts = vec![
            format!("Score {}", self.score),
            format!("Streak {}", self.streak),
            format!("Attempts {}", self.attempts_left),
        ];
        if let Some(time_left) = self.time_left {
            parts.push(format!("Time {}s", time_left));
        }
        if let Some(lives) = self.lives {
            parts.push(format!("Lives {}", lives));
        }
        parts.join(" | ")
    }
}

impl EventHandler<GameEngineEvent> for HudProjection {
    fn handle_event(&mut self, event: &GameEngineEvent) {
        match event {
            GameEngineEvent::SessionStarted { mode, .. } => {
                self.mode = *mode;
                self.time_left = None;
                self.lives = None;
                self.session_over = false;
            }
            GameEngineEvent::LoadingStarted => self.loading = true,
            GameEngineEvent::RoundStarted { .. } => {
                self.loading = false;
                self.hints.clear();
                self.revealed = None;
            }
            GameEngineEvent::HintRevealed { kind, text } => self.hints.push((*kind, text.clone())),
            GameEngineEvent::RoundRevealed(creature) => self.revealed = Some(creature.clone()),
            GameEngineEvent::ScoreChanged { score, streak } => {
                self.score = *score;
                self.streak = *streak;
            }
            GameEngineEvent::AttemptsChanged(attempts) => self.attempts_left = *attempts,
            GameEngineEvent::TimerChanged(seconds) => self.time_left = Some(*seconds),
            GameEngineEvent::LivesChanged(lives) => self.lives = Some(*lives),
            GameEngineEvent::SessionOver { .. } => self.session_over = true,
            GameEngineEvent::StatsChanged(stats) => self.stats = stats.clone(),
            _ => (),
        }
    }
}
