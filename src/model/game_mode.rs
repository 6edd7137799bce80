use serde::{Deserialize, Serialize};

pub const TIMED_MODE_SECONDS: u32 = 60;
pub const SURVIVAL_MODE_LIVES: u32 = 3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum GameMode {
    #[default]
    Normal,
    Timed,
    Survival,
}

impl GameMode {
    pub fn all() -> Vec<GameMode> {
        vec![GameMode::Normal, GameMode::Timed, GameMode::Survival]
    }

    /// Countdown length for modes that run against the clock.
    pub fn time_limit(&self) -> Option<u32> {
        match self {
            GameMode::Timed => Some(TIMED_MODE_SECONDS),
            _ => None,
        }
    }

    pub fn starting_lives(&self) -> Option<u32> {
        match self {
            GameMode::Survival => Some(SURVIVAL_MODE_LIVES),
            _ => None,
        }
    }

    pub fn parse(value: &str) -> Option<GameMode> {
        match value.trim().to_lowercase().as_str() {
            "normal" => Some(GameMode::Normal),
            "timed" => Some(GameMode::Timed),
            "survival" => Some(GameMode::Survival),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GameMode::Normal => "Normal",
            GameMode::Timed => "Timed",
            GameMode::Survival => "Survival",
        }
    }
}
