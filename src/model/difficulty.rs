use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Inclusive creature id range the provider is asked to pick from.
    pub fn id_range(&self) -> RangeInclusive<u32> {
        match self {
            Difficulty::Easy => 1..=151,
            Difficulty::Medium => 1..=386,
            Difficulty::Hard => 1..=898,
        }
    }

    pub fn parse(value: &str) -> Option<Difficulty> {
        match value.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}
