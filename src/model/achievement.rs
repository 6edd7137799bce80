use serde::{Deserialize, Serialize};

use super::{PersistentStats, SessionState};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    FirstCatch,
    TenCatches,
    FiftyCatches,
    HundredCatches,
    #[serde(rename = "streak_5")]
    Streak5,
    #[serde(rename = "streak_10")]
    Streak10,
    HighScore,
}

pub struct Achievement {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
    condition: fn(&PersistentStats, &SessionState) -> bool,
}

impl Achievement {
    pub fn is_satisfied(&self, stats: &PersistentStats, session: &SessionState) -> bool {
        (self.condition)(stats, session)
    }
}

impl std::fmt::Debug for Achievement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Achievement({:?})", self.id)
    }
}

pub static ACHIEVEMENTS: [Achievement; 7] = [
    Achievement {
        id: AchievementId::FirstCatch,
        name: "First Catch",
        description: "Guess your first creature",
        condition: |stats, _| stats.correct_guesses >= 1,
    },
    Achievement {
        id: AchievementId::TenCatches,
        name: "Rookie Trainer",
        description: "Guess 10 creatures",
        condition: |stats, _| stats.correct_guesses >= 10,
    },
    Achievement {
        id: AchievementId::FiftyCatches,
        name: "Creature Master",
        description: "Guess 50 creatures",
        condition: |stats, _| stats.correct_guesses >= 50,
    },
    Achievement {
        id: AchievementId::HundredCatches,
        name: "Creature Legend",
        description: "Guess 100 creatures",
        condition: |stats, _| stats.correct_guesses >= 100,
    },
    Achievement {
        id: AchievementId::Streak5,
        name: "Streak of 5",
        description: "Get 5 correct guesses in a row",
        condition: |_, session| session.streak >= 5,
    },
    Achievement {
        id: AchievementId::Streak10,
        name: "Streak of 10",
        description: "Get 10 correct guesses in a row",
        condition: |_, session| session.streak >= 10,
    },
    Achievement {
        id: AchievementId::HighScore,
        name: "High Score",
        description: "Reach 100 points",
        condition: |_, session| session.score >= 100,
    },
];

impl AchievementId {
    pub fn definition(&self) -> &'static Achievement {
        ACHIEVEMENTS
            .iter()
            .find(|achievement| achievement.id == *self)
            .unwrap_or(&ACHIEVEMENTS[0])
    }

    pub fn key(&self) -> &'static str {
        match self {
            AchievementId::FirstCatch => "first_catch",
            AchievementId::TenCatches => "ten_catches",
            AchievementId::FiftyCatches => "fifty_catches",
            AchievementId::HundredCatches => "hundred_catches",
            AchievementId::Streak5 => "streak_5",
            AchievementId::Streak10 => "streak_10",
            AchievementId::HighScore => "high_score",
        }
    }
}
