use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use super::{AchievementId, Difficulty, GameMode, ACHIEVEMENTS};

/// Lifetime counters that survive across sessions.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PersistentStats {
    #[serde(default)]
    pub total_guesses: u32,
    #[serde(default)]
    pub correct_guesses: u32,
    #[serde(default)]
    pub best_score: u32,
    #[serde(default)]
    pub best_streak: u32,
    #[serde(default, alias = "achievements")]
    pub unlocked_achievements: BTreeSet<AchievementId>,
    #[serde(default)]
    pub last_played: Option<i64>,
}

impl PersistentStats {
    /// Percentage of guesses that were correct, rounded.
    pub fn accuracy(&self) -> u32 {
        if self.total_guesses == 0 {
            return 0;
        }
        (self.correct_guesses as f64 / self.total_guesses as f64 * 100.0).round() as u32
    }

    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.unlocked_achievements.contains(&id)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SessionOverReason {
    Timeout,
    OutOfLives,
}

/// A finished session, as kept in the high score table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionRecord {
    pub session_id: Uuid,
    pub final_score: u32,
    pub best_streak: u32,
    pub rounds_played: u32,
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub reason: SessionOverReason,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementStatus {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
    pub unlocked: bool,
}

/// What a stats screen shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSummary {
    pub creatures_caught: u32,
    pub accuracy_percent: u32,
    pub best_score: u32,
    pub best_streak: u32,
    pub achievements: Vec<AchievementStatus>,
    pub last_played: Option<String>,
}

impl From<&PersistentStats> for StatsSummary {
    fn from(stats: &PersistentStats) -> Self {
        StatsSummary {
            creatures_caught: stats.correct_guesses,
            accuracy_percent: stats.accuracy(),
            best_score: stats.best_score,
            best_streak: stats.best_streak,
            achievements: ACHIEVEMENTS
                .iter()
                .map(|achievement| AchievementStatus {
                    id: achievement.id,
                    name: achievement.name,
                    description: achievement.description,
                    unlocked: stats.is_unlocked(achievement.id),
                })
                .collect(),
            last_played: stats.last_played.and_then(|timestamp| {
                Local
                    .timestamp_opt(timestamp, 0)
                    .single()
                    .map(|date| date.format("%Y-%m-%d %H:%M").to_string())
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_rounds_and_handles_zero() {
        let mut stats = PersistentStats::default();
        assert_eq!(stats.accuracy(), 0);

        stats.total_guesses = 3;
        stats.correct_guesses = 2;
        assert_eq!(stats.accuracy(), 67);
    }

    #[test]
    fn test_loads_blob_with_legacy_achievements_key() {
        let blob = r#"{
            "total_guesses": 12,
            "correct_guesses": 4,
            "best_score": 40,
            "best_streak": 3,
            "achievements": ["first_catch"]
        }"#;
        let stats: PersistentStats = serde_json::from_str(blob).unwrap();
        assert!(stats.is_unlocked(AchievementId::FirstCatch));
        assert_eq!(stats.last_played, None);
    }

    #[test]
    fn test_summary_lists_every_achievement() {
        let mut stats = PersistentStats::default();
        stats.unlocked_achievements.insert(AchievementId::Streak5);
        stats.last_played = Some(1_700_000_000);

        let summary = StatsSummary::from(&stats);
        assert_eq!(summary.achievements.len(), 7);
        let unlocked: Vec<_> = summary
            .achievements
            .iter()
            .filter(|a| a.unlocked)
            .map(|a| a.id)
            .collect();
        assert_eq!(unlocked, vec![AchievementId::Streak5]);
        assert!(summary.last_played.is_some());
    }
}
