use log::info;

use crate::error::GameError;
use crate::model::{AchievementId, PersistentStats, SessionState, ACHIEVEMENTS};

pub const POINTS_PER_CATCH: u32 = 10;
pub const HINT_COST: u32 = 5;

/// Every guess, right or wrong, counts towards the lifetime total.
pub fn record_guess(stats: &mut PersistentStats) {
    stats.total_guesses += 1;
}

/// Applies a correct guess to the session and the lifetime records.
pub fn record_catch(session: &mut SessionState, stats: &mut PersistentStats) {
    session.score += POINTS_PER_CATCH;
    session.streak += 1;
    stats.correct_guesses += 1;
    stats.best_score = stats.best_score.max(session.score);
    stats.best_streak = stats.best_streak.max(session.streak);
}

pub fn break_streak(session: &mut SessionState) {
    session.streak = 0;
}

pub fn charge_hint(session: &mut SessionState) -> Result<(), GameError> {
    if session.score < HINT_COST {
        return Err(GameError::InsufficientScore {
            score: session.score,
            cost: HINT_COST,
        });
    }
    session.score -= HINT_COST;
    Ok(())
}

pub fn refund_hint(session: &mut SessionState) {
    session.score += HINT_COST;
}

/// Achievements whose condition holds but that are not yet recorded, in
/// catalog order.
pub fn evaluate_achievements(stats: &PersistentStats, session: &SessionState) -> Vec<AchievementId> {
    ACHIEVEMENTS
        .iter()
        .filter(|achievement| !stats.is_unlocked(achievement.id))
        .filter(|achievement| achievement.is_satisfied(stats, session))
        .map(|achievement| achievement.id)
        .collect()
}

/// Records newly satisfied achievements and returns them. Calling it again
/// without further progress returns nothing.
pub fn unlock_new_achievements(
    stats: &mut PersistentStats,
    session: &SessionState,
) -> Vec<AchievementId> {
    let unlocked = evaluate_achievements(stats, session);
    for id in &unlocked {
        info!(target: "stats", "Achievement unlocked: {}", id.key());
        stats.unlocked_achievements.insert(*id);
    }
    unlocked
}
