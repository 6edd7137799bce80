use serde::{Deserialize, Serialize};

use super::{CreatureRecord, HintKind};

pub const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Round {
    target: CreatureRecord,
    pub attempts_remaining: u32,
    pub hints_revealed: Vec<HintKind>,
}

impl Round {
    pub fn new(target: CreatureRecord) -> Self {
        Self {
            target,
            attempts_remaining: MAX_ATTEMPTS,
            hints_revealed: Vec::new(),
        }
    }

    pub fn target(&self) -> &CreatureRecord {
        &self.target
    }

    /// Reveals the next hint in the fixed order, or `None` once all four
    /// have been shown.
    pub fn reveal_next_hint(&mut self) -> Option<HintKind> {
        let next = HintKind::next_unrevealed(&self.hints_revealed)?;
        self.hints_revealed.push(next);
        Some(next)
    }

    pub fn use_attempt(&mut self) -> u32 {
        self.attempts_remaining = self.attempts_remaining.saturating_sub(1);
        self.attempts_remaining
    }
}
