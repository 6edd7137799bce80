use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::CreatureRecord;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum HintKind {
    Type,
    Generation,
    FirstLetter,
    Length,
}

impl HintKind {
    /// Hints are handed out in this order, one per request.
    pub const ORDER: [HintKind; 4] = [
        HintKind::Type,
        HintKind::Generation,
        HintKind::FirstLetter,
        HintKind::Length,
    ];

    pub fn next_unrevealed(revealed: &[HintKind]) -> Option<HintKind> {
        Self::ORDER
            .iter()
            .copied()
            .find(|kind| !revealed.contains(kind))
    }

    pub fn text_for(&self, creature: &CreatureRecord) -> String {
        match self {
            HintKind::Type => format!(
                "Type: {}",
                creature.types.iter().map(|t| t.to_uppercase()).join("/")
            ),
            HintKind::Generation => {
                format!("Generation: {}", generation_label(&creature.generation_label))
            }
            HintKind::FirstLetter => format!(
                "First letter: {}",
                creature
                    .name
                    .chars()
                    .next()
                    .map(|c| c.to_uppercase().collect::<String>())
                    .unwrap_or_default()
            ),
            HintKind::Length => format!("Name length: {} letters", creature.name_length()),
        }
    }
}

/// "generation-iv" -> "Gen IV"
fn generation_label(raw: &str) -> String {
    match raw.strip_prefix("generation-") {
        Some(numeral) => format!("Gen {}", numeral.to_uppercase()),
        None => raw.to_string(),
    }
}
