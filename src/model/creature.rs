use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum EvolutionStage {
    #[default]
    Basic,
    StageOne,
}

impl EvolutionStage {
    pub fn label(&self) -> &'static str {
        match self {
            EvolutionStage::Basic => "Basic",
            EvolutionStage::StageOne => "Stage 1",
        }
    }

    /// A creature that evolves from another species is a stage one card.
    pub fn from_evolves_from(evolves_from: Option<&str>) -> Self {
        match evolves_from {
            None => EvolutionStage::Basic,
            Some(_) => EvolutionStage::StageOne,
        }
    }
}

/// The record a provider returns for one creature. Owned by the round that
/// shows it and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatureRecord {
    pub id: u32,
    pub name: String,
    pub image_ref: String,
    pub types: Vec<String>,
    pub height_deci: u32,
    pub weight_deci: u32,
    pub hp: u32,
    pub attack_stat: u32,
    #[serde(default)]
    pub defense_stat: u32,
    #[serde(default)]
    pub speed_stat: u32,
    #[serde(default)]
    pub abilities: Vec<String>,
    pub generation_label: String,
    #[serde(default)]
    pub evolution_stage: EvolutionStage,
}

impl CreatureRecord {
    pub fn primary_type(&self) -> &str {
        self.types.first().map(String::as_str).unwrap_or("normal")
    }

    pub fn secondary_type(&self) -> Option<&str> {
        self.types.get(1).map(String::as_str)
    }

    /// Number of characters in the name, counted as code points.
    pub fn name_length(&self) -> usize {
        self.name.chars().count()
    }
}
