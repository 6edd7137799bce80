use super::type_chart::{attack_names, resistance, type_symbol, weakness};
use super::CreatureRecord;

/// Highest id in the full collection, printed as "25/898".
pub const COLLECTION_SIZE: u32 = 898;
const HEAVY_ATTACK_BONUS: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeBadge {
    pub name: String,
    pub symbol: &'static str,
}

impl TypeBadge {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            symbol: type_symbol(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardAttack {
    pub name: &'static str,
    pub cost: Vec<TypeBadge>,
    pub damage: u32,
}

/// The card shown once a round is revealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradingCard {
    pub title: String,
    pub number: String,
    pub hp: u32,
    pub stage: &'static str,
    pub image_ref: String,
    pub types: Vec<TypeBadge>,
    pub attacks: [CardAttack; 2],
    pub weakness: TypeBadge,
    pub resistance: Option<TypeBadge>,
    pub height: String,
    pub weight: String,
    pub collection: String,
}

impl TradingCard {
    pub fn from_creature(creature: &CreatureRecord) -> Self {
        let primary = creature.primary_type();
        let secondary = creature.secondary_type().unwrap_or(primary);
        let [light, heavy] = attack_names(primary);

        TradingCard {
            title: creature.name.to_uppercase(),
            number: format!("#{:03}", creature.id),
            hp: creature.hp,
            stage: creature.evolution_stage.label(),
            image_ref: creature.image_ref.clone(),
            types: creature.types.iter().map(|t| TypeBadge::new(t)).collect(),
            attacks: [
                CardAttack {
                    name: light,
                    cost: vec![TypeBadge::new(primary)],
                    damage: creature.attack_stat,
                },
                CardAttack {
                    name: heavy,
                    cost: vec![TypeBadge::new(primary), TypeBadge::new(secondary)],
                    damage: creature.attack_stat.saturating_add(HEAVY_ATTACK_BONUS),
                },
            ],
            weakness: TypeBadge::new(weakness(primary)),
            resistance: resistance(primary).map(TypeBadge::new),
            height: format!("{:.1} m", creature.height_deci as f64 / 10.0),
            weight: format!("{:.1} kg", creature.weight_deci as f64 / 10.0),
            collection: format!("{}/{}", creature.id, COLLECTION_SIZE),
        }
    }
}
