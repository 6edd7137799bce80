use std::path::Path;

use log::{debug, info};

use crate::error::ProviderError;
use crate::model::{CreatureRecord, EvolutionStage};

pub trait CreatureProvider {
    fn fetch_creature(&mut self, id: u32) -> Result<CreatureRecord, ProviderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterLookup {
    /// Only ids present in the roster resolve.
    Exact,
    /// Any id resolves by wrapping around the roster.
    Cycling,
}

/// An offline provider backed by a fixed list of records.
#[derive(Debug, Clone)]
pub struct StaticRoster {
    records: Vec<CreatureRecord>,
    lookup: RosterLookup,
}

impl StaticRoster {
    pub fn new(records: Vec<CreatureRecord>, lookup: RosterLookup) -> Self {
        Self { records, lookup }
    }

    /// Parses a JSON array of creature records.
    pub fn from_json(contents: &str, lookup: RosterLookup) -> Result<Self, ProviderError> {
        let records: Vec<CreatureRecord> = serde_json::from_str(contents)
            .map_err(|err| ProviderError::Malformed(err.to_string()))?;
        if records.is_empty() {
            return Err(ProviderError::Malformed("roster is empty".to_string()));
        }
        Ok(Self::new(records, lookup))
    }

    /// Loads a roster file. Random ids wrap around the records, so a roster
    /// that covers only part of a difficulty range still always resolves.
    pub fn from_file(path: &Path) -> Result<Self, ProviderError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|err| ProviderError::Unreadable(format!("{}: {}", path.display(), err)))?;
        let roster = Self::from_json(&contents, RosterLookup::Cycling)?;
        info!(target: "engine", "Loaded {} creatures from {}", roster.len(), path.display());
        Ok(roster)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// A handful of first-generation creatures, enough to play offline.
    pub fn starter_set() -> Self {
        let record = |id: u32,
                      name: &str,
                      types: &[&str],
                      height_deci: u32,
                      weight_deci: u32,
                      hp: u32,
                      attack_stat: u32,
                      evolves_from: Option<&str>| CreatureRecord {
            id,
            name: name.to_string(),
            image_ref: format!(
                "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork/{}.png",
                id
            ),
            types: types.iter().map(|t| t.to_string()).collect(),
            height_deci,
            weight_deci,
            hp,
            attack_stat,
            defense_stat: 0,
            speed_stat: 0,
            abilities: Vec::new(),
            generation_label: "generation-i".to_string(),
            evolution_stage: EvolutionStage::from_evolves_from(evolves_from),
        };

        Self::new(
            vec![
                record(1, "bulbasaur", &["grass", "poison"], 7, 69, 45, 49, None),
                record(4, "charmander", &["fire"], 6, 85, 39, 52, None),
                record(6, "charizard", &["fire", "flying"], 17, 905, 78, 84, Some("charmeleon")),
                record(7, "squirtle", &["water"], 5, 90, 44, 48, None),
                record(25, "pikachu", &["electric"], 4, 60, 35, 55, Some("pichu")),
                record(39, "jigglypuff", &["normal", "fairy"], 5, 55, 115, 45, Some("igglybuff")),
                record(52, "meowth", &["normal"], 4, 42, 40, 45, None),
                record(94, "gengar", &["ghost", "poison"], 15, 405, 60, 65, Some("haunter")),
                record(122, "mr-mime", &["psychic", "fairy"], 13, 545, 40, 45, Some("mime-jr")),
                record(133, "eevee", &["normal"], 3, 65, 55, 55, None),
                record(143, "snorlax", &["normal"], 21, 4600, 160, 110, Some("munchlax")),
                record(150, "mewtwo", &["psychic"], 20, 1220, 106, 110, None),
            ],
            RosterLookup::Cycling,
        )
    }
}

impl CreatureProvider for StaticRoster {
    fn fetch_creature(&mut self, id: u32) -> Result<CreatureRecord, ProviderError> {
        let found = match self.lookup {
            RosterLookup::Exact => self.records.iter().find(|r| r.id == id),
            RosterLookup::Cycling if self.records.is_empty() => None,
            RosterLookup::Cycling => {
                let index = (id.saturating_sub(1) as usize) % self.records.len();
                self.records.get(index)
            }
        };
        debug!(target: "engine", "Roster lookup for id {}: {:?}", id, found.map(|r| &r.name));
        found.cloned().ok_or(ProviderError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_lookup_misses_unknown_ids() {
        let records = StaticRoster::starter_set().records;
        let mut roster = StaticRoster::new(records, RosterLookup::Exact);
        assert_eq!(roster.fetch_creature(25).unwrap().name, "pikachu");
        assert_eq!(roster.fetch_creature(26), Err(ProviderError::NotFound(26)));
    }

    #[test]
    fn test_cycling_lookup_always_resolves() {
        let mut roster = StaticRoster::starter_set();
        let len = roster.len() as u32;
        assert_eq!(roster.fetch_creature(1).unwrap().name, "bulbasaur");
        assert_eq!(roster.fetch_creature(1 + len).unwrap().name, "bulbasaur");
        assert!(roster.fetch_creature(898).is_ok());
    }

    #[test]
    fn test_from_json_fills_optional_fields() {
        let json = r#"[{
            "id": 132,
            "name": "ditto",
            "image_ref": "132.png",
            "types": ["normal"],
            "height_deci": 3,
            "weight_deci": 40,
            "hp": 48,
            "attack_stat": 48,
            "generation_label": "generation-i"
        }]"#;
        let mut roster = StaticRoster::from_json(json, RosterLookup::Exact).unwrap();
        let ditto = roster.fetch_creature(132).unwrap();
        assert_eq!(ditto.evolution_stage, EvolutionStage::Basic);
        assert!(ditto.abilities.is_empty());
    }

    #[test]
    fn test_from_file_resolves_ids_outside_the_roster() {
        let dir = std::env::temp_dir().join(format!("creature-guess-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("roster.json");
        let records = StaticRoster::starter_set().records[..2].to_vec();
        std::fs::write(&path, serde_json::to_string(&records).unwrap()).unwrap();

        let mut roster = StaticRoster::from_file(&path).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.fetch_creature(386).unwrap().name, "charmander");
        std::fs::remove_dir_all(&dir).unwrap();

        assert!(matches!(
            StaticRoster::from_file(&path),
            Err(ProviderError::Unreadable(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            StaticRoster::from_json("[]", RosterLookup::Exact),
            Err(ProviderError::Malformed(_))
        ));
        assert!(matches!(
            StaticRoster::from_json("nope", RosterLookup::Exact),
            Err(ProviderError::Malformed(_))
        ));
    }
}
