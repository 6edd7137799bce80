use crate::game::persistence::PersistenceStore;
use crate::model::{Difficulty, GameMode, SettingsChange};
use log::warn;
use serde::{Deserialize, Serialize};

pub const SETTINGS_KEY: &str = "settings";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_version")]
    version: u32,

    #[serde(default = "default_true")]
    pub sound: bool,

    #[serde(default = "default_true")]
    pub animations: bool,

    #[serde(default = "default_true")]
    pub confetti: bool,

    #[serde(default)]
    pub difficulty: Difficulty,

    #[serde(default)]
    pub mode: GameMode,

    #[serde(default)]
    pub tutorial_seen: bool,
}

// Helper functions for default values
fn default_version() -> u32 {
    2
}
fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: default_version(),
            sound: true,
            animations: true,
            confetti: true,
            difficulty: Difficulty::default(),
            mode: GameMode::default(),
            tutorial_seen: false,
        }
    }
}

impl Settings {
    pub fn load(store: &dyn PersistenceStore) -> Self {
        match store.load(SETTINGS_KEY) {
            Ok(Some(contents)) => match serde_json::from_str::<Settings>(&contents) {
                Ok(mut settings) => {
                    settings.migrate();
                    return settings;
                }
                Err(err) => warn!(target: "stats", "Ignoring unreadable settings: {}", err),
            },
            Ok(None) => (),
            Err(err) => warn!(target: "stats", "Could not load settings: {}", err),
        }
        Settings::default()
    }

    pub fn save(&self, store: &dyn PersistenceStore) -> crate::error::StoreResult<()> {
        let contents = serde_json::to_string(self)?;
        store.save(SETTINGS_KEY, &contents)
    }

    pub fn apply(&mut self, change: &SettingsChange) {
        if let Some(sound) = change.sound {
            self.sound = sound;
        }
        if let Some(animations) = change.animations {
            self.animations = animations;
        }
        if let Some(confetti) = change.confetti {
            self.confetti = confetti;
        }
        if let Some(tutorial_seen) = change.tutorial_seen {
            self.tutorial_seen = tutorial_seen;
        }
    }

    fn migrate(&mut self) {
        // version 1 blobs only had the three toggles
        if self.version < 2 {
            self.version = 2;
        }
    }

    pub fn is_debug_mode() -> bool {
        std::env::var("DEBUG").map(|v| v == "1").unwrap_or(false)
    }

    pub fn seed_from_env() -> Option<u64> {
        std::env::var("SEED").ok().and_then(|v| v.parse::<u64>().ok())
    }
}
