use crate::error::StoreResult;
use crate::game::persistence::PersistenceStore;
use crate::model::{GameMode, PersistentStats, SessionRecord};
use log::{error, warn};
use serde::de::DeserializeOwned;
use std::rc::Rc;

pub const STATS_KEY: &str = "stats";
pub const SESSIONS_KEY: &str = "sessions";
const HIGH_SCORE_LIMIT: usize = 20;

/// Loads and saves lifetime stats and the finished-session table.
pub struct StatsManager {
    store: Rc<dyn PersistenceStore>,
    sessions: Vec<SessionRecord>,
}

impl std::fmt::Debug for StatsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StatsManager {{ sessions: {} }}", self.sessions.len())
    }
}

impl StatsManager {
    pub fn new(store: Rc<dyn PersistenceStore>) -> Self {
        let sessions = load_blob(store.as_ref(), SESSIONS_KEY).unwrap_or_default();
        Self { store, sessions }
    }

    /// Lifetime stats; missing or unreadable blobs start from zero.
    pub fn load_stats(&self) -> PersistentStats {
        load_blob(self.store.as_ref(), STATS_KEY).unwrap_or_default()
    }

    pub fn save_stats(&self, stats: &PersistentStats) -> StoreResult<()> {
        let contents = serde_json::to_string(stats)?;
        self.store.save(STATS_KEY, &contents)
    }

    fn save_sessions(&self) -> StoreResult<()> {
        let contents = serde_json::to_string_pretty(&self.sessions)?;
        self.store.save(SESSIONS_KEY, &contents)
    }

    pub fn record_session(&mut self, record: SessionRecord) -> StoreResult<()> {
        self.sessions.push(record);

        // Highest score first; earlier sessions win ties
        self.sessions.sort_by(|a, b| {
            b.final_score
                .cmp(&a.final_score)
                .then(a.timestamp.cmp(&b.timestamp))
        });

        // Keep only the top scores per mode
        let mut kept_per_mode = std::collections::HashMap::new();
        self.sessions.retain(|session| {
            let kept = kept_per_mode.entry(session.mode).or_insert(0usize);
            *kept += 1;
            *kept <= HIGH_SCORE_LIMIT
        });

        self.save_sessions()
    }

    pub fn get_high_scores(&self, mode: GameMode, limit: usize) -> Vec<SessionRecord> {
        self.sessions
            .iter()
            .filter(|session| session.mode == mode)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Wipes lifetime stats and the session table. User initiated only.
    pub fn reset(&mut self) -> StoreResult<()> {
        self.sessions.clear();
        self.save_sessions()?;
        self.save_stats(&PersistentStats::default())
    }
}

fn load_blob<T: DeserializeOwned>(store: &dyn PersistenceStore, key: &str) -> Option<T> {
    match store.load(key) {
        Ok(Some(contents)) => match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(target: "stats", "Ignoring unreadable {} blob: {}", key, err);
                None
            }
        },
        Ok(None) => None,
        Err(err) => {
            error!(target: "stats", "Could not load {}: {}", key, err);
            None
        }
    }
}
