use log::{trace, warn};

use super::{Round, RoundPhase, SessionState};
use crate::game::persistence::PersistenceStore;

pub const SNAPSHOT_KEY: &str = "game_state";

/// Enough of a session to resume it later. Lifetime stats are saved on
/// their own and are not part of the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GameStateSnapshot {
    pub phase: RoundPhase,
    pub session: SessionState,
    pub round: Option<Round>,
}

impl GameStateSnapshot {
    pub fn new(phase: RoundPhase, session: SessionState, round: Option<Round>) -> Self {
        // a round that vanished cannot be resumed mid-guess
        let phase = match (phase, &round) {
            (RoundPhase::Guessing | RoundPhase::Revealed, None) => RoundPhase::AwaitingRound,
            (phase, _) => phase,
        };
        Self {
            phase,
            session,
            round,
        }
    }

    pub fn save(&self, store: &dyn PersistenceStore) -> bool {
        match serde_json::to_string(self) {
            Ok(contents) => match store.save(SNAPSHOT_KEY, &contents) {
                Ok(()) => true,
                Err(err) => {
                    warn!(target: "game_state", "Could not save snapshot: {}", err);
                    false
                }
            },
            Err(err) => {
                warn!(target: "game_state", "Could not serialize snapshot: {}", err);
                false
            }
        }
    }
}

pub fn load_game_state_snapshot(store: &dyn PersistenceStore) -> Option<GameStateSnapshot> {
    let contents = store.load(SNAPSHOT_KEY).ok().flatten()?;
    match serde_json::from_str::<GameStateSnapshot>(&contents) {
        Ok(snapshot) => {
            trace!(target: "game_state", "Loaded snapshot {:?}", snapshot);
            Some(snapshot)
        }
        Err(err) => {
            warn!(target: "game_state", "Discarding unreadable snapshot: {}", err);
            None
        }
    }
}
