mod achievement;
mod creature;
mod difficulty;
mod game_engine_command;
mod game_engine_event;
mod game_mode;
pub mod game_state_snapshot;
mod game_stats;
mod hint;
mod hud_projection;
mod round;
mod round_phase;
mod session_state;
mod timer_state;
mod trading_card;
pub mod type_chart;

pub use achievement::{Achievement, AchievementId, ACHIEVEMENTS};
pub use creature::{CreatureRecord, EvolutionStage};
pub use difficulty::Difficulty;
pub use game_engine_command::{GameEngineCommand, SettingsChange};
pub use game_engine_event::{GameEngineEvent, GuessOutcome};
pub use game_mode::{GameMode, SURVIVAL_MODE_LIVES, TIMED_MODE_SECONDS};
pub use game_state_snapshot::{GameStateSnapshot, SNAPSHOT_KEY};
pub use game_stats::{
    AchievementStatus, PersistentStats, SessionOverReason, SessionRecord, StatsSummary,
};
pub use hint::HintKind;
pub use hud_projection::HudProjection;
pub use round::{Round, MAX_ATTEMPTS};
pub use round_phase::{FetchTicket, RoundPhase};
pub use session_state::SessionState;
pub use timer_state::{Countdown, CountdownStatus, TickOutcome};
pub use trading_card::{CardAttack, TradingCard, TypeBadge, COLLECTION_SIZE};
