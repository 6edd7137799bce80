pub mod game_engine;
pub mod persistence;
pub mod provider;
pub mod scoring;
pub mod session_mode;
pub mod settings;
pub mod similarity;
pub mod state_machine;
pub mod stats_manager;

pub use game_engine::GameEngine;
pub use state_machine::{transition, Effect, GameState};
