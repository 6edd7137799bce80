use super::{CreatureRecord, Difficulty, FetchTicket, GameMode, GameStateSnapshot};
use crate::error::ProviderError;

#[derive(Debug, Clone, Default)]
pub struct SettingsChange {
    pub sound: Option<bool>,
    pub animations: Option<bool>,
    pub confetti: Option<bool>,
    pub tutorial_seen: Option<bool>,
}

#[derive(Debug, Clone)]
pub enum GameEngineCommand {
    SubmitGuess(String),
    RequestHint,
    NextRound,
    Tick,
    CancelTimer,
    ChangeMode(GameMode),
    ChangeDifficulty(Difficulty),
    ResetSession,
    ResetStats,
    CreatureLoaded {
        ticket: FetchTicket,
        result: Result<CreatureRecord, ProviderError>,
    },
    RetryFetch,
    ChangeSettings(SettingsChange),
    LoadState(GameStateSnapshot),
}

impl GameEngineCommand {
    pub fn name(&self) -> &'static str {
        match self {
            GameEngineCommand::SubmitGuess(_) => "SubmitGuess",
            GameEngineCommand::RequestHint => "RequestHint",
            GameEngineCommand::NextRound => "NextRound",
            GameEngineCommand::Tick => "Tick",
            GameEngineCommand::CancelTimer => "CancelTimer",
            GameEngineCommand::ChangeMode(_) => "ChangeMode",
            GameEngineCommand::ChangeDifficulty(_) => "ChangeDifficulty",
            GameEngineCommand::ResetSession => "ResetSession",
            GameEngineCommand::ResetStats => "ResetStats",
            GameEngineCommand::CreatureLoaded { .. } => "CreatureLoaded",
            GameEngineCommand::RetryFetch => "RetryFetch",
            GameEngineCommand::ChangeSettings(_) => "ChangeSettings",
            GameEngineCommand::LoadState(_) => "LoadState",
        }
    }
}
