use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use log::{error, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::persistence::PersistenceStore;
use super::provider::CreatureProvider;
use super::settings::Settings;
use super::state_machine::{Effect, GameState};
use super::stats_manager::StatsManager;
use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventObserver, Unsubscriber};
use crate::model::game_state_snapshot::{load_game_state_snapshot, GameStateSnapshot};
use crate::model::{
    Difficulty, FetchTicket, GameEngineCommand, GameEngineEvent, GameMode, SessionRecord,
    StatsSummary,
};

/// Drives a [`GameState`] from commands arriving on a channel and carries
/// out the effects it asks for.
pub struct GameEngine {
    state: GameState,
    provider: Box<dyn CreatureProvider>,
    stats_manager: StatsManager,
    store: Rc<dyn PersistenceStore>,
    settings: Settings,
    rng: StdRng,
    debug_mode: bool,
    subscription: Option<Unsubscriber<GameEngineCommand>>,
    game_engine_event_emitter: EventEmitter<GameEngineEvent>,
}

impl std::fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEngine")
            .field("phase", &self.state.phase())
            .field("session", &self.state.session())
            .field("stats_manager", &self.stats_manager)
            .finish()
    }
}

impl Destroyable for GameEngine {
    fn destroy(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.state.handle(GameEngineCommand::CancelTimer);
    }
}

impl GameEngine {
    /// Builds an engine seeded from `SEED` when set, randomly otherwise.
    pub fn new(
        game_engine_command_observer: EventObserver<GameEngineCommand>,
        game_engine_event_emitter: EventEmitter<GameEngineEvent>,
        provider: Box<dyn CreatureProvider>,
        store: Rc<dyn PersistenceStore>,
    ) -> Rc<RefCell<Self>> {
        let seed = Settings::seed_from_env().unwrap_or_else(rand::random);
        Self::with_seed(
            game_engine_command_observer,
            game_engine_event_emitter,
            provider,
            store,
            seed,
        )
    }

    pub fn with_seed(
        game_engine_command_observer: EventObserver<GameEngineCommand>,
        game_engine_event_emitter: EventEmitter<GameEngineEvent>,
        provider: Box<dyn CreatureProvider>,
        store: Rc<dyn PersistenceStore>,
        seed: u64,
    ) -> Rc<RefCell<Self>> {
        let settings = Settings::load(store.as_ref());
        let stats_manager = StatsManager::new(store.clone());
        let stats = stats_manager.load_stats();
        info!(target: "engine", "Creating engine with seed {}", seed);

        let mut rng = StdRng::seed_from_u64(seed);
        let engine = Self {
            state: GameState::new(settings.mode, settings.difficulty, stats)
                .with_session_seed(rng.random()),
            provider,
            stats_manager,
            store,
            settings,
            rng,
            debug_mode: Settings::is_debug_mode(),
            subscription: None,
            game_engine_event_emitter,
        };
        let refcell = Rc::new(RefCell::new(engine));
        GameEngine::wire_subscription(refcell.clone(), game_engine_command_observer);
        refcell
    }

    fn wire_subscription(
        engine: Rc<RefCell<Self>>,
        game_engine_command_observer: EventObserver<GameEngineCommand>,
    ) {
        let engine_handler = engine.clone();
        let subscription = game_engine_command_observer.subscribe(move |command| {
            let mut engine = engine_handler.borrow_mut();
            engine.handle_command(command.clone());
        });
        engine.borrow_mut().subscription = Some(subscription);
    }

    /// Announces settings and stats, then resumes the saved session if there
    /// is one or starts a fresh one.
    pub fn start(&mut self) {
        self.emit(GameEngineEvent::SettingsChanged(self.settings.clone()));
        self.emit(GameEngineEvent::StatsChanged(self.state.stats().clone()));
        let command = match load_game_state_snapshot(self.store.as_ref()) {
            Some(snapshot) => {
                info!(target: "engine", "Resuming saved session {}", snapshot.session.session_id);
                GameEngineCommand::LoadState(snapshot)
            }
            None => GameEngineCommand::ResetSession,
        };
        self.handle_command(command);
    }

    pub fn handle_command(&mut self, command: GameEngineCommand) {
        trace!(target: "engine", "Handling command: {:?}", command);
        let save_afterwards = !matches!(command, GameEngineCommand::Tick);
        match &command {
            GameEngineCommand::ChangeMode(mode) => self.remember_mode(*mode, self.settings.difficulty),
            GameEngineCommand::ChangeDifficulty(difficulty) => {
                self.remember_mode(self.settings.mode, *difficulty)
            }
            GameEngineCommand::ChangeSettings(change) => {
                self.settings.apply(change);
                self.save_settings();
                self.emit(GameEngineEvent::SettingsChanged(self.settings.clone()));
            }
            _ => (),
        }

        let effects = self.state.handle(command);
        self.run_effects(effects);
        if save_afterwards {
            self.save_snapshot();
        }
    }

    fn remember_mode(&mut self, mode: GameMode, difficulty: Difficulty) {
        if self.settings.mode == mode && self.settings.difficulty == difficulty {
            return;
        }
        self.settings.mode = mode;
        self.settings.difficulty = difficulty;
        self.save_settings();
        self.emit(GameEngineEvent::SettingsChanged(self.settings.clone()));
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        let mut queue: VecDeque<Effect> = effects.into();
        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::Notify(event) => self.emit(event),
                Effect::FetchCreature { ticket, difficulty } => {
                    let command = self.fetch_creature(ticket, difficulty);
                    queue.extend(self.state.handle(command));
                }
                Effect::MarkPlayed => self.state.mark_played(chrono::Utc::now().timestamp()),
                Effect::PersistStats => self.persist_stats(),
                Effect::RecordSession(record) => self.record_session(record),
                Effect::StatsReset => {
                    if let Err(err) = self.stats_manager.reset() {
                        error!(target: "engine", "Could not reset stats: {}", err);
                    }
                }
            }
        }
    }

    fn fetch_creature(&mut self, ticket: FetchTicket, difficulty: Difficulty) -> GameEngineCommand {
        let id = self.rng.random_range(difficulty.id_range());
        trace!(target: "engine", "Fetching creature {} for {:?}", id, ticket);
        let result = self.provider.fetch_creature(id);
        if self.debug_mode {
            if let Ok(creature) = &result {
                info!(target: "engine", "Answer: {}", creature.name);
            }
        }
        GameEngineCommand::CreatureLoaded { ticket, result }
    }

    fn persist_stats(&mut self) {
        if let Err(err) = self.stats_manager.save_stats(self.state.stats()) {
            error!(target: "engine", "Could not save stats: {}", err);
        }
        self.emit(GameEngineEvent::StatsChanged(self.state.stats().clone()));
    }

    fn record_session(&mut self, mut record: SessionRecord) {
        record.timestamp = chrono::Utc::now().timestamp();
        if let Err(err) = self.stats_manager.record_session(record) {
            error!(target: "engine", "Could not record session: {}", err);
        }
    }

    fn save_settings(&self) {
        if let Err(err) = self.settings.save(self.store.as_ref()) {
            error!(target: "engine", "Could not save settings: {}", err);
        }
    }

    fn emit(&self, event: GameEngineEvent) {
        self.game_engine_event_emitter.emit(event);
    }

    pub fn save_snapshot(&self) -> bool {
        self.snapshot().save(self.store.as_ref())
    }

    pub fn snapshot(&self) -> GameStateSnapshot {
        self.state.snapshot()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn stats_summary(&self) -> StatsSummary {
        StatsSummary::from(self.state.stats())
    }

    pub fn high_scores(&self, mode: GameMode, limit: usize) -> Vec<SessionRecord> {
        self.stats_manager.get_high_scores(mode, limit)
    }
}
