use std::time::Duration;

use log::{debug, info, trace, warn};
use uuid::Uuid;

use super::scoring;
use super::session_mode::{ModeVerdict, SessionModeController};
use super::similarity::is_match;
use crate::error::{GameError, ProviderError};
use crate::model::{
    CreatureRecord, Difficulty, FetchTicket, GameEngineCommand, GameEngineEvent, GameMode,
    GameStateSnapshot, GuessOutcome, PersistentStats, Round, RoundPhase, SessionOverReason,
    SessionRecord, SessionState, MAX_ATTEMPTS,
};

/// Wait this long before retrying a failed creature fetch.
pub const FETCH_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Guesses at least this similar get a "getting warm" response.
const WARM_THRESHOLD: u8 = 50;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Notify(GameEngineEvent),
    FetchCreature {
        ticket: FetchTicket,
        difficulty: Difficulty,
    },
    /// Stamp `last_played` with the current time.
    MarkPlayed,
    PersistStats,
    /// Store a finished session; the record's timestamp is filled in then.
    RecordSession(SessionRecord),
    StatsReset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingFetch {
    ticket: FetchTicket,
    failed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    phase: RoundPhase,
    round: Option<Round>,
    session: SessionState,
    stats: PersistentStats,
    pending_fetch: Option<PendingFetch>,
    last_ticket: FetchTicket,
    session_seed: u64,
    sessions_started: u64,
}

/// Runs one command against `state`, returning the new state and what
/// should happen as a result.
pub fn transition(mut state: GameState, command: GameEngineCommand) -> (GameState, Vec<Effect>) {
    let effects = state.handle(command);
    (state, effects)
}

fn notify(event: GameEngineEvent) -> Effect {
    Effect::Notify(event)
}

impl GameState {
    pub fn new(mode: GameMode, difficulty: Difficulty, stats: PersistentStats) -> Self {
        Self {
            phase: RoundPhase::AwaitingRound,
            round: None,
            session: SessionState::new(mode, difficulty)
                .with_session_id(Uuid::from_u64_pair(0, 0)),
            stats,
            pending_fetch: None,
            last_ticket: FetchTicket::default(),
            session_seed: 0,
            sessions_started: 0,
        }
    }

    /// Session ids are derived from `seed` and a running session count.
    pub fn with_session_seed(mut self, seed: u64) -> Self {
        self.session_seed = seed;
        self.session.session_id = self.next_session_id();
        self
    }

    fn next_session_id(&self) -> Uuid {
        Uuid::from_u64_pair(self.session_seed, self.sessions_started)
    }

    pub fn mark_played(&mut self, timestamp: i64) {
        self.stats.last_played = Some(timestamp);
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn stats(&self) -> &PersistentStats {
        &self.stats
    }

    pub fn attempts_remaining(&self) -> u32 {
        self.round
            .as_ref()
            .map(|round| round.attempts_remaining)
            .unwrap_or(MAX_ATTEMPTS)
    }

    /// True while a creature fetch is outstanding; round controls should be
    /// disabled.
    pub fn is_loading(&self) -> bool {
        self.pending_fetch.is_some()
    }

    pub fn snapshot(&self) -> GameStateSnapshot {
        GameStateSnapshot::new(self.phase, self.session.clone(), self.round.clone())
    }

    /// Dispatches a command. Rejections come back as
    /// [`GameEngineEvent::CommandRejected`] rather than errors.
    pub fn handle(&mut self, command: GameEngineCommand) -> Vec<Effect> {
        trace!(target: "game_state", "Handling command: {:?}", command);
        let name = command.name();
        let result = match command {
            GameEngineCommand::SubmitGuess(text) => self.submit_guess(&text),
            GameEngineCommand::RequestHint => self.request_hint(),
            GameEngineCommand::NextRound => self.request_next_round(),
            GameEngineCommand::Tick => Ok(self.tick()),
            GameEngineCommand::CancelTimer => {
                SessionModeController::cancel_timer(&mut self.session);
                Ok(vec![])
            }
            GameEngineCommand::ChangeMode(mode) => {
                Ok(self.reset_session(mode, self.session.difficulty))
            }
            GameEngineCommand::ChangeDifficulty(difficulty) => {
                Ok(self.reset_session(self.session.mode, difficulty))
            }
            GameEngineCommand::ResetSession => {
                Ok(self.reset_session(self.session.mode, self.session.difficulty))
            }
            GameEngineCommand::ResetStats => Ok(self.reset_stats()),
            GameEngineCommand::CreatureLoaded { ticket, result } => {
                self.creature_loaded(ticket, result)
            }
            GameEngineCommand::RetryFetch => self.retry_fetch(),
            GameEngineCommand::LoadState(snapshot) => Ok(self.load_snapshot(snapshot)),
            // settings live outside the game state
            GameEngineCommand::ChangeSettings(_) => Ok(vec![]),
        };

        match result {
            Ok(effects) => effects,
            Err(error) => {
                match &error {
                    GameError::InvalidTransition { .. } => {
                        warn!(target: "game_state", "Ignoring {}: {}", name, error)
                    }
                    _ => debug!(target: "game_state", "Rejected {}: {}", name, error),
                }
                vec![notify(GameEngineEvent::CommandRejected(error))]
            }
        }
    }

    fn invalid(&self, command: &'static str) -> GameError {
        GameError::InvalidTransition {
            command,
            phase: self.phase,
        }
    }

    /// Asks for the next creature. Allowed before the first round and after
    /// a round has been revealed, once per outstanding fetch.
    pub fn request_next_round(&mut self) -> Result<Vec<Effect>, GameError> {
        if !self.phase.can_start_round() || self.pending_fetch.is_some() {
            return Err(self.invalid("NextRound"));
        }
        Ok(self.begin_fetch())
    }

    fn begin_fetch(&mut self) -> Vec<Effect> {
        self.last_ticket = self.last_ticket.next();
        self.pending_fetch = Some(PendingFetch {
            ticket: self.last_ticket,
            failed: false,
        });
        vec![
            notify(GameEngineEvent::LoadingStarted),
            Effect::FetchCreature {
                ticket: self.last_ticket,
                difficulty: self.session.difficulty,
            },
        ]
    }

    pub fn creature_loaded(
        &mut self,
        ticket: FetchTicket,
        result: Result<CreatureRecord, ProviderError>,
    ) -> Result<Vec<Effect>, GameError> {
        let Some(pending) = self.pending_fetch else {
            debug!(target: "game_state", "Dropping unexpected creature for {:?}", ticket);
            return Ok(vec![]);
        };
        if pending.ticket != ticket || pending.failed {
            debug!(target: "game_state", "Dropping stale creature for {:?}", ticket);
            return Ok(vec![]);
        }

        match result {
            Ok(creature) => self.start_round(creature),
            Err(error) => {
                warn!(target: "game_state", "Creature fetch failed: {}", error);
                self.pending_fetch = Some(PendingFetch {
                    ticket,
                    failed: true,
                });
                Ok(vec![notify(GameEngineEvent::FetchFailed {
                    message: GameError::from(error).to_string(),
                    retry_after: FETCH_RETRY_DELAY,
                })])
            }
        }
    }

    /// Re-issues a fetch that failed. Round state is untouched.
    pub fn retry_fetch(&mut self) -> Result<Vec<Effect>, GameError> {
        match self.pending_fetch {
            Some(PendingFetch { failed: true, .. }) => {
                info!(target: "game_state", "Retrying creature fetch");
                Ok(self.begin_fetch())
            }
            _ => Err(self.invalid("RetryFetch")),
        }
    }

    pub fn start_round(&mut self, creature: CreatureRecord) -> Result<Vec<Effect>, GameError> {
        if !self.phase.can_start_round() {
            return Err(self.invalid("StartRound"));
        }
        let image_ref = creature.image_ref.clone();
        self.pending_fetch = None;
        self.round = Some(Round::new(creature));
        self.phase = RoundPhase::Guessing;
        self.session.rounds_played += 1;
        Ok(vec![
            notify(GameEngineEvent::RoundStarted { image_ref }),
            notify(GameEngineEvent::AttemptsChanged(MAX_ATTEMPTS)),
        ])
    }

    pub fn submit_guess(&mut self, text: &str) -> Result<Vec<Effect>, GameError> {
        if !self.phase.accepts_guesses() {
            return Err(self.invalid("SubmitGuess"));
        }
        let guess = text.trim();
        if guess.is_empty() {
            return Err(GameError::EmptyInput);
        }
        let Some(round) = self.round.as_mut() else {
            return Err(self.invalid("SubmitGuess"));
        };

        let result = is_match(guess, &round.target().name);
        scoring::record_guess(&mut self.stats);

        if result.matched {
            scoring::record_catch(&mut self.session, &mut self.stats);
            self.phase = RoundPhase::Revealed;
            let outcome = if result.similarity == 100 {
                GuessOutcome::Perfect
            } else {
                GuessOutcome::CloseMatch
            };
            let mut effects = vec![
                notify(GameEngineEvent::GuessResult {
                    outcome,
                    similarity: result.similarity,
                    attempts_left: round.attempts_remaining,
                }),
                notify(GameEngineEvent::ScoreChanged {
                    score: self.session.score,
                    streak: self.session.streak,
                }),
            ];
            effects.extend(
                scoring::unlock_new_achievements(&mut self.stats, &self.session)
                    .into_iter()
                    .map(|id| notify(GameEngineEvent::AchievementUnlocked(id))),
            );
            effects.push(notify(GameEngineEvent::RoundRevealed(round.target().clone())));
            effects.push(Effect::MarkPlayed);
            effects.push(Effect::PersistStats);
            return Ok(effects);
        }

        let attempts_left = round.use_attempt();
        if attempts_left > 0 {
            let outcome = if result.similarity >= WARM_THRESHOLD {
                GuessOutcome::Warm
            } else {
                GuessOutcome::Miss
            };
            return Ok(vec![
                notify(GameEngineEvent::GuessResult {
                    outcome,
                    similarity: result.similarity,
                    attempts_left,
                }),
                notify(GameEngineEvent::AttemptsChanged(attempts_left)),
                Effect::MarkPlayed,
                Effect::PersistStats,
            ]);
        }

        // out of attempts: the round is lost
        let target = round.target().clone();
        scoring::break_streak(&mut self.session);
        self.phase = RoundPhase::Revealed;
        let mut effects = vec![
            notify(GameEngineEvent::GuessResult {
                outcome: GuessOutcome::OutOfAttempts {
                    answer: target.name.clone(),
                },
                similarity: result.similarity,
                attempts_left: 0,
            }),
            notify(GameEngineEvent::AttemptsChanged(0)),
            notify(GameEngineEvent::ScoreChanged {
                score: self.session.score,
                streak: self.session.streak,
            }),
            notify(GameEngineEvent::RoundRevealed(target)),
            Effect::MarkPlayed,
            Effect::PersistStats,
        ];
        match SessionModeController::on_round_lost(&mut self.session) {
            ModeVerdict::LifeLost { lives_remaining } => {
                effects.push(notify(GameEngineEvent::LivesChanged(lives_remaining)));
            }
            ModeVerdict::SessionOver(reason) => {
                effects.push(notify(GameEngineEvent::LivesChanged(0)));
                effects.extend(self.end_session(reason));
            }
            ModeVerdict::Continue | ModeVerdict::TimerChanged(_) => (),
        }
        Ok(effects)
    }

    /// Spends points on the next hint. When every hint is already out the
    /// charge is refunded and the request fails.
    pub fn request_hint(&mut self) -> Result<Vec<Effect>, GameError> {
        if !self.phase.accepts_guesses() {
            return Err(self.invalid("RequestHint"));
        }
        let Some(round) = self.round.as_mut() else {
            return Err(self.invalid("RequestHint"));
        };

        scoring::charge_hint(&mut self.session)?;
        match round.reveal_next_hint() {
            Some(kind) => Ok(vec![
                notify(GameEngineEvent::ScoreChanged {
                    score: self.session.score,
                    streak: self.session.streak,
                }),
                notify(GameEngineEvent::HintRevealed {
                    kind,
                    text: kind.text_for(round.target()),
                }),
            ]),
            None => {
                scoring::refund_hint(&mut self.session);
                Err(GameError::NoHintsRemaining)
            }
        }
    }

    /// One elapsed second of the timed-mode clock.
    pub fn tick(&mut self) -> Vec<Effect> {
        match SessionModeController::on_tick(&mut self.session, self.phase) {
            ModeVerdict::TimerChanged(remaining) => {
                vec![notify(GameEngineEvent::TimerChanged(remaining))]
            }
            ModeVerdict::SessionOver(reason) => {
                let mut effects = vec![notify(GameEngineEvent::TimerChanged(0))];
                effects.extend(self.end_session(reason));
                effects
            }
            ModeVerdict::Continue | ModeVerdict::LifeLost { .. } => vec![],
        }
    }

    fn end_session(&mut self, reason: SessionOverReason) -> Vec<Effect> {
        info!(
            target: "game_state",
            "Session over ({:?}); final score {}", reason, self.session.score
        );
        SessionModeController::cancel_timer(&mut self.session);
        self.phase = RoundPhase::SessionOver;
        self.pending_fetch = None;
        let record = SessionRecord {
            session_id: self.session.session_id,
            final_score: self.session.score,
            best_streak: self.stats.best_streak,
            rounds_played: self.session.rounds_played,
            mode: self.session.mode,
            difficulty: self.session.difficulty,
            reason,
            timestamp: 0,
        };
        vec![
            notify(GameEngineEvent::SessionOver {
                final_score: self.session.score,
                reason,
            }),
            Effect::RecordSession(record),
        ]
    }

    /// Starts over with fresh session counters and asks for a new creature.
    /// Used for mode and difficulty changes as well as "play again".
    pub fn reset_session(&mut self, mode: GameMode, difficulty: Difficulty) -> Vec<Effect> {
        info!(target: "game_state", "New session: {:?} / {:?}", mode, difficulty);
        self.sessions_started += 1;
        self.session = SessionModeController::reset(&mut self.session, mode, difficulty)
            .with_session_id(self.next_session_id());
        self.round = None;
        self.phase = RoundPhase::AwaitingRound;
        self.pending_fetch = None;

        let mut effects = vec![
            notify(GameEngineEvent::SessionStarted { mode, difficulty }),
            notify(GameEngineEvent::ScoreChanged {
                score: 0,
                streak: 0,
            }),
            notify(GameEngineEvent::AttemptsChanged(MAX_ATTEMPTS)),
        ];
        effects.extend(self.mode_status_events());
        effects.extend(self.begin_fetch());
        effects
    }

    fn mode_status_events(&self) -> Vec<Effect> {
        let mut effects = vec![];
        if let Some(remaining) = self.session.time_remaining_secs() {
            effects.push(notify(GameEngineEvent::TimerChanged(remaining)));
        }
        if let Some(lives) = self.session.lives_remaining {
            effects.push(notify(GameEngineEvent::LivesChanged(lives)));
        }
        effects
    }

    /// Clears lifetime stats and achievements. The session keeps going.
    pub fn reset_stats(&mut self) -> Vec<Effect> {
        info!(target: "game_state", "Resetting lifetime stats");
        self.stats = PersistentStats::default();
        vec![Effect::StatsReset, Effect::PersistStats]
    }

    pub fn load_snapshot(&mut self, snapshot: GameStateSnapshot) -> Vec<Effect> {
        SessionModeController::cancel_timer(&mut self.session);
        let GameStateSnapshot {
            phase,
            session,
            round,
        } = snapshot;
        self.phase = phase;
        self.session = session;
        self.round = round;
        self.pending_fetch = None;

        let mut effects = vec![
            notify(GameEngineEvent::SessionStarted {
                mode: self.session.mode,
                difficulty: self.session.difficulty,
            }),
            notify(GameEngineEvent::ScoreChanged {
                score: self.session.score,
                streak: self.session.streak,
            }),
            notify(GameEngineEvent::AttemptsChanged(self.attempts_remaining())),
        ];
        effects.extend(self.mode_status_events());

        match (self.phase, self.round.as_ref()) {
            (RoundPhase::Guessing, Some(round)) => {
                effects.push(notify(GameEngineEvent::RoundStarted {
                    image_ref: round.target().image_ref.clone(),
                }));
                for kind in &round.hints_revealed {
                    effects.push(notify(GameEngineEvent::HintRevealed {
                        kind: *kind,
                        text: kind.text_for(round.target()),
                    }));
                }
            }
            (RoundPhase::Revealed, Some(round)) => {
                effects.push(notify(GameEngineEvent::RoundRevealed(round.target().clone())));
            }
            (RoundPhase::SessionOver, _) => {
                effects.push(notify(GameEngineEvent::SessionOver {
                    final_score: self.session.score,
                    reason: match self.session.mode {
                        GameMode::Survival => SessionOverReason::OutOfLives,
                        _ => SessionOverReason::Timeout,
                    },
                }));
            }
            _ => {
                self.phase = RoundPhase::AwaitingRound;
                effects.extend(self.begin_fetch());
            }
        }
        effects
    }
}

#[cfg(test)]
mod tests {
    use test_context::test_context;

    use super::*;
    use crate::error::GameError;
    use crate::model::{AchievementId, EvolutionStage, HintKind};
    use crate::tests::UsingLogger;

    fn creature(name: &str) -> CreatureRecord {
        CreatureRecord {
            id: 25,
            name: name.to_string(),
            image_ref: format!("{}.png", name),
            types: vec!["electric".to_string()],
            height_deci: 4,
            weight_deci: 60,
            hp: 35,
            attack_stat: 55,
            defense_stat: 40,
            speed_stat: 90,
            abilities: vec![],
            generation_label: "generation-i".to_string(),
            evolution_stage: EvolutionStage::StageOne,
        }
    }

    fn events(effects: &[Effect]) -> Vec<&GameEngineEvent> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Notify(event) => Some(event),
                _ => None,
            })
            .collect()
    }

    fn fetches(effects: &[Effect]) -> Vec<FetchTicket> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::FetchCreature { ticket, .. } => Some(*ticket),
                _ => None,
            })
            .collect()
    }

    fn rejection(effects: &[Effect]) -> Option<&GameError> {
        effects.iter().find_map(|effect| match effect {
            Effect::Notify(GameEngineEvent::CommandRejected(error)) => Some(error),
            _ => None,
        })
    }

    /// A state with a round of `name` in progress.
    fn guessing(mode: GameMode, name: &str) -> GameState {
        let mut state = GameState::new(mode, Difficulty::Easy, PersistentStats::default());
        let effects = state.handle(GameEngineCommand::NextRound);
        let ticket = fetches(&effects)[0];
        state.handle(GameEngineCommand::CreatureLoaded {
            ticket,
            result: Ok(creature(name)),
        });
        assert_eq!(state.phase(), RoundPhase::Guessing);
        state
    }

    fn next_round(state: &mut GameState, name: &str) {
        let effects = state.handle(GameEngineCommand::NextRound);
        let ticket = fetches(&effects)[0];
        state.handle(GameEngineCommand::CreatureLoaded {
            ticket,
            result: Ok(creature(name)),
        });
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_starts_awaiting_round(_: &mut UsingLogger) {
        let state = GameState::new(GameMode::Normal, Difficulty::Medium, PersistentStats::default());
        assert_eq!(state.phase(), RoundPhase::AwaitingRound);
        assert_eq!(state.attempts_remaining(), 3);
        assert!(state.round().is_none());
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_perfect_guess_wins_round(_: &mut UsingLogger) {
        let mut state = guessing(GameMode::Normal, "pikachu");
        let effects = state.handle(GameEngineCommand::SubmitGuess(" Pikachu ".to_string()));

        assert_eq!(state.phase(), RoundPhase::Revealed);
        assert_eq!(state.session().score, 10);
        assert_eq!(state.session().streak, 1);
        assert_eq!(state.stats().total_guesses, 1);
        assert_eq!(state.stats().correct_guesses, 1);
        assert_eq!(state.stats().best_score, 10);
        assert_eq!(state.stats().best_streak, 1);

        let events = events(&effects);
        assert_eq!(
            events[0],
            &GameEngineEvent::GuessResult {
                outcome: GuessOutcome::Perfect,
                similarity: 100,
                attempts_left: 3,
            }
        );
        assert!(events.contains(&&GameEngineEvent::AchievementUnlocked(AchievementId::FirstCatch)));
        assert!(events.contains(&&GameEngineEvent::RoundRevealed(creature("pikachu"))));
        assert!(effects.contains(&Effect::MarkPlayed));
        assert!(effects.contains(&Effect::PersistStats));
        assert_eq!(state.stats().last_played, None, "the clock is read by the engine");
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_close_guess_reports_similarity(_: &mut UsingLogger) {
        let mut state = guessing(GameMode::Normal, "pikachu");
        let effects = state.handle(GameEngineCommand::SubmitGuess("pikachuu".to_string()));
        assert_eq!(
            events(&effects)[0],
            &GameEngineEvent::GuessResult {
                outcome: GuessOutcome::CloseMatch,
                similarity: 88,
                attempts_left: 3,
            }
        );
        assert_eq!(state.phase(), RoundPhase::Revealed);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_empty_guess_is_rejected_without_side_effects(_: &mut UsingLogger) {
        let mut state = guessing(GameMode::Normal, "pikachu");
        let effects = state.handle(GameEngineCommand::SubmitGuess("   ".to_string()));
        assert_eq!(rejection(&effects), Some(&GameError::EmptyInput));
        assert_eq!(state.stats().total_guesses, 0);
        assert_eq!(state.attempts_remaining(), 3);
        assert_eq!(state.phase(), RoundPhase::Guessing);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_warm_and_cold_misses(_: &mut UsingLogger) {
        let mut state = guessing(GameMode::Normal, "pikachu");

        let effects = state.handle(GameEngineCommand::SubmitGuess("pikapi".to_string()));
        assert!(matches!(
            events(&effects)[0],
            GameEngineEvent::GuessResult {
                outcome: GuessOutcome::Warm,
                attempts_left: 2,
                ..
            }
        ));

        let effects = state.handle(GameEngineCommand::SubmitGuess("xyz".to_string()));
        assert!(matches!(
            events(&effects)[0],
            GameEngineEvent::GuessResult {
                outcome: GuessOutcome::Miss,
                similarity: 0,
                attempts_left: 1,
            }
        ));
        assert_eq!(state.phase(), RoundPhase::Guessing);
        assert_eq!(state.stats().total_guesses, 2);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_three_misses_reveal_and_reset_streak(_: &mut UsingLogger) {
        let mut state = guessing(GameMode::Normal, "pikachu");
        state.handle(GameEngineCommand::SubmitGuess("pikachu".to_string()));
        next_round(&mut state, "eevee");
        assert_eq!(state.session().streak, 1);

        state.handle(GameEngineCommand::SubmitGuess("xyz".to_string()));
        state.handle(GameEngineCommand::SubmitGuess("abc".to_string()));
        let effects = state.handle(GameEngineCommand::SubmitGuess("qqq".to_string()));

        assert_eq!(state.phase(), RoundPhase::Revealed);
        assert_eq!(state.session().streak, 0);
        assert_eq!(state.session().score, 10);
        assert_eq!(state.attempts_remaining(), 0);
        assert_eq!(state.stats().best_streak, 1);
        assert!(matches!(
            events(&effects)[0],
            GameEngineEvent::GuessResult {
                outcome: GuessOutcome::OutOfAttempts { answer },
                attempts_left: 0,
                ..
            } if answer == "eevee"
        ));
        assert!(events(&effects).contains(&&GameEngineEvent::RoundRevealed(creature("eevee"))));

        // the round is over; further guesses are integration errors
        let effects = state.handle(GameEngineCommand::SubmitGuess("eevee".to_string()));
        assert!(matches!(
            rejection(&effects),
            Some(GameError::InvalidTransition {
                phase: RoundPhase::Revealed,
                ..
            })
        ));
        assert_eq!(state.stats().total_guesses, 4);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_survival_round_loss_costs_exactly_one_life(_: &mut UsingLogger) {
        let mut state = guessing(GameMode::Survival, "pikachu");
        state.handle(GameEngineCommand::SubmitGuess("pikachu".to_string()));
        assert_eq!(state.session().lives_remaining, Some(3), "catches are free");

        next_round(&mut state, "eevee");
        for guess in ["a", "b", "c"] {
            state.handle(GameEngineCommand::SubmitGuess(guess.to_string()));
        }
        assert_eq!(state.session().lives_remaining, Some(2));
        assert_eq!(state.phase(), RoundPhase::Revealed);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_survival_ends_when_lives_run_out(_: &mut UsingLogger) {
        let mut state = guessing(GameMode::Survival, "eevee");
        let mut last = vec![];
        for round in 0..3 {
            if round > 0 {
                next_round(&mut state, "eevee");
            }
            for guess in ["a", "b", "c"] {
                last = state.handle(GameEngineCommand::SubmitGuess(guess.to_string()));
            }
        }
        assert_eq!(state.phase(), RoundPhase::SessionOver);
        assert_eq!(state.session().lives_remaining, Some(0));
        assert!(events(&last).contains(&&GameEngineEvent::SessionOver {
            final_score: 0,
            reason: SessionOverReason::OutOfLives,
        }));
        assert!(last
            .iter()
            .any(|effect| matches!(effect, Effect::RecordSession(record) if record.reason == SessionOverReason::OutOfLives)));
        assert_eq!(
            last.iter()
                .filter(|effect| **effect == Effect::PersistStats)
                .count(),
            1
        );

        let effects = state.handle(GameEngineCommand::NextRound);
        assert!(matches!(
            rejection(&effects),
            Some(GameError::InvalidTransition { .. })
        ));
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_hints_follow_fixed_order_and_refund_when_exhausted(_: &mut UsingLogger) {
        let mut state = guessing(GameMode::Normal, "pikachu");
        state.session.score = 25;

        let mut revealed = vec![];
        for _ in 0..4 {
            let effects = state.handle(GameEngineCommand::RequestHint);
            for event in events(&effects) {
                if let GameEngineEvent::HintRevealed { kind, .. } = event {
                    revealed.push(*kind);
                }
            }
        }
        assert_eq!(revealed, HintKind::ORDER.to_vec());
        assert_eq!(state.session().score, 5);

        let effects = state.handle(GameEngineCommand::RequestHint);
        assert_eq!(rejection(&effects), Some(&GameError::NoHintsRemaining));
        assert_eq!(state.session().score, 5, "the charge is refunded");
        assert_eq!(state.round().unwrap().hints_revealed.len(), 4);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_hint_needs_enough_score(_: &mut UsingLogger) {
        let mut state = guessing(GameMode::Normal, "pikachu");
        let effects = state.handle(GameEngineCommand::RequestHint);
        assert_eq!(
            rejection(&effects),
            Some(&GameError::InsufficientScore { score: 0, cost: 5 })
        );
        assert!(state.round().unwrap().hints_revealed.is_empty());
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_hint_texts_describe_target(_: &mut UsingLogger) {
        let mut state = guessing(GameMode::Normal, "pikachu");
        state.session.score = 5;
        let effects = state.handle(GameEngineCommand::RequestHint);
        assert!(events(&effects).contains(&&GameEngineEvent::HintRevealed {
            kind: HintKind::Type,
            text: "Type: ELECTRIC".to_string(),
        }));
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_first_catch_fires_once(_: &mut UsingLogger) {
        let mut state = guessing(GameMode::Normal, "pikachu");
        let first = state.handle(GameEngineCommand::SubmitGuess("pikachu".to_string()));
        next_round(&mut state, "eevee");
        let second = state.handle(GameEngineCommand::SubmitGuess("eevee".to_string()));

        let unlocked = |effects: &[Effect]| {
            events(effects)
                .into_iter()
                .filter(|event| matches!(event, GameEngineEvent::AchievementUnlocked(_)))
                .count()
        };
        assert_eq!(unlocked(&first), 1);
        assert_eq!(unlocked(&second), 0);
        assert!(state.stats().is_unlocked(AchievementId::FirstCatch));
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_timed_session_times_out_after_sixty_ticks(_: &mut UsingLogger) {
        let mut state = guessing(GameMode::Timed, "pikachu");
        let mut last = vec![];
        for _ in 0..60 {
            assert_ne!(state.phase(), RoundPhase::SessionOver);
            last = state.handle(GameEngineCommand::Tick);
        }
        assert_eq!(state.phase(), RoundPhase::SessionOver);
        assert!(events(&last).contains(&&GameEngineEvent::SessionOver {
            final_score: 0,
            reason: SessionOverReason::Timeout,
        }));

        // orphaned ticks change nothing
        assert!(state.handle(GameEngineCommand::Tick).is_empty());
        assert_eq!(state.session().time_remaining_secs(), Some(0));
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_cancelled_timer_stops_counting(_: &mut UsingLogger) {
        let mut state = guessing(GameMode::Timed, "pikachu");
        state.handle(GameEngineCommand::Tick);
        state.handle(GameEngineCommand::CancelTimer);
        for _ in 0..100 {
            state.handle(GameEngineCommand::Tick);
        }
        assert_eq!(state.session().time_remaining_secs(), Some(59));
        assert_eq!(state.phase(), RoundPhase::Guessing);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_changing_difficulty_resets_and_fetches_once(_: &mut UsingLogger) {
        let mut state = guessing(GameMode::Normal, "pikachu");
        state.handle(GameEngineCommand::SubmitGuess("pikachu".to_string()));
        next_round(&mut state, "eevee");
        state.handle(GameEngineCommand::SubmitGuess("xyz".to_string()));
        assert_eq!(state.session().score, 10);
        assert_eq!(state.attempts_remaining(), 2);

        let effects = state.handle(GameEngineCommand::ChangeDifficulty(Difficulty::Hard));
        assert_eq!(state.session().score, 0);
        assert_eq!(state.session().streak, 0);
        assert_eq!(state.attempts_remaining(), 3);
        assert_eq!(state.session().difficulty, Difficulty::Hard);
        assert_eq!(fetches(&effects).len(), 1);
        assert!(effects.contains(&Effect::FetchCreature {
            ticket: fetches(&effects)[0],
            difficulty: Difficulty::Hard,
        }));
        assert!(state.is_loading());
        // lifetime stats are untouched
        assert_eq!(state.stats().correct_guesses, 1);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_mode_change_mid_timer_discards_old_clock(_: &mut UsingLogger) {
        let mut state = guessing(GameMode::Timed, "pikachu");
        for _ in 0..10 {
            state.handle(GameEngineCommand::Tick);
        }
        state.handle(GameEngineCommand::ChangeMode(GameMode::Survival));
        assert_eq!(state.session().countdown, None);
        assert_eq!(state.session().lives_remaining, Some(3));
        assert!(state.handle(GameEngineCommand::Tick).is_empty());

        state.handle(GameEngineCommand::ChangeMode(GameMode::Timed));
        assert_eq!(state.session().time_remaining_secs(), Some(60));
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_stale_creature_is_dropped(_: &mut UsingLogger) {
        let mut state = GameState::new(GameMode::Normal, Difficulty::Easy, PersistentStats::default());
        let first = fetches(&state.handle(GameEngineCommand::NextRound))[0];
        let second = fetches(&state.handle(GameEngineCommand::ChangeDifficulty(Difficulty::Hard)))[0];
        assert_ne!(first, second);

        let effects = state.handle(GameEngineCommand::CreatureLoaded {
            ticket: first,
            result: Ok(creature("pikachu")),
        });
        assert!(effects.is_empty());
        assert_eq!(state.phase(), RoundPhase::AwaitingRound);

        state.handle(GameEngineCommand::CreatureLoaded {
            ticket: second,
            result: Ok(creature("eevee")),
        });
        assert_eq!(state.round().unwrap().target().name, "eevee");
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_failed_fetch_waits_for_retry(_: &mut UsingLogger) {
        let mut state = GameState::new(GameMode::Normal, Difficulty::Easy, PersistentStats::default());
        let ticket = fetches(&state.handle(GameEngineCommand::NextRound))[0];

        let effects = state.handle(GameEngineCommand::CreatureLoaded {
            ticket,
            result: Err(ProviderError::Request("offline".to_string())),
        });
        assert!(matches!(
            events(&effects)[0],
            GameEngineEvent::FetchFailed { retry_after, .. } if *retry_after == FETCH_RETRY_DELAY
        ));
        assert!(state.is_loading());
        assert_eq!(state.phase(), RoundPhase::AwaitingRound);

        // a second NextRound while loading is refused
        let effects = state.handle(GameEngineCommand::NextRound);
        assert!(rejection(&effects).is_some());

        let retry = fetches(&state.handle(GameEngineCommand::RetryFetch));
        assert_eq!(retry.len(), 1);
        assert_ne!(retry[0], ticket);

        state.handle(GameEngineCommand::CreatureLoaded {
            ticket: retry[0],
            result: Ok(creature("pikachu")),
        });
        assert_eq!(state.phase(), RoundPhase::Guessing);
        assert!(!state.is_loading());
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_retry_without_failure_is_invalid(_: &mut UsingLogger) {
        let mut state = guessing(GameMode::Normal, "pikachu");
        let effects = state.handle(GameEngineCommand::RetryFetch);
        assert!(matches!(
            rejection(&effects),
            Some(GameError::InvalidTransition { command: "RetryFetch", .. })
        ));
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_high_score_achievement(_: &mut UsingLogger) {
        let mut state = guessing(GameMode::Normal, "pikachu");
        state.session.score = 90;
        let effects = state.handle(GameEngineCommand::SubmitGuess("pikachu".to_string()));
        assert!(events(&effects).contains(&&GameEngineEvent::AchievementUnlocked(AchievementId::HighScore)));
        assert_eq!(state.stats().best_score, 100);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_reset_stats_keeps_session(_: &mut UsingLogger) {
        let mut state = guessing(GameMode::Normal, "pikachu");
        state.handle(GameEngineCommand::SubmitGuess("pikachu".to_string()));
        let effects = state.handle(GameEngineCommand::ResetStats);
        assert_eq!(state.stats(), &PersistentStats::default());
        assert_eq!(state.session().score, 10);
        assert!(effects.contains(&Effect::StatsReset));
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_snapshot_roundtrip_resumes_round(_: &mut UsingLogger) {
        let mut state = guessing(GameMode::Timed, "pikachu");
        state.session.score = 10;
        state.handle(GameEngineCommand::RequestHint);
        state.handle(GameEngineCommand::SubmitGuess("xyz".to_string()));
        state.handle(GameEngineCommand::Tick);
        let snapshot = state.snapshot();

        let mut restored =
            GameState::new(GameMode::Normal, Difficulty::Medium, PersistentStats::default());
        let effects = restored.handle(GameEngineCommand::LoadState(snapshot));
        assert_eq!(restored.phase(), RoundPhase::Guessing);
        assert_eq!(restored.attempts_remaining(), 2);
        assert_eq!(restored.session().score, 5);
        assert_eq!(restored.session().time_remaining_secs(), Some(59));
        assert!(fetches(&effects).is_empty());
        assert!(events(&effects)
            .iter()
            .any(|event| matches!(event, GameEngineEvent::HintRevealed { kind: HintKind::Type, .. })));
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_transition_is_a_pure_wrapper(_: &mut UsingLogger) {
        let state = GameState::new(GameMode::Normal, Difficulty::Easy, PersistentStats::default());
        let before = state.clone();
        let (after, effects) = transition(state, GameEngineCommand::NextRound);
        assert_eq!(before.phase(), after.phase());
        assert!(after.is_loading());
        assert_eq!(fetches(&effects).len(), 1);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_same_commands_give_same_results(_: &mut UsingLogger) {
        let start = guessing(GameMode::Survival, "eevee").with_session_seed(99);
        let commands = [
            GameEngineCommand::SubmitGuess("pikachu".to_string()),
            GameEngineCommand::SubmitGuess("eevee".to_string()),
            GameEngineCommand::ResetSession,
        ];

        let mut a = start.clone();
        let mut b = start.clone();
        for command in commands {
            let (next_a, effects_a) = transition(a, command.clone());
            let (next_b, effects_b) = transition(b, command);
            assert_eq!(effects_a, effects_b);
            assert_eq!(next_a, next_b);
            a = next_a;
            b = next_b;
        }
        assert_ne!(a.session().session_id, start.session().session_id);
        assert_eq!(
            a.session().session_id,
            Uuid::from_u64_pair(99, start.sessions_started + 1)
        );
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_session_over_record_is_stamped_later(_: &mut UsingLogger) {
        let mut state = guessing(GameMode::Timed, "eevee");
        let mut effects = vec![];
        for _ in 0..60 {
            effects = state.handle(GameEngineCommand::Tick);
        }
        let record = effects.iter().find_map(|effect| match effect {
            Effect::RecordSession(record) => Some(record),
            _ => None,
        });
        assert_eq!(record.map(|record| record.timestamp), Some(0));
        assert!(!effects.contains(&Effect::PersistStats));
    }
}
