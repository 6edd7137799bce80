use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use creature_guess::destroyable::Destroyable;
use creature_guess::events::{Channel, EventEmitter, EventHandler};
use creature_guess::game::persistence::{FileStore, PersistenceStore};
use creature_guess::game::provider::{CreatureProvider, StaticRoster};
use creature_guess::game::GameEngine;
use creature_guess::helpers::Capitalize;
use creature_guess::model::{
    Difficulty, GameEngineCommand, GameEngineEvent, GameMode, GuessOutcome, HudProjection,
    SessionOverReason, TradingCard,
};
use itertools::Itertools;
use log::warn;

const DATA_DIR_VAR: &str = "CREATURE_GUESS_DATA";

fn init_logging() {
    env_logger::init();
}

fn data_dir() -> PathBuf {
    std::env::var_os(DATA_DIR_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("creature-guess"))
}

fn load_provider() -> Result<Box<dyn CreatureProvider>, String> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--roster" {
            let path = args.next().ok_or("--roster needs a path")?;
            let roster = StaticRoster::from_file(Path::new(&path)).map_err(|err| err.to_string())?;
            return Ok(Box::new(roster));
        }
    }
    Ok(Box::new(StaticRoster::starter_set()))
}

fn print_help() {
    println!("Type a name to guess. Commands:");
    println!("  /hint                 reveal a clue (costs 5 points)");
    println!("  /next                 next creature once a round is over");
    println!("  /mode <normal|timed|survival>");
    println!("  /difficulty <easy|medium|hard>");
    println!("  /card                 trading card of the last revealed creature");
    println!("  /stats, /scores       lifetime stats and high scores");
    println!("  /reset                play again; /reset-stats wipes lifetime stats");
    println!("  /quit");
}

/// Prints one event. Returns the retry delay when a fetch failed.
fn render(event: &GameEngineEvent, hud: &HudProjection) -> Option<Duration> {
    match event {
        GameEngineEvent::SessionStarted { mode, difficulty } => {
            println!("== {} mode, {} ==", mode.label(), difficulty.label());
        }
        GameEngineEvent::LoadingStarted => println!("Loading a new creature..."),
        GameEngineEvent::FetchFailed {
            message,
            retry_after,
        } => {
            println!("{}. Retrying in {}s.", message, retry_after.as_secs());
            return Some(*retry_after);
        }
        GameEngineEvent::RoundStarted { image_ref } => {
            println!();
            println!("Who's that creature? [{}]", image_ref);
            println!("{}", hud.status_line());
        }
        GameEngineEvent::GuessResult {
            outcome,
            similarity,
            attempts_left,
        } => match outcome {
            GuessOutcome::Perfect => println!("Perfect!"),
            GuessOutcome::CloseMatch => println!("Close enough! ({}% match)", similarity),
            GuessOutcome::Warm => println!(
                "Getting warm ({}% match). {} attempts left.",
                similarity, attempts_left
            ),
            GuessOutcome::Miss => println!("Not quite. {} attempts left.", attempts_left),
            GuessOutcome::OutOfAttempts { answer } => {
                println!("Out of attempts! It was {}.", answer.capitalize())
            }
        },
        GameEngineEvent::HintRevealed { text, .. } => println!("Hint: {}", text),
        GameEngineEvent::RoundRevealed(creature) => {
            println!(
                "It's {}! (#{:03}) Type /next for another.",
                creature.name.capitalize(),
                creature.id
            );
        }
        GameEngineEvent::AchievementUnlocked(id) => {
            let achievement = id.definition();
            println!(
                "Achievement unlocked: {} ({})",
                achievement.name, achievement.description
            );
        }
        GameEngineEvent::LivesChanged(lives) if *lives > 0 => {
            println!("{} lives left.", lives);
        }
        GameEngineEvent::SessionOver {
            final_score,
            reason,
        } => {
            let why = match reason {
                SessionOverReason::Timeout => "Time's up",
                SessionOverReason::OutOfLives => "Out of lives",
            };
            println!("{}! Final score: {}. Type /reset to play again.", why, final_score);
        }
        GameEngineEvent::CommandRejected(err) => println!("{}", err),
        _ => (),
    }
    None
}

fn print_card(hud: &HudProjection) {
    let Some(creature) = &hud.revealed else {
        println!("Nothing revealed yet.");
        return;
    };
    let card = TradingCard::from_creature(creature);
    println!(
        "{} {}  HP {}  [{}]",
        card.number, card.title, card.hp, card.stage
    );
    println!(
        "  {}",
        card.types
            .iter()
            .map(|badge| format!("{} {}", badge.symbol, badge.name))
            .join("  ")
    );
    for attack in &card.attacks {
        println!(
            "  {} {}  {}",
            attack.cost.iter().map(|badge| badge.symbol).join(""),
            attack.name,
            attack.damage
        );
    }
    println!(
        "  Weakness {} x2  Resistance {}",
        card.weakness.symbol,
        card.resistance
            .as_ref()
            .map(|badge| format!("{} -20", badge.symbol))
            .unwrap_or_else(|| "none".to_string())
    );
    println!("  {}  {}  {}", card.height, card.weight, card.collection);
}

fn print_stats(engine: &GameEngine) {
    let summary = engine.stats_summary();
    println!(
        "Caught {} | Accuracy {}% | Best score {} | Best streak {}",
        summary.creatures_caught, summary.accuracy_percent, summary.best_score, summary.best_streak
    );
    if let Some(last_played) = summary.last_played {
        println!("Last played {}", last_played);
    }
    for achievement in summary.achievements {
        let mark = if achievement.unlocked { "x" } else { " " };
        println!("  [{}] {}: {}", mark, achievement.name, achievement.description);
    }
}

fn print_high_scores(engine: &GameEngine) {
    for mode in GameMode::all() {
        let scores = engine.high_scores(mode, 5);
        if scores.is_empty() {
            continue;
        }
        println!("{}:", mode.label());
        for record in scores {
            println!(
                "  {:>4}  {} rounds  {}",
                record.final_score,
                record.rounds_played,
                record.difficulty.label()
            );
        }
    }
}

fn parse_command(line: &str) -> Result<GameEngineCommand, String> {
    let mut words = line.split_whitespace();
    let command = match words.next() {
        Some("/hint") => GameEngineCommand::RequestHint,
        Some("/next") => GameEngineCommand::NextRound,
        Some("/reset") => GameEngineCommand::ResetSession,
        Some("/reset-stats") => GameEngineCommand::ResetStats,
        Some("/mode") => {
            let mode = words
                .next()
                .and_then(GameMode::parse)
                .ok_or("usage: /mode <normal|timed|survival>")?;
            GameEngineCommand::ChangeMode(mode)
        }
        Some("/difficulty") => {
            let difficulty = words
                .next()
                .and_then(Difficulty::parse)
                .ok_or("usage: /difficulty <easy|medium|hard>")?;
            GameEngineCommand::ChangeDifficulty(difficulty)
        }
        Some(other) if other.starts_with('/') => return Err(format!("unknown command {}", other)),
        _ => GameEngineCommand::SubmitGuess(line.to_string()),
    };
    Ok(command)
}

/// Feeds queued events to the screen. Failed fetches are retried after the
/// requested delay until one succeeds.
fn drain_events(
    queue: &Rc<RefCell<VecDeque<GameEngineEvent>>>,
    hud: &Rc<RefCell<HudProjection>>,
    commands: &EventEmitter<GameEngineCommand>,
) {
    let mut retries = 0;
    loop {
        let mut retry_after = None;
        while let Some(event) = queue.borrow_mut().pop_front() {
            if let Some(delay) = render(&event, &hud.borrow()) {
                retry_after = Some(delay);
            }
        }
        let Some(delay) = retry_after else {
            return;
        };
        retries += 1;
        warn!(target: "engine", "Creature fetch failed, retry {} in {:?}", retries, delay);
        std::thread::sleep(delay);
        commands.emit(GameEngineCommand::RetryFetch);
    }
}

fn main() {
    init_logging();

    let provider = match load_provider() {
        Ok(provider) => provider,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(2);
        }
    };
    let store: Rc<dyn PersistenceStore> = Rc::new(FileStore::new(data_dir()));

    let (command_emitter, command_observer) = Channel::<GameEngineCommand>::new();
    let (event_emitter, event_observer) = Channel::<GameEngineEvent>::new();

    // listeners only record; commands are sent once the engine is idle again
    let hud = HudProjection::new();
    let hud_handler = hud.clone();
    event_observer.subscribe(move |event| hud_handler.borrow_mut().handle_event(event));
    let queue = Rc::new(RefCell::new(VecDeque::new()));
    let queue_handler = queue.clone();
    event_observer.subscribe(move |event: &GameEngineEvent| {
        queue_handler.borrow_mut().push_back(event.clone())
    });

    let engine = GameEngine::new(command_observer, event_emitter, provider, store);
    print_help();
    engine.borrow_mut().start();
    drain_events(&queue, &hud, &command_emitter);

    let mut last_tick = Instant::now();
    let stdin = io::stdin();
    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => (),
        }

        // the clock kept running while we waited for input
        let elapsed = last_tick.elapsed().as_secs();
        for _ in 0..elapsed {
            command_emitter.emit(GameEngineCommand::Tick);
        }
        last_tick += Duration::from_secs(elapsed);
        drain_events(&queue, &hud, &command_emitter);

        let line = line.trim();
        match line {
            "/quit" => break,
            "/help" => print_help(),
            "/card" => print_card(&hud.borrow()),
            "/stats" => print_stats(&engine.borrow()),
            "/scores" => print_high_scores(&engine.borrow()),
            _ if hud.borrow().session_over && !line.starts_with('/') => {
                println!("Session over. Type /reset to play again.");
            }
            _ => match parse_command(line) {
                Ok(command) => command_emitter.emit(command),
                Err(err) => println!("{}", err),
            },
        }
        drain_events(&queue, &hud, &command_emitter);
        let hud = hud.borrow();
        if let (Some(time_left), false) = (hud.time_left, hud.session_over) {
            println!("{}s left", time_left);
        }
    }

    let mut engine = engine.borrow_mut();
    engine.save_snapshot();
    engine.destroy();
}
