use chrono::{DateTime, Local};
use clap::Subcommand;

use chronos_core::timer::{announce_completion, TerminalBell};
use chronos_core::{Clock, Config, Database, Event, SystemClock, TimerEngine};

use super::CliResult;

const ENGINE_KEY: &str = "timer_engine";
const LAST_TICK_KEY: &str = "timer_last_tick";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Select the planned duration (idle only; one of the fixed options)
    Select {
        /// Minutes, e.g. 25
        minutes: u32,
    },
    /// Start the countdown
    Start,
    /// Catch up elapsed time and print the current state as JSON
    Status,
    /// Abandon the running countdown, discarding progress
    Abandon,
    /// Score the completed session (1-5) and record it
    Score {
        /// Energy score, 1-5
        score: u8,
    },
}

fn load_engine(db: &Database, config: &Config) -> TimerEngine {
    if let Ok(Some(json)) = db.kv_get(ENGINE_KEY) {
        if let Ok(engine) = serde_json::from_str::<TimerEngine>(&json) {
            return engine;
        }
    }
    TimerEngine::new(config.timer.pomodoro_minutes).unwrap_or_default()
}

fn save_engine(db: &Database, engine: &TimerEngine) -> CliResult {
    let json = serde_json::to_string(engine)?;
    db.kv_set(ENGINE_KEY, &json)?;
    Ok(())
}

/// Deliver the ticks that elapsed since the last invocation. The engine
/// clamps at zero and completes at most once, so a long absence simply
/// arrives as a burst.
fn catch_up(db: &Database, engine: &mut TimerEngine, now: DateTime<Local>) -> Option<Event> {
    let last = db
        .kv_get(LAST_TICK_KEY)
        .ok()
        .flatten()
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or_else(|| now.timestamp());
    let elapsed = now.timestamp().saturating_sub(last).max(0) as u32;
    let _ = db.kv_set(LAST_TICK_KEY, &now.timestamp().to_string());

    let mut completed = None;
    for _ in 0..elapsed.min(engine.remaining_seconds().saturating_add(1)) {
        if let Some(event @ Event::TimerCompleted { .. }) = engine.tick(now) {
            completed = Some(event);
        }
    }
    completed
}

fn handle_completion(event: &Event, config: &Config) {
    if let Event::TimerCompleted { .. } = event {
        announce_completion(config.completion_cues(), &TerminalBell);
    }
}

pub fn run(action: TimerAction) -> CliResult {
    let config = Config::load_or_default();
    let mut db = Database::open()?;
    let mut engine = load_engine(&db, &config);
    let now = SystemClock.now();

    // The engine is saved even when the action is rejected: catch-up
    // ticks may have advanced it (e.g. completed while away), and that
    // progress must not be lost.
    let result = execute(action, &config, &mut db, &mut engine, now);
    save_engine(&db, &engine)?;
    result
}

fn execute(
    action: TimerAction,
    config: &Config,
    db: &mut Database,
    engine: &mut TimerEngine,
    now: DateTime<Local>,
) -> CliResult {
    match action {
        TimerAction::Select { minutes } => {
            if let Some(event) = catch_up(db, engine, now) {
                handle_completion(&event, config);
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
            if let Some(event) = engine.select_duration(minutes, now)? {
                println!("{}", serde_json::to_string_pretty(&event)?);
            } else {
                // Ignored outside idle; show the unchanged state instead.
                println!("{}", serde_json::to_string_pretty(&engine.snapshot(now))?);
            }
        }
        TimerAction::Start => {
            let event = engine.start(now)?;
            db.kv_set(LAST_TICK_KEY, &now.timestamp().to_string())?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        TimerAction::Status => {
            if let Some(event) = catch_up(db, engine, now) {
                handle_completion(&event, config);
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
            println!("{}", serde_json::to_string_pretty(&engine.snapshot(now))?);
        }
        TimerAction::Abandon => {
            if let Some(event) = catch_up(db, engine, now) {
                // Completed while away: nothing left to abandon.
                handle_completion(&event, config);
                println!("{}", serde_json::to_string_pretty(&event)?);
                return Ok(());
            }
            let event = engine.abandon(now)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        TimerAction::Score { score } => {
            if let Some(event) = catch_up(db, engine, now) {
                handle_completion(&event, config);
            }
            let event = engine.score(score, now, db)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
    }

    Ok(())
}
