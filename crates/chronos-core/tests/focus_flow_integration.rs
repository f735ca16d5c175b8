//! End-to-end focus flow: select, run down, score, aggregate.
//!
//! Exercises the timer against the real SQLite store (in memory) and
//! checks the recorded history through the aggregation functions.

use chrono::{DateTime, Local, TimeZone};
use proptest::prelude::*;

use chronos_core::{
    clock::day_key, stats, Database, Event, FocusTotals, History, TimerEngine,
    TimerPhase,
};

fn at(h: u32, m: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 3, 6, h, m, 0).unwrap()
}

fn run_to_completion(engine: &mut TimerEngine, now: DateTime<Local>) -> usize {
    let mut completions = 0;
    while engine.phase() == TimerPhase::Running {
        if let Some(Event::TimerCompleted { .. }) = engine.tick(now) {
            completions += 1;
        }
    }
    completions
}

#[test]
fn scored_completion_lands_in_the_database() {
    let mut db = Database::open_memory().unwrap();
    let mut engine = TimerEngine::new(35).unwrap();

    engine.select_duration(25, at(9, 0)).unwrap();
    engine.start(at(9, 0)).unwrap();
    assert_eq!(run_to_completion(&mut engine, at(9, 25)), 1);

    let event = engine.score(4, at(9, 25), &mut db).unwrap();
    let session = match event {
        Event::SessionRecorded { session, .. } => session,
        other => panic!("expected SessionRecorded, got {other:?}"),
    };
    assert_eq!(session.duration_minutes, 25);
    assert_eq!(session.date, day_key(at(9, 25)));

    let history = db.sessions_all().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0], session);

    // Scoring again after the single completion is rejected.
    assert!(engine.score(4, at(9, 26), &mut db).is_err());
    assert_eq!(db.sessions_all().unwrap().len(), 1);
}

#[test]
fn start_abandon_cycles_never_record() {
    let db = Database::open_memory().unwrap();
    let mut engine = TimerEngine::new(25).unwrap();

    for _ in 0..5 {
        engine.start(at(10, 0)).unwrap();
        for _ in 0..90 {
            engine.tick(at(10, 1));
        }
        engine.abandon(at(10, 2)).unwrap();
        assert_eq!(engine.phase(), TimerPhase::Idle);
        assert_eq!(engine.remaining_seconds(), 25 * 60);
    }

    assert!(db.sessions_all().unwrap().is_empty());
}

#[test]
fn midnight_spanning_session_belongs_to_the_completion_day() {
    let mut history = History::new();
    let mut engine = TimerEngine::new(25).unwrap();
    engine.start(at(23, 50)).unwrap();

    let completion = Local.with_ymd_and_hms(2024, 3, 7, 0, 15, 0).unwrap();
    run_to_completion(&mut engine, completion);
    engine.score(3, completion, &mut history).unwrap();

    let session = &history.snapshot()[0];
    assert_eq!(session.date, day_key(completion));
    assert!(session.start_time < completion.timestamp_millis());
}

#[test]
fn recorded_history_feeds_the_aggregates() {
    let mut history = History::new();
    for (minutes, energy, hour) in [(25u32, 4u8, 8u32), (10, 3, 10), (50, 5, 14)] {
        let mut engine = TimerEngine::new(minutes).unwrap();
        engine.start(at(hour, 0)).unwrap();
        run_to_completion(&mut engine, at(hour, 40));
        engine.score(energy, at(hour, 40), &mut history).unwrap();
    }

    let snapshot = history.snapshot();
    let (count, minutes) = stats::count_and_minutes(snapshot);
    assert_eq!((count, minutes), (3, 85));

    let totals = FocusTotals::from_sessions(snapshot);
    let starting = stats::badge_progress(totals, chronos_core::Badge::StartingPoint);
    assert!(starting.earned);

    let today = day_key(at(9, 0));
    assert_eq!(stats::streak(snapshot, today), 1);

    let buckets = stats::intraday_energy(snapshot);
    assert_eq!(buckets[0].energy, 4); // 08:40 completion
    assert_eq!(buckets[2].energy, 0); // nothing at 12
    assert_eq!(buckets[3].energy, 5); // 14:40 completion
}

proptest! {
    /// Any surplus of ticks past the planned duration still yields
    /// exactly one completion and a clamped, non-negative clock.
    #[test]
    fn completion_is_exactly_once(minutes in prop::sample::select(vec![5u32, 10, 15, 25]),
                                  surplus in 0u32..200) {
        let mut engine = TimerEngine::new(minutes).unwrap();
        engine.start(at(8, 0)).unwrap();

        let mut completions = 0;
        for _ in 0..(minutes * 60 + surplus) {
            if let Some(Event::TimerCompleted { .. }) = engine.tick(at(8, 30)) {
                completions += 1;
            }
        }
        prop_assert_eq!(completions, 1);
        prop_assert_eq!(engine.remaining_seconds(), 0);
        prop_assert_eq!(engine.phase(), TimerPhase::AwaitingScore);
    }

    /// Ticks short of the duration never complete, and abandoning
    /// restores the idle invariant.
    #[test]
    fn early_abandon_discards(minutes in prop::sample::select(vec![5u32, 25]),
                              spent in 1u32..200) {
        let spent = spent.min(minutes * 60 - 1);
        let mut engine = TimerEngine::new(minutes).unwrap();
        engine.start(at(8, 0)).unwrap();
        for _ in 0..spent {
            prop_assert!(engine.tick(at(8, 1)).is_none());
        }
        engine.abandon(at(8, 2)).unwrap();
        prop_assert_eq!(engine.phase(), TimerPhase::Idle);
        prop_assert_eq!(engine.remaining_seconds(), minutes * 60);
    }
}
