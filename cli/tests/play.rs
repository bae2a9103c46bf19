use std::path::PathBuf;
use std::time::Duration;

use chrono::{TimeDelta, TimeZone, Utc};
use gravity_grid_cli::*;
use gravity_grid_core::*;

fn sample_pack() -> LevelPack {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("levels").join("sample.json");
    load_level_pack(&path, false).unwrap()
}

fn settings(max_lives: u32) -> Settings {
    Settings {
        session: SessionConfig {
            max_lives,
            ..SessionConfig::default()
        },
        ..Settings::default()
    }
}

fn replay(engine: &mut PlayEngine, pack: &LevelPack, session: &mut Session, taps: &[Position]) {
    for &tap in taps {
        replay_tap(engine, pack, session, tap).unwrap().unwrap();
    }
}

/// Two legal red moves on the first sample level that miss its target.
const WASTE_FIRST_LEVEL: [Position; 4] = [16, 26, 26, 38];

#[test]
fn taps_press_and_release_once() {
    let pack = sample_pack();
    let store = MemoryStore::new();
    let (mut session, mut engine) = start(&pack, None, &settings(5), &store, 1, Utc::now()).unwrap();

    let events = replay_tap(&mut engine, &pack, &mut session, 16).unwrap().unwrap();

    assert_eq!(events.as_slice(), &[EngineEvent::Selected(16)]);
    assert_eq!(engine.state(), GameState::TileSelected);
}

#[test]
fn completed_level_advances_to_the_next() {
    let pack = sample_pack();
    let store = MemoryStore::new();
    let (mut session, mut engine) = start(&pack, None, &settings(5), &store, 1, Utc::now()).unwrap();

    replay(&mut engine, &pack, &mut session, &[16, 24]);
    assert_eq!(engine.state(), GameState::LevelComplete);

    let events = replay_tap(&mut engine, &pack, &mut session, 10).unwrap().unwrap();

    assert_eq!(engine.level_index(), 1);
    assert_eq!(events.as_slice(), &[EngineEvent::Selected(10)]);
    assert_eq!(engine.board()[30].kind(), CellKind::GREEN);
}

#[test]
fn completing_the_last_level_replays_it() {
    let pack = sample_pack();
    let mut store = MemoryStore::new();
    let mut solved = Session::new(SessionConfig::default(), pack.len());
    solved.complete_level(0, 1);
    solved.save(&mut store).unwrap();
    let (mut session, mut engine) = start(&pack, Some(1), &settings(5), &store, 1, Utc::now()).unwrap();

    replay(&mut engine, &pack, &mut session, &[10, 17]);
    assert_eq!(engine.state(), GameState::LevelComplete);
    assert_eq!(engine.board()[17].kind(), CellKind::BLUE);

    let events = replay_tap(&mut engine, &pack, &mut session, 10).unwrap().unwrap();

    assert_eq!(engine.level_index(), 1);
    assert_eq!(events.as_slice(), &[EngineEvent::Selected(10)]);
    assert_eq!(engine.board()[17].kind(), CellKind::Empty);
    assert_eq!(engine.progress().moves_used(), 0);
}

#[test]
fn spent_budget_restarts_the_level() {
    let pack = sample_pack();
    let store = MemoryStore::new();
    let (mut session, mut engine) = start(&pack, None, &settings(5), &store, 1, Utc::now()).unwrap();

    replay(&mut engine, &pack, &mut session, &WASTE_FIRST_LEVEL);
    assert_eq!(engine.state(), GameState::OutOfMoves);
    assert_eq!(session.lives(), 4);

    let events = replay_tap(&mut engine, &pack, &mut session, 16).unwrap().unwrap();

    assert_eq!(events.as_slice(), &[EngineEvent::Selected(16)]);
    assert_eq!(engine.level_index(), 0);
    assert_eq!(engine.progress().moves_used(), 0);
    assert_eq!(engine.board()[38].kind(), CellKind::Empty);
}

#[test]
fn replay_stops_without_lives() {
    let pack = sample_pack();
    let store = MemoryStore::new();
    let (mut session, mut engine) = start(&pack, None, &settings(1), &store, 1, Utc::now()).unwrap();

    replay(&mut engine, &pack, &mut session, &WASTE_FIRST_LEVEL);
    assert!(session.is_out_of_lives());

    assert_eq!(replay_tap(&mut engine, &pack, &mut session, 16), Ok(None));
    assert_eq!(engine.state(), GameState::OutOfLives);
    assert!(!continue_after_end(&mut engine, &pack, &session));
}

#[test]
fn locked_levels_cannot_be_started() {
    let pack = sample_pack();
    let store = MemoryStore::new();

    assert!(start(&pack, Some(1), &settings(5), &store, 1, Utc::now()).is_err());
    assert!(start(&pack, Some(2), &settings(5), &store, 1, Utc::now()).is_err());
    assert!(start(&LevelPack::default(), None, &settings(5), &store, 1, Utc::now()).is_err());
}

#[test]
fn lives_regenerate_since_last_save() {
    let pack = sample_pack();
    let mut store = MemoryStore::new();
    let saved_at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let mut session = Session::new(SessionConfig::default(), pack.len());
    session.consume_life();
    session.consume_life();
    save(&session, &mut store, saved_at).unwrap();

    let later = saved_at + TimeDelta::seconds(1800 + 90);
    assert_eq!(elapsed_since_save(&store, later), Duration::from_secs(1890));

    let (restored, _) = start(&pack, None, &settings(5), &store, 1, later).unwrap();
    assert_eq!(restored.lives(), 4);
}

#[test]
fn unusable_save_times_count_as_no_time() {
    let mut store = MemoryStore::new();
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    assert_eq!(elapsed_since_save(&store, now), Duration::ZERO);

    save(&Session::new(SessionConfig::default(), 1), &mut store, now).unwrap();
    assert_eq!(elapsed_since_save(&store, now - TimeDelta::minutes(5)), Duration::ZERO);

    store.set(SAVED_AT_KEY, "1700000000".to_string());
    assert_eq!(elapsed_since_save(&store, now), Duration::ZERO);
}
