use std::time::Duration;

use anyhow::{Context, bail};
use chrono::prelude::*;
use gravity_grid_core::{
    Events, GameState, LevelPack, PlayEngine, Position, Session, Settings, SettingsStore,
};

pub const SAVED_AT_KEY: &str = "gravity-grid.saved_at";

/// Restores the saved session, credits regeneration since the last save and loads a level.
///
/// `level` falls back to the session's current level, locked levels are refused.
pub fn start(
    pack: &LevelPack,
    level: Option<usize>,
    settings: &Settings,
    store: &impl SettingsStore,
    seed: u64,
    now: DateTime<Utc>,
) -> anyhow::Result<(Session, PlayEngine)> {
    if pack.is_empty() {
        bail!("Level pack is empty");
    }

    let mut session = Session::load(store, settings.session, pack.len())?;
    let regained = session.tick(elapsed_since_save(store, now));
    if regained > 0 {
        log::info!("Regenerated {} lives while away", regained);
    }

    let index = level.unwrap_or(session.current_level());
    if !session.select_level(index) {
        bail!("Level {} is locked or does not exist", index + 1);
    }
    let descriptor = pack
        .get(index)
        .with_context(|| format!("Level {} does not exist", index + 1))?
        .clone();

    log::debug!("seed: {}", seed);
    let engine = PlayEngine::new(
        index,
        descriptor,
        settings.geometry,
        settings.session.planet_variants,
        seed,
    );
    Ok((session, engine))
}

/// Persists the session together with the time it was saved at.
pub fn save(
    session: &Session,
    store: &mut impl SettingsStore,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    session.save(store)?;
    store.set(SAVED_AT_KEY, serde_json::to_string(&now)?);
    Ok(())
}

/// Wall time since the last [`save`], zero when unknown or in the future.
pub fn elapsed_since_save(store: &impl SettingsStore, now: DateTime<Utc>) -> Duration {
    let Some(saved_at) = store.get(SAVED_AT_KEY) else {
        return Duration::ZERO;
    };
    match serde_json::from_str::<DateTime<Utc>>(&saved_at) {
        Ok(saved_at) => (now - saved_at).to_std().unwrap_or(Duration::ZERO),
        Err(err) => {
            log::error!("Ignoring unreadable save time {:?}: {}", saved_at, err);
            Duration::ZERO
        }
    }
}

/// Stands in for the restart and next-level buttons once a level has ended.
///
/// Returns `false` when there are no lives left to continue with.
pub fn continue_after_end(engine: &mut PlayEngine, pack: &LevelPack, session: &Session) -> bool {
    match engine.state() {
        GameState::OutOfMoves => {
            log::info!("Restarting level {}", engine.level_index() + 1);
            engine.restart(session);
        }
        GameState::LevelComplete => {
            let next = session.current_level();
            match pack.get(next) {
                Some(level) if next != engine.level_index() => {
                    log::info!("Advancing to level {}", next + 1);
                    engine.load_level(next, level.clone(), session);
                }
                _ => {
                    log::info!("Replaying level {}", engine.level_index() + 1);
                    engine.restart(session);
                }
            }
        }
        _ => {}
    }
    !matches!(engine.state(), GameState::OutOfLives)
}

/// Presses and releases the pointer over `tap`, continuing past a finished level first.
///
/// Returns `None` once the player is out of lives.
pub fn replay_tap(
    engine: &mut PlayEngine,
    pack: &LevelPack,
    session: &mut Session,
    tap: Position,
) -> gravity_grid_core::Result<Option<Events>> {
    if !continue_after_end(engine, pack, session) {
        return Ok(None);
    }
    let pointer = engine.geometry().cell_center(tap);
    let mut events = engine.frame(Some(pointer), session)?.events;
    events.extend(engine.frame(None, session)?.events);
    Ok(Some(events))
}
