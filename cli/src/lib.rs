//! Helpers behind the `gravity-grid` command: file-backed persistence,
//! settings loading, tap parsing, the replay loop and a plain-text board view.

use std::fs;
use std::path::Path;

use anyhow::{Context, bail};
use gravity_grid_core::{GRID_SIZE, LevelPack, Position, Settings, to_position};

pub use play::*;
pub use render::*;
pub use store::*;

mod play;
mod render;
mod store;

/// Reads settings from a TOML file, defaults when no file is given.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Could not read settings from {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Invalid settings in {}", path.display()))
}

pub fn load_level_pack(path: &Path, lenient: bool) -> anyhow::Result<LevelPack> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Could not read levels from {}", path.display()))?;
    let pack = if lenient {
        LevelPack::from_json_lenient(&json)
    } else {
        LevelPack::from_json(&json)
    };
    pack.with_context(|| format!("Invalid level pack {}", path.display()))
}

/// Parses a tap given either as a cell index or as `row,col`.
pub fn parse_tap(text: &str) -> anyhow::Result<Position> {
    let size = GRID_SIZE;
    let position = match text.split_once(',') {
        Some((row, col)) => {
            let row: Position = row.trim().parse().with_context(|| format!("Invalid row in {text:?}"))?;
            let col: Position = col.trim().parse().with_context(|| format!("Invalid column in {text:?}"))?;
            if row >= size || col >= size {
                bail!("Cell {text:?} is outside the {size}x{size} board");
            }
            to_position((row, col))
        }
        None => {
            let position: Position = text.trim().parse().with_context(|| format!("Invalid cell {text:?}"))?;
            if usize::from(position) >= usize::from(size) * usize::from(size) {
                bail!("Cell {position} is outside the {size}x{size} board");
            }
            position
        }
    };
    Ok(position)
}
