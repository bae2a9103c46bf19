use thiserror::Error;

use crate::Position;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Level descriptor has {actual} entries, expected {expected}")]
    InvalidLevelLength { expected: usize, actual: usize },
    #[error("Unknown tile kind code {code} at position {position}")]
    UnknownKindCode { position: Position, code: i32 },
    #[error("Level target #{index} must be a non-negative i32, got {value}")]
    InvalidTarget { index: usize, value: i64 },
    #[error("Board is not 7x7")]
    InvalidBoardShape,
    #[error("Invalid position {0}")]
    InvalidPosition(Position),
    #[error("Board holds {count} cells with an exclusive interaction state, expected exactly one")]
    InconsistentSelection { count: usize },
    #[error("Cell at {0} does not hold a planet")]
    NotAPlanet(Position),
    #[error("Cell at {0} is not empty")]
    DestinationOccupied(Position),
    #[error("Level has ended, restart or load a level to keep playing")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, GameError>;

#[derive(Error, Debug)]
pub enum LevelPackError {
    #[error("Malformed level pack: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Level {index} is invalid: {source}")]
    Level {
        index: usize,
        #[source]
        source: GameError,
    },
}

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Could not encode or decode saved session: {0}")]
    Json(#[from] serde_json::Error),
}
