//! Rules of Gravity Grid: a 7x7 board of planets that move onto empty cells
//! next to a planet of their own color, chasing exact per-color score targets
//! within a move budget.
//!
//! The crate is frame driven and does no rendering, audio or I/O of its own.
//! A host feeds [`PlayEngine::frame`] the latest pointer sample once per frame
//! and draws from [`PlayEngine::board`] and [`PlayEngine::progress`].

pub use adjacency::*;
pub use board::*;
pub use cell::*;
pub use engine::*;
pub use error::*;
pub use level::*;
pub use pointer::*;
pub use progress::*;
pub use session::*;
pub use settings::*;
pub use store::*;
pub use types::*;

mod adjacency;
mod board;
mod cell;
mod engine;
mod error;
mod level;
mod pointer;
mod progress;
mod session;
mod settings;
mod store;
mod types;
