use serde::{Deserialize, Serialize};

use crate::*;

/// Sum of cell values per planet color.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub red: u32,
    pub blue: u32,
    pub green: u32,
}

impl Totals {
    pub const fn for_color(&self, color: PlanetColor) -> u32 {
        match color {
            PlanetColor::Red => self.red,
            PlanetColor::Blue => self.blue,
            PlanetColor::Green => self.green,
        }
    }
}

/// Recomputes color totals from scratch.
pub fn recompute(board: &Board) -> Totals {
    board.iter().fold(Totals::default(), |mut totals, cell| {
        let value = u32::from(cell.value());
        match cell.kind().planet() {
            Some(PlanetColor::Red) => totals.red += value,
            Some(PlanetColor::Blue) => totals.blue += value,
            Some(PlanetColor::Green) => totals.green += value,
            None => {}
        }
        totals
    })
}

/// Win requires every color total to hit its target exactly, overshooting does not count.
pub fn is_level_won(totals: &Totals, targets: &Targets) -> bool {
    PlanetColor::ALL
        .iter()
        .all(|&color| totals.for_color(color) == targets.for_color(color))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    totals: Totals,
    moves_used: u32,
    targets: Targets,
}

impl Progress {
    pub fn new(board: &Board, targets: Targets) -> Self {
        Self {
            totals: recompute(board),
            moves_used: 0,
            targets,
        }
    }

    pub const fn totals(&self) -> Totals {
        self.totals
    }

    pub const fn targets(&self) -> Targets {
        self.targets
    }

    pub const fn moves_used(&self) -> u32 {
        self.moves_used
    }

    pub const fn max_moves(&self) -> u32 {
        self.targets.max_moves
    }

    pub const fn moves_left(&self) -> u32 {
        self.targets.max_moves.saturating_sub(self.moves_used)
    }

    pub fn is_won(&self) -> bool {
        is_level_won(&self.totals, &self.targets)
    }

    pub const fn is_out_of_moves(&self) -> bool {
        self.moves_used >= self.targets.max_moves
    }

    /// Counts one accepted move and refreshes the totals.
    pub(crate) fn record_move(&mut self, board: &Board) {
        self.moves_used += 1;
        self.totals = recompute(board);
    }
}
