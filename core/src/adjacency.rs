use serde::{Deserialize, Serialize};

use crate::*;
use crate::types::{DISPLACEMENTS, apply_delta};

/// Topological class of a cell: the 5x5 middle block or the outer ring.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Topology {
    Interior,
    Boundary,
}

impl Topology {
    pub const fn of(position: Position) -> Self {
        let (row, col) = to_coords(position);
        let last = GRID_SIZE - 1;
        if row == 0 || col == 0 || row == last || col == last {
            Self::Boundary
        } else {
            Self::Interior
        }
    }
}

/// In-grid neighbors of every cell, one slot per entry of [`DISPLACEMENTS`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdjacencyTable {
    neighbors: [[Option<Position>; 8]; CELL_COUNT],
}

/// Computed at compile time.
pub static ADJACENCY: AdjacencyTable = AdjacencyTable::build();

impl AdjacencyTable {
    pub const fn build() -> Self {
        let mut neighbors = [[None; 8]; CELL_COUNT];
        let mut position = 0;
        while position < CELL_COUNT {
            let mut slot = 0;
            while slot < DISPLACEMENTS.len() {
                let (_, d_row, d_col) = DISPLACEMENTS[slot];
                neighbors[position][slot] = apply_delta(position as Position, d_row, d_col);
                slot += 1;
            }
            position += 1;
        }
        Self { neighbors }
    }

    /// Neighbors of `position` lying in one of `directions`.
    pub fn neighbors(
        &self,
        position: Position,
        directions: Directions,
    ) -> impl Iterator<Item = Position> + '_ {
        self.neighbors[position as usize]
            .iter()
            .zip(DISPLACEMENTS.iter())
            .filter(move |(_, (direction, _, _))| directions.contains(*direction))
            .filter_map(|(neighbor, _)| *neighbor)
    }
}

/// Decides whether the selected planet may move to `destination`.
///
/// The move is legal when a planet of the same color, other than the selected
/// one, sits next to the destination in one of the color's directions.
/// Requires exactly one selected cell on the board.
pub fn can_move(board: &Board, destination: Position) -> Result<bool> {
    let destination = Board::validate_position(destination)?;
    let Some(selected) = board.selected()? else {
        return Err(GameError::InconsistentSelection { count: 0 });
    };

    let Some(color) = board[selected].kind().planet() else {
        log::warn!("Selected cell {} holds no planet, move refused", selected);
        return Ok(false);
    };

    let anchor = ADJACENCY
        .neighbors(destination, color.directions())
        .filter(|&neighbor| neighbor != selected)
        .find(|&neighbor| board[neighbor].kind() == CellKind::Planet(color));

    log::trace!(
        "{:?} from {} to {} ({:?}): anchor {:?}",
        color,
        selected,
        destination,
        Topology::of(destination),
        anchor
    );
    Ok(anchor.is_some())
}
