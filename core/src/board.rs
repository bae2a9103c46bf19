use core::ops::Index;
use ndarray::Array2;
use rand::{Rng, SeedableRng, rngs::SmallRng};
use serde::{Deserialize, Serialize};

use crate::*;

/// Score weight of every position, doubling ring by ring towards the centre.
#[rustfmt::skip]
pub const CELL_VALUES: [u8; CELL_COUNT] = [
    2, 2, 2,  2, 2, 2, 2,
    2, 4, 4,  4, 4, 4, 2,
    2, 4, 8,  8, 8, 4, 2,
    2, 4, 8, 16, 8, 4, 2,
    2, 4, 8,  8, 8, 4, 2,
    2, 4, 4,  4, 4, 4, 2,
    2, 2, 2,  2, 2, 2, 2,
];

/// The 7x7 playing field derived from a [`LevelDescriptor`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Array2<Cell>", into = "Array2<Cell>")]
pub struct Board {
    cells: Array2<Cell>,
}

impl Board {
    /// Builds a board, drawing cosmetic planet variants from `seed`.
    pub fn new(level: &LevelDescriptor, planet_variants: u8, seed: u64) -> Self {
        let variants = planet_variants.max(1);
        let mut rng = SmallRng::seed_from_u64(seed);
        let size = GRID_SIZE as usize;
        let cells = Array2::from_shape_fn((size, size), |(row, col)| {
            let position = to_position((row as Coord, col as Coord));
            let kind = level.kind_at(position);
            let variant = if kind.planet().is_some() {
                rng.random_range(0..variants)
            } else {
                0
            };
            Cell::new(position, kind, CELL_VALUES[position as usize], variant)
        });
        Self { cells }
    }

    pub fn validate_position(position: Position) -> Result<Position> {
        if is_valid_position(position) {
            Ok(position)
        } else {
            Err(GameError::InvalidPosition(position))
        }
    }

    pub fn cell(&self, position: Position) -> Result<&Cell> {
        let position = Self::validate_position(position)?;
        Ok(&self.cells[position.to_nd_index()])
    }

    /// Cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// The currently selected cell, if any.
    pub fn selected(&self) -> Result<Option<Position>> {
        self.find_exclusive(InteractionState::Selected)
    }

    /// The cell marked as the destination of a pending move, if any.
    pub fn move_target(&self) -> Result<Option<Position>> {
        self.find_exclusive(InteractionState::MoveTarget)
    }

    fn find_exclusive(&self, state: InteractionState) -> Result<Option<Position>> {
        let mut matching = self.iter().filter(|cell| cell.interaction() == state);
        let first = matching.next().map(Cell::position);
        let extra = matching.count();
        if extra > 0 {
            return Err(GameError::InconsistentSelection { count: extra + 1 });
        }
        Ok(first)
    }

    pub(crate) fn set_interaction(&mut self, position: Position, state: InteractionState) {
        self.cells[position.to_nd_index()].set_interaction(state);
    }

    /// Resets every outcome marker left over from the previous input cycle.
    pub(crate) fn clear_transient(&mut self) {
        for cell in self.cells.iter_mut() {
            if cell.interaction().is_transient() {
                cell.set_interaction(InteractionState::None);
            }
        }
    }

    /// Moves the planet at `from` into the empty cell at `to`.
    pub fn relocate(&mut self, from: Position, to: Position) -> Result<()> {
        let source = *self.cell(from)?;
        let destination = self.cell(to)?;

        if source.kind().planet().is_none() {
            return Err(GameError::NotAPlanet(from));
        }
        if !destination.kind().is_empty() {
            return Err(GameError::DestinationOccupied(to));
        }

        let target = &mut self.cells[to.to_nd_index()];
        target.set_kind(source.kind(), source.visual_variant());
        target.set_interaction(InteractionState::MoveCompleted);

        let origin = &mut self.cells[from.to_nd_index()];
        origin.set_kind(CellKind::Empty, 0);
        origin.set_interaction(InteractionState::None);

        log::debug!("Relocated {:?} from {} to {}", source.kind(), from, to);
        Ok(())
    }
}

impl TryFrom<Array2<Cell>> for Board {
    type Error = GameError;

    /// Accepts only a 7x7 grid whose cells sit at their own positions.
    fn try_from(cells: Array2<Cell>) -> Result<Self> {
        let size = GRID_SIZE as usize;
        if cells.dim() != (size, size) {
            return Err(GameError::InvalidBoardShape);
        }
        for ((row, col), cell) in cells.indexed_iter() {
            if cell.position() != to_position((row as Coord, col as Coord)) {
                return Err(GameError::InvalidPosition(cell.position()));
            }
        }
        Ok(Self { cells })
    }
}

impl From<Board> for Array2<Cell> {
    fn from(board: Board) -> Self {
        board.cells
    }
}

impl Index<Position> for Board {
    type Output = Cell;

    fn index(&self, position: Position) -> &Self::Output {
        &self.cells[position.to_nd_index()]
    }
}
