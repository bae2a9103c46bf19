use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Single grid axis, used for rows and columns.
pub type Coord = u8;

/// Row-major cell index, `0..CELL_COUNT`.
pub type Position = u8;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Width and height of the board.
pub const GRID_SIZE: Coord = 7;

pub const CELL_COUNT: usize = (GRID_SIZE as usize) * (GRID_SIZE as usize);

pub const fn to_coords(position: Position) -> Coord2 {
    (position / GRID_SIZE, position % GRID_SIZE)
}

pub const fn to_position((row, col): Coord2) -> Position {
    row * GRID_SIZE + col
}

pub const fn is_valid_position(position: Position) -> bool {
    (position as usize) < CELL_COUNT
}

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

impl ToNdIndex for Position {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        to_coords(self).to_nd_index()
    }
}

bitflags! {
    /// Compass directions from a cell towards its neighbors, north is row 0.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Directions: u8 {
        const N  = 1;
        const NE = 1 << 1;
        const E  = 1 << 2;
        const SE = 1 << 3;
        const S  = 1 << 4;
        const SW = 1 << 5;
        const W  = 1 << 6;
        const NW = 1 << 7;

        const ORTHOGONAL = Self::N.bits() | Self::E.bits() | Self::S.bits() | Self::W.bits();
        const DIAGONAL = Self::NE.bits() | Self::SE.bits() | Self::SW.bits() | Self::NW.bits();
        const ALL = Self::ORTHOGONAL.bits() | Self::DIAGONAL.bits();
    }
}

/// Single-step displacements `(direction, d_row, d_col)`.
pub(crate) const DISPLACEMENTS: [(Directions, i8, i8); 8] = [
    (Directions::N, -1, 0),
    (Directions::NE, -1, 1),
    (Directions::E, 0, 1),
    (Directions::SE, 1, 1),
    (Directions::S, 1, 0),
    (Directions::SW, 1, -1),
    (Directions::W, 0, -1),
    (Directions::NW, -1, -1),
];

/// Flat row-major offset of a single-step displacement, e.g. `+8` for south-east.
pub const fn flat_offset(d_row: i8, d_col: i8) -> i8 {
    d_row * (GRID_SIZE as i8) + d_col
}

/// Applies a displacement to `position`, returning a value only when it stays on the grid.
///
/// Bounds are checked on row and column separately, a flat offset alone would
/// wrap from the end of one row onto the start of the next.
pub(crate) const fn apply_delta(position: Position, d_row: i8, d_col: i8) -> Option<Position> {
    let (row, col) = to_coords(position);
    let row = row as i8 + d_row;
    let col = col as i8 + d_col;
    if row < 0 || col < 0 || row >= GRID_SIZE as i8 || col >= GRID_SIZE as i8 {
        return None;
    }
    Some(to_position((row as Coord, col as Coord)))
}
