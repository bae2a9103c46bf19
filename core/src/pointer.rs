use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Where the board is drawn, in the same space pointer samples are reported in.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardGeometry {
    /// Top-left corner of cell 0.
    pub origin: Point,
    pub cell_size: f32,
}

impl Default for BoardGeometry {
    fn default() -> Self {
        Self {
            origin: Point::default(),
            cell_size: 64.0,
        }
    }
}

impl BoardGeometry {
    /// Maps a pointer sample to the cell under it.
    pub fn cell_at(&self, point: Point) -> Option<Position> {
        if self.cell_size.is_nan() || self.cell_size <= 0.0 {
            return None;
        }
        let col = ((point.x - self.origin.x) / self.cell_size).floor();
        let row = ((point.y - self.origin.y) / self.cell_size).floor();
        let range = 0.0..f32::from(GRID_SIZE);
        if !range.contains(&col) || !range.contains(&row) {
            return None;
        }
        Some(to_position((row as Coord, col as Coord)))
    }

    pub fn cell_center(&self, position: Position) -> Point {
        let (row, col) = to_coords(position);
        let half = self.cell_size / 2.0;
        Point::new(
            self.origin.x + f32::from(col) * self.cell_size + half,
            self.origin.y + f32::from(row) * self.cell_size + half,
        )
    }
}

/// Edge trigger for touch input: a held touch is reported once, then the gate
/// stays closed until a sample without a touch re-arms it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouchGate {
    ready_for_input: bool,
}

impl Default for TouchGate {
    fn default() -> Self {
        Self {
            ready_for_input: true,
        }
    }
}

impl TouchGate {
    pub fn sample(&mut self, pointer: Option<Point>) -> Option<Point> {
        match pointer {
            None => {
                self.ready_for_input = true;
                None
            }
            Some(point) if self.ready_for_input => {
                self.ready_for_input = false;
                Some(point)
            }
            Some(_) => None,
        }
    }

    pub const fn is_ready(&self) -> bool {
        self.ready_for_input
    }
}
