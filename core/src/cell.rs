use serde::{Deserialize, Serialize};

use crate::{Directions, Position};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanetColor {
    Red,
    Blue,
    Green,
}

impl PlanetColor {
    pub const ALL: [Self; 3] = [Self::Red, Self::Blue, Self::Green];

    /// Which neighbors of a destination may anchor a move of this color.
    pub const fn directions(self) -> Directions {
        match self {
            Self::Red => Directions::DIAGONAL,
            Self::Blue => Directions::ORTHOGONAL,
            Self::Green => Directions::ALL,
        }
    }
}

/// Semantic content of a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Empty,
    Planet(PlanetColor),
    Asteroid,
    Sun,
    Blocked,
}

impl CellKind {
    pub const RED: Self = Self::Planet(PlanetColor::Red);
    pub const BLUE: Self = Self::Planet(PlanetColor::Blue);
    pub const GREEN: Self = Self::Planet(PlanetColor::Green);

    /// Decodes a level-descriptor kind code.
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Empty),
            1 => Some(Self::RED),
            2 => Some(Self::BLUE),
            3 => Some(Self::GREEN),
            4 => Some(Self::Asteroid),
            5 => Some(Self::Sun),
            9 => Some(Self::Blocked),
            _ => None,
        }
    }

    pub const fn code(self) -> i32 {
        match self {
            Self::Empty => 0,
            Self::Planet(PlanetColor::Red) => 1,
            Self::Planet(PlanetColor::Blue) => 2,
            Self::Planet(PlanetColor::Green) => 3,
            Self::Asteroid => 4,
            Self::Sun => 5,
            Self::Blocked => 9,
        }
    }

    pub const fn planet(self) -> Option<PlanetColor> {
        match self {
            Self::Planet(color) => Some(color),
            _ => None,
        }
    }

    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl Default for CellKind {
    fn default() -> Self {
        Self::Empty
    }
}

/// Player-facing interaction status of a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionState {
    None,
    Selected,
    MoveTarget,
    MoveCompleted,
    Rejected,
}

impl InteractionState {
    /// Outcome markers that only live until the next input cycle.
    pub const fn is_transient(self) -> bool {
        matches!(self, Self::MoveCompleted | Self::Rejected)
    }
}

impl Default for InteractionState {
    fn default() -> Self {
        Self::None
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    position: Position,
    kind: CellKind,
    value: u8,
    interaction: InteractionState,
    variant: u8,
}

impl Cell {
    pub(crate) const fn new(position: Position, kind: CellKind, value: u8, variant: u8) -> Self {
        Self {
            position,
            kind,
            value,
            interaction: InteractionState::None,
            variant,
        }
    }

    pub const fn position(&self) -> Position {
        self.position
    }

    pub const fn kind(&self) -> CellKind {
        self.kind
    }

    pub const fn value(&self) -> u8 {
        self.value
    }

    pub const fn interaction(&self) -> InteractionState {
        self.interaction
    }

    /// Cosmetic index, travels with a planet when it moves.
    pub const fn visual_variant(&self) -> u8 {
        self.variant
    }

    pub(crate) fn set_kind(&mut self, kind: CellKind, variant: u8) {
        self.kind = kind;
        self.variant = variant;
    }

    pub(crate) fn set_interaction(&mut self, interaction: InteractionState) {
        self.interaction = interaction;
    }
}
