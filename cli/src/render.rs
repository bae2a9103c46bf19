use std::fmt::Write;

use gravity_grid_core::{
    Board, Cell, CellKind, EngineEvent, GRID_SIZE, InteractionState, PlanetColor, PlayEngine, Session,
};

pub const fn glyph(kind: CellKind) -> char {
    match kind {
        CellKind::Empty => '.',
        CellKind::Planet(PlanetColor::Red) => 'R',
        CellKind::Planet(PlanetColor::Blue) => 'B',
        CellKind::Planet(PlanetColor::Green) => 'G',
        CellKind::Asteroid => '#',
        CellKind::Sun => '*',
        CellKind::Blocked => 'X',
    }
}

fn render_cell(cell: &Cell) -> String {
    let (left, right) = match cell.interaction() {
        InteractionState::None => (' ', ' '),
        InteractionState::Selected => ('[', ']'),
        InteractionState::MoveTarget => ('(', ')'),
        InteractionState::MoveCompleted => ('+', '+'),
        InteractionState::Rejected => ('!', '!'),
    };
    format!("{left}{}{right}", glyph(cell.kind()))
}

/// Board as a 7-line grid, interaction states shown as brackets around the glyph.
pub fn render_board(board: &Board) -> String {
    let mut out = String::new();
    for (index, cell) in board.iter().enumerate() {
        out.push_str(&render_cell(cell));
        if (index + 1) % usize::from(GRID_SIZE) == 0 {
            out.push('\n');
        }
    }
    out
}

pub fn render_hud(engine: &PlayEngine, session: &Session) -> String {
    let progress = engine.progress();
    let totals = progress.totals();
    let targets = progress.targets();
    let mut out = String::new();
    let _ = write!(
        out,
        "level {}  red {}/{}  blue {}/{}  green {}/{}  moves {}/{}  lives {}  {:?}",
        engine.level_index() + 1,
        totals.red,
        targets.red,
        totals.blue,
        targets.blue,
        totals.green,
        targets.green,
        progress.moves_used(),
        progress.max_moves(),
        session.lives(),
        engine.state(),
    );
    out
}

pub fn describe_event(event: &EngineEvent) -> String {
    match *event {
        EngineEvent::Selected(position) => format!("selected {position}"),
        EngineEvent::Deselected(position) => format!("deselected {position}"),
        EngineEvent::Rejected(position) => format!("rejected {position}"),
        EngineEvent::MoveTargeted(position) => format!("trying {position}"),
        EngineEvent::Moved { from, to } => format!("moved {from} -> {to}"),
        EngineEvent::LevelCompleted { level, moves_used } => {
            format!("level {} complete in {moves_used} moves", level + 1)
        }
        EngineEvent::OutOfMoves => "out of moves".to_string(),
        EngineEvent::LifeConsumed { lives_left } => format!("lost a life, {lives_left} left"),
        EngineEvent::OutOfLives => "out of lives".to_string(),
    }
}
