use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Valid transitions:
/// - Ready -> TileSelected
/// - TileSelected -> Ready
/// - TileSelected -> MoveAttempted
/// - MoveAttempted -> Ready
/// - MoveAttempted -> OutOfMoves
/// - MoveAttempted -> LevelComplete
/// - any -> OutOfLives
/// - OutOfMoves, LevelComplete, OutOfLives -> Ready (restart or level load)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// Waiting for a planet to be picked
    Ready,
    /// A planet is picked, waiting for its destination
    TileSelected,
    /// Destination picked, rule check pending for this frame
    MoveAttempted,
    /// Move budget spent without reaching the targets
    OutOfMoves,
    /// No dark matter left
    OutOfLives,
    /// Every target reached exactly
    LevelComplete,
}

impl GameState {
    /// Indicates only a restart or level load can continue play
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::OutOfMoves | Self::OutOfLives | Self::LevelComplete)
    }

    const fn accepts_taps(self) -> bool {
        matches!(self, Self::Ready | Self::TileSelected)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::Ready
    }
}

/// Observable consequences of input, for whoever draws or animates the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    Selected(Position),
    Deselected(Position),
    Rejected(Position),
    MoveTargeted(Position),
    Moved { from: Position, to: Position },
    LevelCompleted { level: usize, moves_used: u32 },
    OutOfMoves,
    LifeConsumed { lives_left: u32 },
    OutOfLives,
}

pub type Events = SmallVec<[EngineEvent; 4]>;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    /// Cell hit by a fresh touch this frame.
    pub tapped: Option<Position>,
    pub events: Events,
}

/// Drives one level: tap handling, move validation and end-of-level detection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayEngine {
    level_index: usize,
    level: LevelDescriptor,
    board: Board,
    progress: Progress,
    state: GameState,
    gate: TouchGate,
    geometry: BoardGeometry,
    planet_variants: u8,
    seed: u64,
}

impl PlayEngine {
    pub fn new(
        level_index: usize,
        level: LevelDescriptor,
        geometry: BoardGeometry,
        planet_variants: u8,
        seed: u64,
    ) -> Self {
        let board = Board::new(&level, planet_variants, seed);
        let progress = Progress::new(&board, level.targets());
        Self {
            level_index,
            level,
            board,
            progress,
            state: Default::default(),
            gate: Default::default(),
            geometry,
            planet_variants,
            seed,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn level(&self) -> &LevelDescriptor {
        &self.level
    }

    pub fn geometry(&self) -> &BoardGeometry {
        &self.geometry
    }

    /// Processes one frame worth of input, `pointer` is the latest touch sample if any.
    pub fn frame(&mut self, pointer: Option<Point>, session: &mut Session) -> Result<FrameReport> {
        let mut report = FrameReport::default();
        if self.check_lives(session, &mut report.events) {
            return Ok(report);
        }
        let touch = self.gate.sample(pointer);

        if let Some(point) = touch {
            report.tapped = self.geometry.cell_at(point);
            log::trace!("Touch at {:?} hits {:?}", point, report.tapped);
            if let Some(position) = report.tapped {
                self.handle_tap(position, &mut report.events)?;
            }
        }

        if matches!(self.state, GameState::MoveAttempted) {
            self.resolve_move(session, &mut report.events)?;
        }
        Ok(report)
    }

    /// Taps a cell directly, bypassing pointer mapping and the touch gate.
    ///
    /// Fails with [`GameError::AlreadyEnded`] once the level has ended, except for the
    /// tap that first notices the lives ran out, which reports [`EngineEvent::OutOfLives`].
    pub fn tap(&mut self, position: Position, session: &mut Session) -> Result<Events> {
        let position = Board::validate_position(position)?;
        let mut events = Events::new();
        if self.check_lives(session, &mut events) && !events.is_empty() {
            return Ok(events);
        }
        if self.state.is_finished() {
            return Err(GameError::AlreadyEnded);
        }

        self.handle_tap(position, &mut events)?;
        if matches!(self.state, GameState::MoveAttempted) {
            self.resolve_move(session, &mut events)?;
        }
        Ok(events)
    }

    /// Rebuilds the board of the current level.
    pub fn restart(&mut self, session: &Session) {
        log::debug!("Restarting level {}", self.level_index);
        self.board = Board::new(&self.level, self.planet_variants, self.seed);
        self.progress = Progress::new(&self.board, self.level.targets());
        self.state = if session.is_out_of_lives() {
            GameState::OutOfLives
        } else {
            GameState::Ready
        };
    }

    /// Switches to another level, e.g. after completing the current one.
    pub fn load_level(&mut self, level_index: usize, level: LevelDescriptor, session: &Session) {
        self.level_index = level_index;
        self.level = level;
        self.restart(session);
    }

    /// Forces `OutOfLives` once dark matter runs out, returns whether input must be ignored.
    fn check_lives(&mut self, session: &Session, events: &mut Events) -> bool {
        if !session.is_out_of_lives() {
            return false;
        }
        if !matches!(self.state, GameState::OutOfLives) {
            self.transition(GameState::OutOfLives);
            events.push(EngineEvent::OutOfLives);
        }
        true
    }

    fn handle_tap(&mut self, position: Position, events: &mut Events) -> Result<()> {
        use GameState::*;

        if !self.state.accepts_taps() {
            log::trace!("Ignoring tap at {} while {:?}", position, self.state);
            return Ok(());
        }

        self.board.clear_transient();
        let cell = self.board[position];

        match self.state {
            Ready => {
                if cell.kind().planet().is_none() || cell.interaction() != InteractionState::None {
                    log::trace!("Nothing to select at {}", position);
                    return Ok(());
                }
                self.board.set_interaction(position, InteractionState::Selected);
                self.transition(TileSelected);
                events.push(EngineEvent::Selected(position));
            }
            TileSelected => {
                let selected = self.expect_selected()?;
                if position == selected {
                    self.board.set_interaction(selected, InteractionState::None);
                    self.transition(Ready);
                    events.push(EngineEvent::Deselected(selected));
                } else if cell.kind().is_empty() {
                    self.board.set_interaction(position, InteractionState::MoveTarget);
                    self.transition(MoveAttempted);
                    events.push(EngineEvent::MoveTargeted(position));
                } else {
                    log::debug!("Cannot move onto occupied cell {}", position);
                    self.board.set_interaction(selected, InteractionState::None);
                    self.board.set_interaction(position, InteractionState::Rejected);
                    self.transition(Ready);
                    events.push(EngineEvent::Rejected(position));
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn resolve_move(&mut self, session: &mut Session, events: &mut Events) -> Result<()> {
        let selected = self.expect_selected()?;
        let target = self
            .board
            .move_target()?
            .ok_or(GameError::InconsistentSelection { count: 0 })?;

        if !can_move(&self.board, target)? {
            log::debug!("Move from {} to {} is not allowed", selected, target);
            self.board.set_interaction(selected, InteractionState::None);
            self.board.set_interaction(target, InteractionState::Rejected);
            self.transition(GameState::Ready);
            events.push(EngineEvent::Rejected(target));
            return Ok(());
        }

        self.board.relocate(selected, target)?;
        self.progress.record_move(&self.board);
        events.push(EngineEvent::Moved {
            from: selected,
            to: target,
        });
        log::debug!(
            "Move {}/{}, totals {:?}",
            self.progress.moves_used(),
            self.progress.max_moves(),
            self.progress.totals()
        );

        if self.progress.is_won() {
            let moves_used = self.progress.moves_used();
            self.transition(GameState::LevelComplete);
            session.complete_level(self.level_index, moves_used);
            events.push(EngineEvent::LevelCompleted {
                level: self.level_index,
                moves_used,
            });
        } else if self.progress.is_out_of_moves() {
            self.transition(GameState::OutOfMoves);
            let lives_left = session.consume_life();
            events.push(EngineEvent::OutOfMoves);
            events.push(EngineEvent::LifeConsumed { lives_left });
        } else {
            self.transition(GameState::Ready);
        }
        Ok(())
    }

    fn expect_selected(&self) -> Result<Position> {
        self.board
            .selected()?
            .ok_or(GameError::InconsistentSelection { count: 0 })
    }

    fn transition(&mut self, next: GameState) {
        if self.state != next {
            log::debug!("{:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(kinds: &[(Position, CellKind)], targets: Targets) -> LevelDescriptor {
        let mut cells = [CellKind::Empty; CELL_COUNT];
        for &(position, kind) in kinds {
            cells[position as usize] = kind;
        }
        LevelDescriptor::new(cells, targets)
    }

    fn engine(kinds: &[(Position, CellKind)], targets: Targets) -> PlayEngine {
        PlayEngine::new(0, level(kinds, targets), BoardGeometry::default(), 4, 1)
    }

    fn session() -> Session {
        Session::new(SessionConfig::default(), 2)
    }

    const RED_PAIR: [(Position, CellKind); 3] =
        [(10, CellKind::RED), (16, CellKind::RED), (17, CellKind::Asteroid)];

    const ROOMY: Targets = Targets {
        red: 100,
        blue: 0,
        green: 0,
        max_moves: 10,
    };

    #[test]
    fn tapping_a_planet_selects_it() {
        let mut engine = engine(&RED_PAIR, ROOMY);
        let mut session = session();

        let events = engine.tap(10, &mut session).unwrap();

        assert_eq!(events.as_slice(), &[EngineEvent::Selected(10)]);
        assert_eq!(engine.state(), GameState::TileSelected);
        assert_eq!(engine.board()[10].interaction(), InteractionState::Selected);
    }

    #[test]
    fn tapping_non_planets_in_ready_does_nothing() {
        let mut engine = engine(&RED_PAIR, ROOMY);
        let mut session = session();

        assert!(engine.tap(17, &mut session).unwrap().is_empty());
        assert!(engine.tap(0, &mut session).unwrap().is_empty());
        assert_eq!(engine.state(), GameState::Ready);
    }

    #[test]
    fn tapping_selection_again_deselects() {
        let mut engine = engine(&RED_PAIR, ROOMY);
        let mut session = session();

        engine.tap(10, &mut session).unwrap();
        let events = engine.tap(10, &mut session).unwrap();

        assert_eq!(events.as_slice(), &[EngineEvent::Deselected(10)]);
        assert_eq!(engine.state(), GameState::Ready);
        assert_eq!(engine.board().selected(), Ok(None));
    }

    #[test]
    fn occupied_destination_is_rejected_without_rule_check() {
        let mut engine = engine(&RED_PAIR, ROOMY);
        let mut session = session();

        engine.tap(10, &mut session).unwrap();
        let events = engine.tap(17, &mut session).unwrap();

        assert_eq!(events.as_slice(), &[EngineEvent::Rejected(17)]);
        assert_eq!(engine.state(), GameState::Ready);
        assert_eq!(engine.board()[17].interaction(), InteractionState::Rejected);
        assert_eq!(engine.board()[10].interaction(), InteractionState::None);
        assert_eq!(engine.progress().moves_used(), 0);
    }

    #[test]
    fn legal_move_relocates_and_counts() {
        let mut engine = engine(&RED_PAIR, ROOMY);
        let mut session = session();

        engine.tap(10, &mut session).unwrap();
        let events = engine.tap(24, &mut session).unwrap();

        assert_eq!(
            events.as_slice(),
            &[
                EngineEvent::MoveTargeted(24),
                EngineEvent::Moved { from: 10, to: 24 },
            ]
        );
        assert_eq!(engine.state(), GameState::Ready);
        assert_eq!(engine.board()[10].kind(), CellKind::Empty);
        assert_eq!(engine.board()[24].kind(), CellKind::RED);
        assert_eq!(engine.board()[24].interaction(), InteractionState::MoveCompleted);
        assert_eq!(engine.progress().moves_used(), 1);
        assert_eq!(engine.progress().totals().red, 16 + 8);
    }

    #[test]
    fn illegal_move_marks_target_rejected() {
        let mut engine = engine(&RED_PAIR, ROOMY);
        let mut session = session();

        engine.tap(10, &mut session).unwrap();
        let events = engine.tap(23, &mut session).unwrap();

        assert_eq!(
            events.as_slice(),
            &[EngineEvent::MoveTargeted(23), EngineEvent::Rejected(23)]
        );
        assert_eq!(engine.state(), GameState::Ready);
        assert_eq!(engine.board()[23].interaction(), InteractionState::Rejected);
        assert_eq!(engine.board()[23].kind(), CellKind::Empty);
        assert_eq!(engine.board().selected(), Ok(None));
        assert_eq!(engine.progress().moves_used(), 0);
    }

    #[test]
    fn transient_markers_clear_on_next_tap() {
        let mut engine = engine(&RED_PAIR, ROOMY);
        let mut session = session();

        engine.tap(10, &mut session).unwrap();
        engine.tap(23, &mut session).unwrap();
        engine.tap(16, &mut session).unwrap();

        assert_eq!(engine.board()[23].interaction(), InteractionState::None);
        assert_eq!(engine.board()[16].interaction(), InteractionState::Selected);
    }

    #[test]
    fn exact_targets_complete_the_level() {
        let targets = Targets {
            red: 16 + 8,
            blue: 0,
            green: 0,
            max_moves: 3,
        };
        let mut engine = engine(&[(16, CellKind::RED), (32, CellKind::RED)], targets);
        let mut session = session();

        engine.tap(16, &mut session).unwrap();
        let events = engine.tap(23, &mut session).unwrap();
        assert_eq!(events.last(), Some(&EngineEvent::Rejected(23)));

        engine.tap(16, &mut session).unwrap();
        let events = engine.tap(24, &mut session).unwrap();

        assert_eq!(
            events.last(),
            Some(&EngineEvent::LevelCompleted {
                level: 0,
                moves_used: 1,
            })
        );
        assert_eq!(engine.state(), GameState::LevelComplete);
        assert_eq!(session.current_level(), 1);
        assert!(session.record(0).is_some_and(|record| record.completed));
        assert_eq!(session.lives(), 5);
    }

    #[test]
    fn spending_the_budget_consumes_one_life() {
        let targets = Targets {
            red: 100,
            blue: 0,
            green: 0,
            max_moves: 1,
        };
        let mut engine = engine(&RED_PAIR, targets);
        let mut session = session();

        engine.tap(10, &mut session).unwrap();
        let events = engine.tap(24, &mut session).unwrap();

        assert_eq!(engine.state(), GameState::OutOfMoves);
        assert!(events.contains(&EngineEvent::OutOfMoves));
        assert!(events.contains(&EngineEvent::LifeConsumed { lives_left: 4 }));
        assert_eq!(session.lives(), 4);

        for _ in 0..3 {
            assert!(engine.frame(None, &mut session).unwrap().events.is_empty());
            assert_eq!(engine.tap(16, &mut session), Err(GameError::AlreadyEnded));
        }
        assert_eq!(session.lives(), 4);
        assert_eq!(engine.state(), GameState::OutOfMoves);
    }

    #[test]
    fn restart_rebuilds_the_board() {
        let targets = Targets {
            red: 100,
            blue: 0,
            green: 0,
            max_moves: 1,
        };
        let mut engine = engine(&RED_PAIR, targets);
        let mut session = session();
        let fresh = engine.board().clone();

        engine.tap(10, &mut session).unwrap();
        engine.tap(24, &mut session).unwrap();
        engine.restart(&session);

        assert_eq!(engine.state(), GameState::Ready);
        assert_eq!(engine.board(), &fresh);
        assert_eq!(engine.progress().moves_used(), 0);
    }

    #[test]
    fn no_lives_forces_out_of_lives() {
        let mut engine = engine(&RED_PAIR, ROOMY);
        let mut session = Session::new(
            SessionConfig {
                max_lives: 1,
                ..SessionConfig::default()
            },
            1,
        );
        engine.tap(10, &mut session).unwrap();
        session.consume_life();

        let events = engine.tap(24, &mut session).unwrap();
        assert_eq!(events.as_slice(), &[EngineEvent::OutOfLives]);
        assert_eq!(engine.state(), GameState::OutOfLives);
        assert_eq!(engine.board()[24].kind(), CellKind::Empty);

        assert_eq!(engine.tap(24, &mut session), Err(GameError::AlreadyEnded));

        engine.restart(&session);
        assert_eq!(engine.state(), GameState::OutOfLives);

        session.tick(session.config().life_regen());
        engine.restart(&session);
        assert_eq!(engine.state(), GameState::Ready);
    }

    #[test]
    fn taps_after_the_level_ends_fail() {
        let targets = Targets {
            red: 16 + 8,
            blue: 0,
            green: 0,
            max_moves: 3,
        };
        let mut engine = engine(&[(16, CellKind::RED), (32, CellKind::RED)], targets);
        let mut session = session();
        engine.tap(16, &mut session).unwrap();
        engine.tap(24, &mut session).unwrap();
        assert!(engine.state().is_finished());
        let board = engine.board().clone();

        assert_eq!(engine.tap(24, &mut session), Err(GameError::AlreadyEnded));
        assert_eq!(engine.board(), &board);

        // frames keep running, they just ignore input
        let on_target = Some(engine.geometry().cell_center(24));
        let report = engine.frame(on_target, &mut session).unwrap();
        assert!(report.events.is_empty());
        assert_eq!(engine.state(), GameState::LevelComplete);
    }

    #[test]
    fn lives_are_checked_before_the_touch_gate() {
        let mut engine = engine(&RED_PAIR, ROOMY);
        let mut session = Session::new(
            SessionConfig {
                max_lives: 1,
                ..SessionConfig::default()
            },
            1,
        );
        let on_planet = Some(engine.geometry().cell_center(10));
        session.consume_life();

        let report = engine.frame(on_planet, &mut session).unwrap();
        assert_eq!(report.events.as_slice(), &[EngineEvent::OutOfLives]);
        assert_eq!(report.tapped, None);

        session.tick(session.config().life_regen());
        engine.restart(&session);

        // the press swallowed while out of lives was never sampled, so it still counts
        let report = engine.frame(on_planet, &mut session).unwrap();
        assert_eq!(report.tapped, Some(10));
        assert_eq!(engine.state(), GameState::TileSelected);
    }

    #[test]
    fn frames_are_edge_triggered() {
        let mut engine = engine(&RED_PAIR, ROOMY);
        let mut session = session();
        let geometry = *engine.geometry();
        let on_planet = Some(geometry.cell_center(10));

        let report = engine.frame(on_planet, &mut session).unwrap();
        assert_eq!(report.tapped, Some(10));
        assert_eq!(engine.state(), GameState::TileSelected);

        // still held down, must not deselect
        let report = engine.frame(on_planet, &mut session).unwrap();
        assert_eq!(report.tapped, None);
        assert_eq!(engine.state(), GameState::TileSelected);

        engine.frame(None, &mut session).unwrap();
        let report = engine.frame(Some(geometry.cell_center(24)), &mut session).unwrap();
        assert_eq!(report.tapped, Some(24));
        assert_eq!(
            report.events.last(),
            Some(&EngineEvent::Moved { from: 10, to: 24 })
        );
    }

    #[test]
    fn touches_outside_the_board_are_ignored() {
        let mut engine = engine(&RED_PAIR, ROOMY);
        let mut session = session();

        let report = engine
            .frame(Some(Point::new(-5.0, 10.0)), &mut session)
            .unwrap();

        assert_eq!(report, FrameReport::default());
        assert_eq!(engine.state(), GameState::Ready);
    }

    #[test]
    fn load_level_switches_descriptor() {
        let mut engine = engine(&RED_PAIR, ROOMY);
        let session = session();
        let next = level(&[(30, CellKind::GREEN)], Targets::default());

        engine.load_level(1, next.clone(), &session);

        assert_eq!(engine.level_index(), 1);
        assert_eq!(engine.level(), &next);
        assert_eq!(engine.board()[30].kind(), CellKind::GREEN);
        assert_eq!(engine.board()[10].kind(), CellKind::Empty);
    }

    #[test]
    fn tap_out_of_range_is_an_error() {
        let mut engine = engine(&RED_PAIR, ROOMY);
        let mut session = session();

        assert_eq!(
            engine.tap(49, &mut session),
            Err(GameError::InvalidPosition(49))
        );
    }
}
