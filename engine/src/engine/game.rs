// engine/src/engine/game.rs
#![forbid(unsafe_code)]

use tracing::{debug, trace};

use crate::engine::cell::Cell;
use crate::engine::constants::{COLS, ROWS, decode_move_id, encode_move_id};
use crate::engine::error::EngineError;
use crate::engine::grid::{Direction, Grid};
use crate::engine::row_source::{RowSource, UniformRowSource};

/// Rotate one row by one position.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SlideMove {
    pub row: usize,
    pub dir: Direction,
}

impl SlideMove {
    pub fn new(row: usize, dir: Direction) -> Self {
        Self { row, dir }
    }

    pub fn id(self) -> usize {
        encode_move_id(self.row, self.dir.idx())
    }

    pub fn from_id(mid: usize) -> Self {
        let (row, dir) = decode_move_id(mid);
        match Direction::from_idx(dir) {
            Some(dir) => Self { row, dir },
            None => unreachable!("decode_move_id yields dir < 2"),
        }
    }
}

/// Outcome of the pure turn kernel on a copy of a grid.
#[derive(Clone, Debug)]
pub struct SimTurn {
    /// After the optional slide, the insertion and its gravity pass.
    pub grid_after_insert: Grid,
    /// After row clearing (and the follow-up gravity pass, if anything cleared).
    pub grid_after_clear: Grid,
    pub cleared_rows: u32,
    /// Top row occupied after the turn.
    pub game_over: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TurnResult {
    /// True game over (top row occupied) OR session already in `GameOver`.
    pub terminated: bool,
    pub cleared_rows: u32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TurnPhase {
    /// Waiting for the next turn.
    Idle,
    /// Terminal; further steps are no-ops.
    GameOver,
}

/// One play session: the live grid, the incoming-row stream and counters.
pub struct Game {
    pub grid: Grid,

    source: Box<dyn RowSource>,
    next_row: Vec<Cell>,
    phase: TurnPhase,

    pub score: u64,
    pub rows_cleared: u64,
    pub turns: u64,
}

impl Game {
    /// Default puzzle: 11x9 creature-rule board with uniform plain rows.
    pub fn new(seed: u64) -> Self {
        Self::with_source(
            Grid::new(ROWS, COLS),
            Box::new(UniformRowSource::new(seed)),
        )
    }

    /// Start a session on `grid`. The first incoming row is drawn immediately so
    /// policies can see it before the first turn.
    ///
    /// A board whose top row is already occupied starts in `GameOver`.
    pub fn with_source(grid: Grid, mut source: Box<dyn RowSource>) -> Self {
        let next_row = source.next_row(grid.cols());
        let phase = Self::phase_for(&grid);
        Self {
            grid,
            source,
            next_row,
            phase,
            score: 0,
            rows_cleared: 0,
            turns: 0,
        }
    }

    fn phase_for(grid: &Grid) -> TurnPhase {
        if grid.game_over() {
            TurnPhase::GameOver
        } else {
            TurnPhase::Idle
        }
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.phase == TurnPhase::GameOver
    }

    /// Row that the next turn will insert.
    pub fn next_row(&self) -> &[Cell] {
        &self.next_row
    }

    /// Replace the pending row with a manually authored one.
    /// On error the previous pending row is kept.
    pub fn set_next_row(&mut self, row: &[Cell]) -> Result<(), EngineError> {
        self.grid.check_new_row(row)?;
        self.next_row = row.to_vec();
        Ok(())
    }

    /// Replace the live board. The new board must match the session's dimensions.
    /// The phase follows the new board: `GameOver` iff its top row is occupied.
    pub fn load_board(&mut self, grid: Grid) -> Result<(), EngineError> {
        if grid.rows() != self.grid.rows() || grid.cols() != self.grid.cols() {
            return Err(EngineError::MalformedBoardInput(format!(
                "expected {}x{} board, got {}x{}",
                self.grid.rows(),
                self.grid.cols(),
                grid.rows(),
                grid.cols()
            )));
        }
        self.phase = Self::phase_for(&grid);
        self.grid = grid;
        Ok(())
    }

    /// Every slide move on the current board, in solver iteration order.
    pub fn valid_move_ids(&self) -> Vec<usize> {
        (0..self.grid.rows() * Direction::ALL.len()).collect()
    }

    // -------------------------------------------------------------------------
    // Pure transition kernel
    // -------------------------------------------------------------------------

    /// Play one turn on a deep copy of `grid`:
    /// optional slide, append `new_row` at the bottom (gravity), clear filled rows
    /// (gravity if any cleared), then check the top row.
    pub fn simulate_turn(
        grid: &Grid,
        mv: Option<SlideMove>,
        new_row: &[Cell],
    ) -> Result<SimTurn, EngineError> {
        let mut g = grid.clone();
        if let Some(mv) = mv {
            g.slide_row(mv.row, mv.dir)?;
        }
        g.add_new_row(new_row)?;
        let grid_after_insert = g.clone();

        let cleared_rows = g.clear_filled_rows();
        let game_over = g.game_over();

        Ok(SimTurn {
            grid_after_insert,
            grid_after_clear: g,
            cleared_rows,
            game_over,
        })
    }

    pub fn simulate_move(&self, mv: Option<SlideMove>) -> Result<SimTurn, EngineError> {
        Self::simulate_turn(&self.grid, mv, &self.next_row)
    }

    // -------------------------------------------------------------------------
    // Mutating step
    // -------------------------------------------------------------------------

    /// Play one turn with the pending row.
    ///
    /// Session semantics:
    /// - A bad move is rejected with `InvalidDimensions`; nothing changes.
    /// - Game over is detected iff the post-clear grid occupies the top row, and latches.
    pub fn step(&mut self, mv: Option<SlideMove>) -> Result<TurnResult, EngineError> {
        if self.is_game_over() {
            return Ok(TurnResult {
                terminated: true,
                cleared_rows: 0,
            });
        }

        let sim = self.simulate_move(mv)?;

        self.grid = sim.grid_after_clear;
        self.rows_cleared += u64::from(sim.cleared_rows);
        self.score += 100 * u64::from(sim.cleared_rows);
        self.turns += 1;
        trace!(turn = self.turns, ?mv, cleared = sim.cleared_rows, "turn");

        if sim.game_over {
            self.phase = TurnPhase::GameOver;
            debug!(turns = self.turns, score = self.score, "game over");
            return Ok(TurnResult {
                terminated: true,
                cleared_rows: sim.cleared_rows,
            });
        }

        self.next_row = self.source.next_row(self.grid.cols());

        Ok(TurnResult {
            terminated: false,
            cleared_rows: sim.cleared_rows,
        })
    }

    pub fn step_move_id(&mut self, mid: usize) -> Result<TurnResult, EngineError> {
        self.step(Some(SlideMove::from_id(mid)))
    }

    pub fn render_ascii(&self) -> String {
        let mut s = self.grid.render_ascii();
        s.push(' ');
        s.extend(self.next_row.iter().map(|c| c.glyph()));
        s.push_str("  <- next\n");
        s.push_str(&format!(
            "rule={:?} score={} rows={} turns={} over={}\n",
            self.grid.rule(),
            self.score,
            self.rows_cleared,
            self.turns,
            self.is_game_over()
        ));
        s
    }
}
