// engine/src/policy/greedy.rs
#![forbid(unsafe_code)]

use tracing::trace;

use crate::engine::{Cell, Direction, EngineError, Game, Grid, SlideMove};

use super::base::Policy;

/// Score reported when there is no move to evaluate; below any real empty-cell count.
pub const NO_MOVE_SCORE: i64 = i64::MIN;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MoveEval {
    pub best: Option<SlideMove>,
    /// Empty cells left after the best move's turn, or `NO_MOVE_SCORE`.
    pub score: i64,
}

/// One-ply brute force over every (row, direction) slide.
///
/// Each candidate plays a full turn (slide, bottom insert, clear) on a copy of `grid` and
/// is scored by the remaining empty cells. Candidates are visited row ascending, `Left`
/// before `Right`; only a strictly higher score replaces the incumbent, so the first
/// move seen wins ties. `grid` is never mutated.
pub fn optimal_move(grid: &Grid, new_row: &[Cell]) -> Result<MoveEval, EngineError> {
    grid.check_new_row(new_row)?;

    let mut best: Option<(SlideMove, i64)> = None;

    for row in 0..grid.rows() {
        for dir in Direction::ALL {
            let mv = SlideMove::new(row, dir);
            let sim = Game::simulate_turn(grid, Some(mv), new_row)?;
            let score = sim.grid_after_clear.empty_count() as i64;
            trace!(row, ?dir, score, "candidate");

            match best {
                None => best = Some((mv, score)),
                Some((_bm, bs)) if score > bs => best = Some((mv, score)),
                _ => {}
            }
        }
    }

    Ok(match best {
        Some((mv, score)) => MoveEval {
            best: Some(mv),
            score,
        },
        None => MoveEval {
            best: None,
            score: NO_MOVE_SCORE,
        },
    })
}

/// Plays `optimal_move` against the session's pending row.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyPolicy;

impl GreedyPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl Policy for GreedyPolicy {
    fn choose_move(&mut self, g: &Game) -> Option<SlideMove> {
        // The pending row always matches the grid width, so this cannot fail.
        optimal_move(&g.grid, g.next_row()).ok()?.best
    }
}
