// engine/src/engine/mod.rs
#![forbid(unsafe_code)]

mod cell;
mod constants;
mod error;
mod features;
mod game;
mod grid;
mod row_source;
mod runs;

/**
 * Curated engine public API.
 *
 * Internal implementation modules remain private; only stable items are re-exported here.
 */
pub use cell::Cell;
pub use constants::{COLS, MOVE_DIM, ROWS, decode_move_id, encode_move_id};
pub use error::EngineError;
pub use features::{GridFeatures, compute_grid_features};
pub use game::{Game, SimTurn, SlideMove, TurnPhase, TurnResult};
pub use grid::{ClearRule, Direction, Grid, parse_board};
pub use row_source::{FixedRowSource, RowSource, UniformRowSource, parse_row_codes, row_from_codes};
pub use runs::{CreatureRun, creature_runs, shrink_row};
