// engine/src/lib.rs
#![forbid(unsafe_code)]

pub mod engine;
pub mod policy;

// Re-export the bits the CLI and tests need:
pub use engine::{
    COLS, Cell, ClearRule, CreatureRun, Direction, EngineError, FixedRowSource, Game,
    GridFeatures, Grid, MOVE_DIM, ROWS, RowSource, SimTurn, SlideMove, TurnPhase, TurnResult,
    UniformRowSource, compute_grid_features, creature_runs, decode_move_id, encode_move_id,
    parse_board, parse_row_codes, row_from_codes, shrink_row,
};
pub use policy::{
    GreedyPolicy, IdlePolicy, MoveEval, NO_MOVE_SCORE, Policy, RandomPolicy, optimal_move,
};
