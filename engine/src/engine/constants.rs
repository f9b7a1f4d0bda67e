// engine/src/engine/constants.rs
#![forbid(unsafe_code)]

/// Puzzle board height (rows), top row is index 0.
pub const ROWS: usize = 11;
/// Puzzle board width (columns).
pub const COLS: usize = 9;

/// Two slide directions per row.
pub const DIRS: usize = 2;
pub const MOVE_DIM: usize = ROWS * DIRS;

/// Move id layout: `row * 2 + dir` where dir 0 = left, 1 = right.
/// Ids ascend in solver iteration order (row ascending, left before right).
#[inline]
pub fn encode_move_id(row: usize, dir: usize) -> usize {
    debug_assert!(dir < DIRS);
    row * DIRS + dir
}

#[inline]
pub fn decode_move_id(mid: usize) -> (usize, usize) {
    (mid / DIRS, mid % DIRS)
}
