// engine/src/engine/runs.rs
#![forbid(unsafe_code)]

use crate::engine::cell::Cell;

/// A maximal contiguous horizontal run of creature cells within one row.
///
/// Derived on demand from cell values; never stored across turns.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CreatureRun {
    pub start: usize,
    pub len: usize,
}

impl CreatureRun {
    /// Column one past the last cell of the run.
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Left-to-right scan for creature runs. Any mix of head/body cells counts as one run.
pub fn creature_runs(row: &[Cell]) -> Vec<CreatureRun> {
    let mut out = Vec::new();
    let mut c = 0;
    while c < row.len() {
        if !row[c].is_special() {
            c += 1;
            continue;
        }
        let start = c;
        while c < row.len() && row[c].is_special() {
            c += 1;
        }
        out.push(CreatureRun {
            start,
            len: c - start,
        });
    }
    out
}

/// Creature clear rule for a row that is a clear candidate.
///
/// - plain cells are emptied;
/// - a run of length >= 2 loses its rightmost cell;
/// - a lone creature cell is destroyed.
pub fn shrink_row(row: &mut [Cell]) {
    debug_assert!(row.iter().all(|c| !c.is_empty()));

    let runs = creature_runs(row);

    for cell in row.iter_mut() {
        if !cell.is_special() {
            *cell = Cell::Empty;
        }
    }

    // len == 1 falls out of the same rule: its last cell is its only cell.
    for run in runs {
        row[run.end() - 1] = Cell::Empty;
    }
}
