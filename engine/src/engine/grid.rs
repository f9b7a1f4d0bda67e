// engine/src/engine/grid.rs
#![forbid(unsafe_code)]

use tracing::debug;

use crate::engine::cell::Cell;
use crate::engine::error::EngineError;
use crate::engine::runs::shrink_row;

/// Slide direction for `Grid::slide_row`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Direction {
    /// Every cell moves one column toward index 0; the first cell wraps to the end.
    Left,
    /// Inverse of `Left`.
    Right,
}

impl Direction {
    /// Solver iteration order.
    pub const ALL: [Direction; 2] = [Direction::Left, Direction::Right];

    pub fn idx(self) -> usize {
        match self {
            Direction::Left => 0,
            Direction::Right => 1,
        }
    }

    pub fn from_idx(idx: usize) -> Option<Self> {
        match idx {
            0 => Some(Direction::Left),
            1 => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// What happens to a row with no empty cell.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ClearRule {
    /// Base variant: the whole row is reset to empty.
    Plain,
    /// Extended variant: plain cells are emptied, creature runs shrink from the right.
    #[default]
    Creature,
}

impl ClearRule {
    pub fn from_cli(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "plain" | "base" => ClearRule::Plain,
            _ => ClearRule::Creature,
        }
    }
}

/// Fixed-size puzzle board. Row 0 is the top edge.
///
/// Each row is an owned `Vec<Cell>`, so `clone()` is a full deep copy and trial
/// mutations on a clone never reach the original.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Grid {
    cols: usize,
    rule: ClearRule,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    /// All-empty grid using the creature clear rule.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::with_rule(rows, cols, ClearRule::default())
    }

    pub fn with_rule(rows: usize, cols: usize, rule: ClearRule) -> Self {
        assert!(cols > 0, "grid must have at least one column");
        Self {
            cols,
            rule,
            cells: vec![vec![Cell::Empty; cols]; rows],
        }
    }

    /// Build a grid from external integer codes.
    ///
    /// Rejects the whole board if the shape is not `rows x cols` or any code is undefined.
    pub fn from_codes(
        board: &[Vec<i64>],
        rows: usize,
        cols: usize,
        rule: ClearRule,
    ) -> Result<Self, EngineError> {
        if board.len() != rows {
            return Err(EngineError::MalformedBoardInput(format!(
                "expected {rows} rows, got {}",
                board.len()
            )));
        }

        let mut grid = Self::with_rule(rows, cols, rule);
        for (r, codes) in board.iter().enumerate() {
            if codes.len() != cols {
                return Err(EngineError::MalformedBoardInput(format!(
                    "row {r}: expected {cols} cells, got {}",
                    codes.len()
                )));
            }
            for (c, &code) in codes.iter().enumerate() {
                let Some(cell) = Cell::from_code(code) else {
                    return Err(EngineError::MalformedBoardInput(format!(
                        "row {r} col {c}: undefined cell code {code}"
                    )));
                };
                grid.cells[r][c] = cell;
            }
        }
        Ok(grid)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rule(&self) -> ClearRule {
        self.rule
    }

    #[inline]
    pub fn get(&self, r: usize, c: usize) -> Cell {
        self.cells[r][c]
    }

    #[inline]
    pub fn set(&mut self, r: usize, c: usize, cell: Cell) {
        self.cells[r][c] = cell;
    }

    pub fn row(&self, r: usize) -> &[Cell] {
        &self.cells[r]
    }

    pub fn cells(&self) -> &[Vec<Cell>] {
        &self.cells
    }

    fn check_row_index(&self, row: usize) -> Result<(), EngineError> {
        if row >= self.rows() {
            return Err(EngineError::row_index(row, self.rows()));
        }
        Ok(())
    }

    /// Length check for an incoming row.
    pub fn check_new_row(&self, new_row: &[Cell]) -> Result<(), EngineError> {
        if new_row.len() != self.cols {
            return Err(EngineError::MalformedRowInput(format!(
                "expected {} cells, got {}",
                self.cols,
                new_row.len()
            )));
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Mutators
    // -------------------------------------------------------------------------

    /// Rotate one row by a single position.
    pub fn slide_row(&mut self, row: usize, dir: Direction) -> Result<(), EngineError> {
        self.check_row_index(row)?;
        let cells = &mut self.cells[row];
        match dir {
            Direction::Left => cells.rotate_left(1),
            Direction::Right => cells.rotate_right(1),
        }
        Ok(())
    }

    /// Settle every column: occupied cells drop as low as possible, keeping their
    /// vertical order. Idempotent.
    pub fn apply_gravity(&mut self) {
        let rows = self.rows();
        for c in 0..self.cols {
            let mut write = rows;
            for r in (0..rows).rev() {
                let v = self.cells[r][c];
                if v.is_empty() {
                    continue;
                }
                write -= 1;
                if write != r {
                    self.cells[write][c] = v;
                    self.cells[r][c] = Cell::Empty;
                }
            }
        }
    }

    /// Insert `new_row` so it sits in front of current row `index` (`index == rows` appends
    /// at the bottom), then apply gravity.
    ///
    /// Overflow always discards the TOP row: the stack grows to `rows + 1` and row 0 is
    /// dropped. Inserting at `index == 0` therefore spills the new row itself.
    pub fn insert_new_row(&mut self, new_row: &[Cell], index: usize) -> Result<(), EngineError> {
        if index > self.rows() {
            return Err(EngineError::InvalidDimensions {
                what: "insert",
                index,
                limit: self.rows(),
            });
        }
        self.check_new_row(new_row)?;

        self.cells.insert(index, new_row.to_vec());
        self.cells.remove(0);
        self.apply_gravity();
        Ok(())
    }

    /// Legacy append-at-bottom insertion; the stack rises by one row.
    pub fn add_new_row(&mut self, new_row: &[Cell]) -> Result<(), EngineError> {
        self.insert_new_row(new_row, self.rows())
    }

    /// Resolve every row that has no empty cell.
    ///
    /// Returns the number of such rows, whether they vanished (plain rule) or only
    /// shrank (creature rule). Gravity runs once afterwards if anything matched.
    pub fn clear_filled_rows(&mut self) -> u32 {
        let mut cleared = 0u32;
        for row in self.cells.iter_mut() {
            if !row.iter().all(|c| !c.is_empty()) {
                continue;
            }
            cleared += 1;
            match self.rule {
                ClearRule::Plain => row.fill(Cell::Empty),
                ClearRule::Creature => shrink_row(row),
            }
        }

        if cleared > 0 {
            debug!(cleared, rule = ?self.rule, "cleared filled rows");
            self.apply_gravity();
        }
        cleared
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn empty_count(&self) -> usize {
        self.cells
            .iter()
            .map(|row| row.iter().filter(|c| c.is_empty()).count())
            .sum()
    }

    /// Terminal condition: anything occupies the top row.
    pub fn game_over(&self) -> bool {
        self.cells
            .first()
            .is_some_and(|top| top.iter().any(|c| !c.is_empty()))
    }

    pub fn render_ascii(&self) -> String {
        let border = format!("+{}+\n", "-".repeat(self.cols));
        let mut s = String::with_capacity((self.cols + 3) * (self.rows() + 2));
        s.push_str(&border);
        for row in &self.cells {
            s.push('|');
            s.extend(row.iter().map(|c| c.glyph()));
            s.push_str("|\n");
        }
        s.push_str(&border);
        s
    }
}

/// Parse a board: one row per non-blank line, integer codes separated by commas and/or
/// whitespace. Lines starting with `#` are comments.
pub fn parse_board(
    text: &str,
    rows: usize,
    cols: usize,
    rule: ClearRule,
) -> Result<Grid, EngineError> {
    let mut board: Vec<Vec<i64>> = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut codes = Vec::new();
        for tok in line.split(|ch: char| ch == ',' || ch.is_whitespace()) {
            if tok.is_empty() {
                continue;
            }
            let code = tok.parse::<i64>().map_err(|_| {
                EngineError::MalformedBoardInput(format!(
                    "line {}: '{tok}' is not an integer",
                    lineno + 1
                ))
            })?;
            codes.push(code);
        }
        board.push(codes);
    }
    Grid::from_codes(&board, rows, cols, rule)
}
