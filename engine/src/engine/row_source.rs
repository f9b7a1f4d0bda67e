// engine/src/engine/row_source.rs
#![forbid(unsafe_code)]

use rand::prelude::*;

use crate::engine::cell::Cell;
use crate::engine::error::EngineError;

/// Supplier of incoming rows.
///
/// Object-safe so a session can hold `Box<dyn RowSource>`; tests plug in
/// `FixedRowSource` to get deterministic turns.
pub trait RowSource {
    fn next_row(&mut self, cols: usize) -> Vec<Cell>;
}

/// Seeded random rows.
///
/// With default knobs every cell is drawn uniformly from the plain tokens.
/// `holes` leaves that many distinct columns empty; `creature_prob` occasionally stamps a
/// creature (`<`, `<>`, `<=>`) at a random position.
#[derive(Clone)]
pub struct UniformRowSource {
    rng: StdRng,
    holes: usize,
    creature_prob: f64,
}

impl UniformRowSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            holes: 0,
            creature_prob: 0.0,
        }
    }

    /// Number of empty cells per row (clamped to `cols - 1` at draw time).
    pub fn with_holes(mut self, holes: usize) -> Self {
        self.holes = holes;
        self
    }

    pub fn with_creature_prob(mut self, p: f64) -> Self {
        self.creature_prob = p.clamp(0.0, 1.0);
        self
    }

    fn stamp_creature(&mut self, row: &mut [Cell]) {
        let max_len = row.len().min(3);
        let len = self.rng.gen_range(1..=max_len);
        let start = self.rng.gen_range(0..=(row.len() - len));
        let creature: &[Cell] = match len {
            1 => &[Cell::HeadLeft],
            2 => &[Cell::HeadLeft, Cell::HeadRight],
            _ => &[Cell::HeadLeft, Cell::Body, Cell::HeadRight],
        };
        row[start..start + len].copy_from_slice(creature);
    }
}

impl RowSource for UniformRowSource {
    fn next_row(&mut self, cols: usize) -> Vec<Cell> {
        let mut row: Vec<Cell> = (0..cols)
            .map(|_| Cell::PLAIN[self.rng.gen_range(0..Cell::PLAIN.len())])
            .collect();

        if cols > 0 && self.creature_prob > 0.0 && self.rng.gen_bool(self.creature_prob) {
            self.stamp_creature(&mut row);
        }

        let holes = self.holes.min(cols.saturating_sub(1));
        if holes > 0 {
            let picked = rand::seq::index::sample(&mut self.rng, cols, holes);
            for c in picked {
                row[c] = Cell::Empty;
            }
        }

        row
    }
}

/// Replays a fixed list of rows, wrapping around at the end.
#[derive(Clone, Debug)]
pub struct FixedRowSource {
    rows: Vec<Vec<Cell>>,
    idx: usize,
}

impl FixedRowSource {
    /// Every row must be exactly `cols` wide, and the list must not be empty.
    pub fn new(rows: Vec<Vec<Cell>>, cols: usize) -> Result<Self, EngineError> {
        if rows.is_empty() {
            return Err(EngineError::MalformedRowInput(
                "fixed row source needs at least one row".into(),
            ));
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(EngineError::MalformedRowInput(format!(
                "fixed row {i}: expected {cols} cells, got {}",
                row.len()
            )));
        }
        Ok(Self { rows, idx: 0 })
    }
}

impl RowSource for FixedRowSource {
    fn next_row(&mut self, cols: usize) -> Vec<Cell> {
        let row = self.rows[self.idx].clone();
        self.idx = (self.idx + 1) % self.rows.len();
        debug_assert_eq!(row.len(), cols, "fixed row width checked in new()");
        row
    }
}

/// Validate externally authored integer codes as a row of exactly `cols` cells.
pub fn row_from_codes(codes: &[i64], cols: usize) -> Result<Vec<Cell>, EngineError> {
    if codes.len() != cols {
        return Err(EngineError::MalformedRowInput(format!(
            "expected {cols} values, got {}",
            codes.len()
        )));
    }
    codes
        .iter()
        .enumerate()
        .map(|(c, &code)| {
            Cell::from_code(code).ok_or_else(|| {
                EngineError::MalformedRowInput(format!("col {c}: undefined cell code {code}"))
            })
        })
        .collect()
}

/// Parse a row typed as integer codes separated by commas and/or whitespace,
/// e.g. `"1,2,3,0,1,2,3,1,2"`.
pub fn parse_row_codes(text: &str, cols: usize) -> Result<Vec<Cell>, EngineError> {
    let codes = text
        .split(|ch: char| ch == ',' || ch.is_whitespace())
        .filter(|tok| !tok.is_empty())
        .map(|tok| {
            tok.parse::<i64>().map_err(|_| {
                EngineError::MalformedRowInput(format!("'{tok}' is not an integer"))
            })
        })
        .collect::<Result<Vec<i64>, _>>()?;
    row_from_codes(&codes, cols)
}
