// engine/src/engine/features.rs
#![forbid(unsafe_code)]

use crate::engine::grid::Grid;

/// Cheap board summary used for rollout reporting.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct GridFeatures {
    /// Number of empty cells (the solver's score).
    pub empty: u32,
    /// Tallest column, counted from the bottom edge.
    pub max_h: u32,
    /// Sum of column heights.
    pub agg_h: u32,
    /// Rows with no empty cell (pending clears).
    pub full_rows: u32,
    pub creature_cells: u32,
}

/// Complexity: O(rows * cols), no allocations.
pub fn compute_grid_features(grid: &Grid) -> GridFeatures {
    let rows = grid.rows();
    let mut f = GridFeatures::default();

    for c in 0..grid.cols() {
        let h = (0..rows)
            .find(|&r| !grid.get(r, c).is_empty())
            .map_or(0, |r| (rows - r) as u32);
        f.max_h = f.max_h.max(h);
        f.agg_h += h;
    }

    for row in grid.cells() {
        let mut full = true;
        for cell in row {
            if cell.is_empty() {
                f.empty += 1;
                full = false;
            } else if cell.is_special() {
                f.creature_cells += 1;
            }
        }
        if full {
            f.full_rows += 1;
        }
    }

    f
}
