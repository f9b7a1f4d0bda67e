// engine/src/engine/error.rs
#![forbid(unsafe_code)]

use thiserror::Error;

/// Recoverable caller errors.
///
/// Every fallible engine operation validates before it mutates, so on `Err` the grid
/// (or pending row) is exactly what it was before the call.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum EngineError {
    #[error("{what} index {index} out of range (limit {limit})")]
    InvalidDimensions {
        what: &'static str,
        index: usize,
        limit: usize,
    },

    #[error("malformed row input: {0}")]
    MalformedRowInput(String),

    #[error("malformed board input: {0}")]
    MalformedBoardInput(String),
}

impl EngineError {
    pub(crate) fn row_index(index: usize, limit: usize) -> Self {
        Self::InvalidDimensions {
            what: "row",
            index,
            limit,
        }
    }
}
