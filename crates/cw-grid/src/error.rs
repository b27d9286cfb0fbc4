// ABOUTME: Recoverable errors reported by panel grid operations.
// ABOUTME: A failing operation always leaves the grid unchanged.

use std::fmt;

/// Which ratio list an index refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Column,
    Row,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Column => f.write_str("column"),
            Axis::Row => f.write_str("row"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("Grid needs at least one column and one row (got {cols}x{rows})")]
    InvalidDimension { cols: usize, rows: usize },

    #[error("Wall size must be positive (got {width} x {height})")]
    InvalidSize { width: f64, height: f64 },

    #[error("Merge needs at least two selected cells (got {selected})")]
    InsufficientSelection { selected: usize },

    #[error("Split needs exactly one merged panel selected")]
    NotSplittable,

    #[error("Cell ({row}, {col}) is outside the grid")]
    OutOfBounds { row: usize, col: usize },

    #[error("Spanned cell ({row}, {col}) is not covered by any merged panel")]
    Unanchored { row: usize, col: usize },

    #[error("No {axis} ratio at index {index} (grid has {len})")]
    RatioIndex { axis: Axis, index: usize, len: usize },

    #[error("Corrupt grid snapshot: {0}")]
    CorruptSnapshot(String),
}
