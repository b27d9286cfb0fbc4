// ABOUTME: Grid cell state and rectangular cell ranges.
// ABOUTME: A merged region is stored on its top-left anchor; covered cells are spanned.

use serde::{Deserialize, Serialize};

use cw_core::PanelKind;

/// Grid position, zero-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId {
    pub row: usize,
    pub col: usize,
}

impl CellId {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub kind: PanelKind,
    /// Transient UI selection flag, never persisted
    #[serde(skip)]
    pub selected: bool,
    pub col_span: usize,
    pub row_span: usize,
    /// Covered by another cell's span
    pub is_spanned: bool,
    /// Anchor of a merged region
    pub merged: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            kind: PanelKind::Structure,
            selected: false,
            col_span: 1,
            row_span: 1,
            is_spanned: false,
            merged: false,
        }
    }
}

impl Cell {
    /// Not covered by another cell's span
    pub fn is_visible(&self) -> bool {
        !self.is_spanned
    }

    /// Top-left cell of a merged region larger than 1x1
    pub fn is_anchor(&self) -> bool {
        self.merged && !self.is_spanned && (self.col_span > 1 || self.row_span > 1)
    }

    /// Drop span data but keep kind and selection
    pub(crate) fn flatten(&mut self) {
        self.col_span = 1;
        self.row_span = 1;
        self.is_spanned = false;
        self.merged = false;
    }
}

/// Inclusive rectangle of cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRange {
    pub top: usize,
    pub left: usize,
    pub bottom: usize,
    pub right: usize,
}

impl CellRange {
    pub fn single(id: CellId) -> Self {
        Self {
            top: id.row,
            left: id.col,
            bottom: id.row,
            right: id.col,
        }
    }

    /// Range covered by a cell at `id` with the given spans (spans of 0 count as 1)
    pub fn from_span(id: CellId, row_span: usize, col_span: usize) -> Self {
        Self {
            top: id.row,
            left: id.col,
            bottom: id.row + row_span.max(1) - 1,
            right: id.col + col_span.max(1) - 1,
        }
    }

    pub fn anchor(&self) -> CellId {
        CellId::new(self.top, self.left)
    }

    pub fn row_count(&self) -> usize {
        self.bottom - self.top + 1
    }

    pub fn col_count(&self) -> usize {
        self.right - self.left + 1
    }

    pub fn cell_count(&self) -> usize {
        self.row_count() * self.col_count()
    }

    pub fn contains(&self, id: CellId) -> bool {
        (self.top..=self.bottom).contains(&id.row) && (self.left..=self.right).contains(&id.col)
    }

    pub fn intersects(&self, other: &CellRange) -> bool {
        self.top <= other.bottom
            && other.top <= self.bottom
            && self.left <= other.right
            && other.left <= self.right
    }

    /// Smallest range containing both
    pub fn union(&self, other: &CellRange) -> Self {
        Self {
            top: self.top.min(other.top),
            left: self.left.min(other.left),
            bottom: self.bottom.max(other.bottom),
            right: self.right.max(other.right),
        }
    }

    /// Cells in row-major order
    pub fn ids(self) -> impl Iterator<Item = CellId> {
        (self.top..=self.bottom)
            .flat_map(move |row| (self.left..=self.right).map(move |col| CellId::new(row, col)))
    }
}
