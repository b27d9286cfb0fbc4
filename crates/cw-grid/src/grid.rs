// ABOUTME: Panel grid state for one curtain-wall design session.
// ABOUTME: Supports type painting, selection, merging, splitting and weighted sizing.

use serde::{Deserialize, Serialize};

use cw_core::{GridDefaults, PanelKind};

use crate::cell::{Cell, CellId, CellRange};
use crate::error::{Axis, GridError};
use crate::tool::EditTool;

/// Weight given to new columns and rows, and to rejected ratio edits
pub const DEFAULT_RATIO: f64 = 1.0;

/// Panel rectangle in meters, origin at the wall's top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// What a click did under the active tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Selected(CellId),
    Deselected(CellId),
    Painted(CellId, PanelKind),
    /// Spanned cell, or the cell already had the painted kind
    Ignored,
}

#[derive(Debug, Clone)]
pub struct PanelGrid {
    pub(crate) cols: usize,
    pub(crate) rows: usize,
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) cells: Vec<Vec<Cell>>,
    pub(crate) col_ratios: Vec<f64>,
    pub(crate) row_ratios: Vec<f64>,
    pub(crate) tool: EditTool,
    pub(crate) selection: Vec<CellId>,
}

impl PanelGrid {
    pub fn new(cols: usize, rows: usize, width: f64, height: f64) -> Result<Self, GridError> {
        check_size(width, height)?;
        let mut grid = Self {
            cols: 0,
            rows: 0,
            width,
            height,
            cells: Vec::new(),
            col_ratios: Vec::new(),
            row_ratios: Vec::new(),
            tool: EditTool::default(),
            selection: Vec::new(),
        };
        grid.initialize(cols, rows)?;
        Ok(grid)
    }

    pub fn from_config(defaults: &GridDefaults) -> Result<Self, GridError> {
        Self::new(defaults.cols, defaults.rows, defaults.width, defaults.height)
    }

    /// Replace every cell, ratio and the selection with a fresh `cols` x `rows` grid
    pub fn initialize(&mut self, cols: usize, rows: usize) -> Result<(), GridError> {
        if cols == 0 || rows == 0 {
            return Err(GridError::InvalidDimension { cols, rows });
        }

        self.cols = cols;
        self.rows = rows;
        self.cells = vec![vec![Cell::default(); cols]; rows];
        self.col_ratios = vec![DEFAULT_RATIO; cols];
        self.row_ratios = vec![DEFAULT_RATIO; rows];
        self.selection.clear();

        tracing::info!("Initialized {}x{} panel grid", cols, rows);
        Ok(())
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn col_ratios(&self) -> &[f64] {
        &self.col_ratios
    }

    pub fn row_ratios(&self) -> &[f64] {
        &self.row_ratios
    }

    pub fn tool(&self) -> EditTool {
        self.tool
    }

    /// Selected cells in the order they were selected
    pub fn selection(&self) -> &[CellId] {
        &self.selection
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(row)?.get(col)
    }

    fn cell_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        self.cells.get_mut(id.row)?.get_mut(id.col)
    }

    fn checked(&self, row: usize, col: usize) -> Result<&Cell, GridError> {
        self.cell(row, col).ok_or(GridError::OutOfBounds { row, col })
    }

    /// All cells with their ids, row-major
    pub fn cells(&self) -> impl Iterator<Item = (CellId, &Cell)> {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, cell)| (CellId::new(row, col), cell))
        })
    }

    /// Unit cells and anchors, row-major
    pub fn visible_cells(&self) -> impl Iterator<Item = (CellId, &Cell)> {
        self.cells().filter(|(_, cell)| cell.is_visible())
    }

    /// Rectangles of every merged region
    pub fn merged_ranges(&self) -> Vec<CellRange> {
        self.visible_cells()
            .filter(|(_, cell)| cell.is_anchor())
            .map(|(id, cell)| CellRange::from_span(id, cell.row_span, cell.col_span))
            .collect()
    }

    /// The visible cell responsible for position (row, col)
    pub fn anchor_of(&self, row: usize, col: usize) -> Result<CellId, GridError> {
        let cell = self.checked(row, col)?;
        let id = CellId::new(row, col);
        if cell.is_visible() {
            return Ok(id);
        }
        self.merged_ranges()
            .into_iter()
            .find(|range| range.contains(id))
            .map(|range| range.anchor())
            .ok_or(GridError::Unanchored { row, col })
    }

    /// Set the physical wall size in meters
    pub fn set_size(&mut self, width: f64, height: f64) -> Result<(), GridError> {
        check_size(width, height)?;
        self.width = width;
        self.height = height;
        tracing::debug!("Wall size set to {} x {}", width, height);
        Ok(())
    }

    /// Switch the active tool; leaving selection mode drops the selection
    pub fn set_tool(&mut self, tool: EditTool) {
        if self.tool == tool {
            return;
        }
        if tool != EditTool::Select {
            self.clear_selection();
        }
        tracing::debug!("Tool changed from {} to {}", self.tool, tool);
        self.tool = tool;
    }

    /// Apply the active tool to a cell
    pub fn click(&mut self, row: usize, col: usize) -> Result<ClickOutcome, GridError> {
        self.checked(row, col)?;
        let id = CellId::new(row, col);
        match self.tool.paint_kind() {
            Some(kind) => Ok(if self.set_cell_type(row, col, kind)? {
                ClickOutcome::Painted(id, kind)
            } else {
                ClickOutcome::Ignored
            }),
            None => Ok(match self.toggle(id) {
                Some(true) => ClickOutcome::Selected(id),
                Some(false) => ClickOutcome::Deselected(id),
                None => ClickOutcome::Ignored,
            }),
        }
    }

    /// Paint a panel kind. Only applies under a painting tool and never to
    /// spanned cells. Returns whether the cell changed.
    pub fn set_cell_type(
        &mut self,
        row: usize,
        col: usize,
        kind: PanelKind,
    ) -> Result<bool, GridError> {
        self.checked(row, col)?;
        if !self.tool.is_painting() {
            return Ok(false);
        }
        let Some(cell) = self.cell_mut(CellId::new(row, col)) else {
            return Ok(false);
        };
        if cell.is_spanned || cell.kind == kind {
            return Ok(false);
        }
        cell.kind = kind;
        Ok(true)
    }

    /// Flip selection of a visible cell while in selection mode
    pub fn toggle_select(&mut self, row: usize, col: usize) -> Result<&[CellId], GridError> {
        self.checked(row, col)?;
        self.toggle(CellId::new(row, col));
        Ok(&self.selection)
    }

    /// Returns the new selected state, or `None` if the toggle did not apply
    fn toggle(&mut self, id: CellId) -> Option<bool> {
        if self.tool != EditTool::Select {
            return None;
        }
        let cell = self.cell_mut(id)?;
        if cell.is_spanned {
            return None;
        }
        cell.selected = !cell.selected;
        let selected = cell.selected;
        if selected {
            self.selection.push(id);
        } else {
            self.selection.retain(|s| *s != id);
        }
        Some(selected)
    }

    pub fn clear_selection(&mut self) {
        let selection = std::mem::take(&mut self.selection);
        for id in selection {
            if let Some(cell) = self.cell_mut(id) {
                cell.selected = false;
            }
        }
    }

    /// Merge the bounding rectangle of the selection into one panel anchored
    /// at its top-left cell.
    ///
    /// Every cell inside the rectangle is flattened before the new anchor is
    /// written. A merged region that crosses the rectangle's edge is broken
    /// up: its cells outside the rectangle become unit panels again, with the
    /// old anchor keeping its kind. Returns the new anchor.
    pub fn merge(&mut self) -> Result<CellId, GridError> {
        let Some((first, rest)) = self.selection.split_first() else {
            return Err(GridError::InsufficientSelection { selected: 0 });
        };
        if rest.is_empty() {
            return Err(GridError::InsufficientSelection { selected: 1 });
        }

        let range = rest.iter().fold(CellRange::single(*first), |acc, id| {
            acc.union(&CellRange::single(*id))
        });
        let crossed: Vec<CellRange> = self
            .merged_ranges()
            .into_iter()
            .filter(|span| span.intersects(&range))
            .collect();

        self.clear_selection();

        for span in crossed {
            let old_anchor = span.anchor();
            for id in span.ids().filter(|id| !range.contains(*id)) {
                if let Some(cell) = self.cell_mut(id) {
                    if id == old_anchor {
                        cell.flatten();
                    } else {
                        *cell = Cell::default();
                    }
                }
            }
        }

        let anchor = range.anchor();
        for id in range.ids() {
            if let Some(cell) = self.cell_mut(id) {
                cell.flatten();
                cell.is_spanned = id != anchor;
            }
        }
        if let Some(cell) = self.cell_mut(anchor) {
            cell.col_span = range.col_count();
            cell.row_span = range.row_count();
            cell.merged = true;
        }

        tracing::info!(
            "Merged {}x{} panel at ({}, {})",
            range.col_count(),
            range.row_count(),
            anchor.row,
            anchor.col
        );
        Ok(anchor)
    }

    /// Restore the single selected merged panel to unit structure cells.
    /// Returns the rectangle that was split.
    pub fn split(&mut self) -> Result<CellRange, GridError> {
        let &[id] = self.selection.as_slice() else {
            return Err(GridError::NotSplittable);
        };
        let cell = self.cell(id.row, id.col).ok_or(GridError::NotSplittable)?;
        if !cell.is_anchor() {
            return Err(GridError::NotSplittable);
        }
        let range = CellRange::from_span(id, cell.row_span, cell.col_span);

        for id in range.ids() {
            if let Some(cell) = self.cell_mut(id) {
                *cell = Cell::default();
            }
        }
        self.selection.clear();

        tracing::info!(
            "Split {}x{} panel at ({}, {})",
            range.col_count(),
            range.row_count(),
            id.row,
            id.col
        );
        Ok(range)
    }

    pub fn set_col_ratio(&mut self, index: usize, value: f64) -> Result<(), GridError> {
        set_ratio(&mut self.col_ratios, Axis::Column, index, value)
    }

    pub fn set_row_ratio(&mut self, index: usize, value: f64) -> Result<(), GridError> {
        set_ratio(&mut self.row_ratios, Axis::Row, index, value)
    }

    /// Physical (width, height) of a cell; spanned cells report (0, 0)
    pub fn compute_cell_dimensions(&self, row: usize, col: usize) -> Result<(f64, f64), GridError> {
        let cell = self.checked(row, col)?;
        if cell.is_spanned {
            return Ok((0.0, 0.0));
        }
        Ok((
            weighted_share(&self.col_ratios, col, cell.col_span, self.width),
            weighted_share(&self.row_ratios, row, cell.row_span, self.height),
        ))
    }

    /// Position and size of a visible cell, `None` for spanned cells
    pub fn cell_rect(&self, row: usize, col: usize) -> Result<Option<PanelRect>, GridError> {
        let cell = self.checked(row, col)?;
        if cell.is_spanned {
            return Ok(None);
        }
        let (width, height) = self.compute_cell_dimensions(row, col)?;
        Ok(Some(PanelRect {
            x: weighted_share(&self.col_ratios, 0, col, self.width),
            y: weighted_share(&self.row_ratios, 0, row, self.height),
            width,
            height,
        }))
    }
}

fn check_size(width: f64, height: f64) -> Result<(), GridError> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if valid(width) && valid(height) {
        Ok(())
    } else {
        Err(GridError::InvalidSize { width, height })
    }
}

fn set_ratio(ratios: &mut [f64], axis: Axis, index: usize, value: f64) -> Result<(), GridError> {
    let len = ratios.len();
    let slot = ratios
        .get_mut(index)
        .ok_or(GridError::RatioIndex { axis, index, len })?;
    *slot = if value.is_finite() && value > 0.0 {
        value
    } else {
        tracing::debug!("Rejected {} ratio {}, using {}", axis, value, DEFAULT_RATIO);
        DEFAULT_RATIO
    };
    Ok(())
}

/// Share of `total` owned by `span` entries starting at `start`
fn weighted_share(ratios: &[f64], start: usize, span: usize, total: f64) -> f64 {
    let sum: f64 = ratios.iter().sum();
    debug_assert!(sum > 0.0, "ratios must stay positive");
    let part: f64 = ratios.iter().skip(start).take(span).sum();
    part / sum * total
}
