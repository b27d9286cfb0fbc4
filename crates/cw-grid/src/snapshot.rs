// ABOUTME: Serializable grid state for saving and restoring designs.
// ABOUTME: Restoring validates every span invariant before touching the grid.

use serde::{Deserialize, Serialize};

use cw_core::ProjectFile;

use crate::cell::{Cell, CellId, CellRange};
use crate::error::GridError;
use crate::grid::PanelGrid;
use crate::tool::EditTool;

/// Persistent part of a grid; selection and tool are session-only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub cols: usize,
    pub rows: usize,
    pub width: f64,
    pub height: f64,
    pub col_ratios: Vec<f64>,
    pub row_ratios: Vec<f64>,
    pub cells: Vec<Vec<Cell>>,
}

impl GridSnapshot {
    /// Wrap this snapshot in a named project file
    pub fn to_project(&self, name: impl Into<String>) -> Result<ProjectFile, GridError> {
        let grid =
            serde_json::to_value(self).map_err(|e| GridError::CorruptSnapshot(e.to_string()))?;
        Ok(ProjectFile::new(name, grid))
    }

    pub fn from_project(project: &ProjectFile) -> Result<Self, GridError> {
        serde_json::from_value(project.grid.clone())
            .map_err(|e| GridError::CorruptSnapshot(e.to_string()))
    }

    fn validate(&self) -> Result<(), GridError> {
        let corrupt = |msg: String| Err(GridError::CorruptSnapshot(msg));

        if self.cols == 0 || self.rows == 0 {
            return Err(GridError::InvalidDimension {
                cols: self.cols,
                rows: self.rows,
            });
        }
        if !(self.width.is_finite() && self.width > 0.0)
            || !(self.height.is_finite() && self.height > 0.0)
        {
            return Err(GridError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        if self.col_ratios.len() != self.cols || self.row_ratios.len() != self.rows {
            return corrupt(format!(
                "expected {} column and {} row ratios, found {} and {}",
                self.cols,
                self.rows,
                self.col_ratios.len(),
                self.row_ratios.len()
            ));
        }
        if let Some(bad) = self
            .col_ratios
            .iter()
            .chain(&self.row_ratios)
            .find(|r| !(r.is_finite() && **r > 0.0))
        {
            return corrupt(format!("ratio {bad} is not positive"));
        }
        if self.cells.len() != self.rows || self.cells.iter().any(|row| row.len() != self.cols) {
            return corrupt(format!("cell matrix is not {}x{}", self.cols, self.rows));
        }

        // Every spanned cell must be claimed by exactly one anchor
        let mut owner: Vec<Vec<Option<CellId>>> = vec![vec![None; self.cols]; self.rows];
        for (row, cells) in self.cells.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let id = CellId::new(row, col);
                if cell.col_span == 0 || cell.row_span == 0 {
                    return corrupt(format!("cell ({row}, {col}) has a zero span"));
                }
                if cell.is_spanned {
                    if cell.merged || cell.col_span != 1 || cell.row_span != 1 {
                        return corrupt(format!("spanned cell ({row}, {col}) carries span data"));
                    }
                    continue;
                }
                let has_span = cell.col_span > 1 || cell.row_span > 1;
                if cell.merged != has_span {
                    return corrupt(format!("cell ({row}, {col}) has inconsistent merge marker"));
                }
                if !has_span {
                    continue;
                }
                if cell.row_span > self.rows - row || cell.col_span > self.cols - col {
                    return corrupt(format!("panel at ({row}, {col}) extends past the grid"));
                }
                let range = CellRange::from_span(id, cell.row_span, cell.col_span);
                for covered in range.ids().filter(|c| *c != id) {
                    let slot = owner
                        .get_mut(covered.row)
                        .and_then(|r| r.get_mut(covered.col));
                    match slot {
                        Some(slot) if slot.is_none() => *slot = Some(id),
                        _ => {
                            return corrupt(format!(
                                "cell ({}, {}) is claimed by more than one panel",
                                covered.row, covered.col
                            ))
                        }
                    }
                }
            }
        }

        for (row, cells) in self.cells.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let claimed = owner
                    .get(row)
                    .and_then(|r| r.get(col))
                    .is_some_and(|o| o.is_some());
                if cell.is_spanned != claimed {
                    return corrupt(format!("cell ({row}, {col}) span coverage mismatch"));
                }
            }
        }
        Ok(())
    }
}

impl PanelGrid {
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            cols: self.cols,
            rows: self.rows,
            width: self.width,
            height: self.height,
            col_ratios: self.col_ratios.clone(),
            row_ratios: self.row_ratios.clone(),
            cells: self.cells.clone(),
        }
    }

    /// Replace this grid's state with a validated snapshot. The tool resets to
    /// selection mode and the selection is cleared.
    pub fn restore(&mut self, snapshot: GridSnapshot) -> Result<(), GridError> {
        snapshot.validate()?;

        let GridSnapshot {
            cols,
            rows,
            width,
            height,
            col_ratios,
            row_ratios,
            mut cells,
        } = snapshot;
        for cell in cells.iter_mut().flatten() {
            cell.selected = false;
        }

        self.cols = cols;
        self.rows = rows;
        self.width = width;
        self.height = height;
        self.col_ratios = col_ratios;
        self.row_ratios = row_ratios;
        self.cells = cells;
        self.tool = EditTool::Select;
        self.selection.clear();

        tracing::info!("Restored {}x{} panel grid", cols, rows);
        Ok(())
    }

    pub fn from_snapshot(snapshot: GridSnapshot) -> Result<Self, GridError> {
        let mut grid = PanelGrid::new(1, 1, 1.0, 1.0)?;
        grid.restore(snapshot)?;
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cw_core::PanelKind;

    fn designed() -> PanelGrid {
        let mut grid = PanelGrid::new(4, 3, 5.0, 3.5).unwrap();
        grid.set_col_ratio(3, 2.0).unwrap();
        grid.toggle_select(0, 1).unwrap();
        grid.toggle_select(1, 2).unwrap();
        grid.merge().unwrap();
        grid.set_tool(EditTool::Window);
        grid.click(0, 1).unwrap();
        grid
    }

    #[test]
    fn snapshot_restore_reproduces_grid() {
        let grid = designed();
        let json = serde_json::to_string(&grid.snapshot()).unwrap();
        let snapshot: GridSnapshot = serde_json::from_str(&json).unwrap();

        let restored = PanelGrid::from_snapshot(snapshot).unwrap();
        assert_eq!(restored.snapshot(), grid.snapshot());
        assert_eq!(restored.tool(), EditTool::Select);
        assert_eq!(restored.cell(0, 1).unwrap().kind, PanelKind::Window);
        assert_eq!(restored.summarize(), grid.summarize());
    }

    #[test]
    fn project_payload_roundtrip() {
        let grid = designed();
        let project = grid.snapshot().to_project("Storefront").unwrap();
        assert_eq!(project.name, "Storefront");
        assert_eq!(GridSnapshot::from_project(&project).unwrap(), grid.snapshot());
    }

    #[test]
    fn restore_rejects_orphan_spanned_cell() {
        let mut snapshot = PanelGrid::new(2, 2, 2.0, 2.0).unwrap().snapshot();
        snapshot.cells[1][1].is_spanned = true;

        let mut grid = designed();
        let before = grid.snapshot();
        assert!(matches!(
            grid.restore(snapshot),
            Err(GridError::CorruptSnapshot(_))
        ));
        assert_eq!(grid.snapshot(), before);
    }

    #[test]
    fn restore_rejects_span_past_edge() {
        let mut snapshot = PanelGrid::new(2, 2, 2.0, 2.0).unwrap().snapshot();
        snapshot.cells[1][1].col_span = 2;
        snapshot.cells[1][1].merged = true;
        assert!(PanelGrid::from_snapshot(snapshot).is_err());
    }

    #[test]
    fn restore_rejects_huge_span_without_overflow() {
        let mut snapshot = PanelGrid::new(2, 2, 2.0, 2.0).unwrap().snapshot();
        snapshot.cells[1][1].col_span = usize::MAX;
        snapshot.cells[1][1].merged = true;
        assert!(matches!(
            PanelGrid::from_snapshot(snapshot.clone()),
            Err(GridError::CorruptSnapshot(msg)) if msg.contains("extends past the grid")
        ));

        snapshot.cells[1][1].col_span = 1;
        snapshot.cells[1][1].row_span = usize::MAX;
        assert!(matches!(
            PanelGrid::from_snapshot(snapshot),
            Err(GridError::CorruptSnapshot(_))
        ));
    }

    #[test]
    fn restore_rejects_overlapping_panels() {
        // (0, 0) spans the whole row while (0, 1) claims (0, 2) as well
        let mut snapshot = PanelGrid::new(3, 1, 3.0, 1.0).unwrap().snapshot();
        snapshot.cells[0][0].col_span = 3;
        snapshot.cells[0][0].merged = true;
        snapshot.cells[0][1].col_span = 2;
        snapshot.cells[0][1].merged = true;
        snapshot.cells[0][2].is_spanned = true;
        assert!(matches!(
            PanelGrid::from_snapshot(snapshot),
            Err(GridError::CorruptSnapshot(msg)) if msg.contains("claimed by more than one panel")
        ));
    }

    #[test]
    fn restore_rejects_bad_ratios() {
        let mut snapshot = PanelGrid::new(2, 2, 2.0, 2.0).unwrap().snapshot();
        snapshot.row_ratios[0] = 0.0;
        assert!(PanelGrid::from_snapshot(snapshot.clone()).is_err());

        snapshot.row_ratios = vec![1.0];
        assert!(PanelGrid::from_snapshot(snapshot).is_err());
    }
}
