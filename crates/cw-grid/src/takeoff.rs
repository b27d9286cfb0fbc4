// ABOUTME: Read-only views of a finished grid for display and pricing.
// ABOUTME: Kind counts, the panel list, and frame/glass aggregates per kind.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use cw_core::PanelKind;

use crate::cell::CellId;
use crate::grid::{PanelGrid, PanelRect};

/// Counts over visible cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSummary {
    pub visible: usize,
    pub structure: usize,
    pub window: usize,
    pub door: usize,
}

impl GridSummary {
    pub fn count(&self, kind: PanelKind) -> usize {
        match kind {
            PanelKind::Structure => self.structure,
            PanelKind::Window => self.window,
            PanelKind::Door => self.door,
        }
    }
}

/// One visible panel as handed to pricing and export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelSpec {
    pub id: CellId,
    pub row_span: usize,
    pub col_span: usize,
    pub kind: PanelKind,
    pub rect: PanelRect,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct KindTotals {
    pub panels: usize,
    /// Sum of panel areas in square meters
    pub glass_area: f64,
    /// Sum of panel perimeters in meters
    pub frame_length: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Takeoff {
    pub width: f64,
    pub height: f64,
    pub per_kind: BTreeMap<PanelKind, KindTotals>,
}

impl Takeoff {
    pub fn totals(&self, kind: PanelKind) -> KindTotals {
        self.per_kind.get(&kind).copied().unwrap_or_default()
    }

    pub fn total_area(&self) -> f64 {
        self.per_kind.values().map(|t| t.glass_area).sum()
    }
}

impl PanelGrid {
    /// Visible cell count and per-kind counts, computed from current state
    pub fn summarize(&self) -> GridSummary {
        self.visible_cells()
            .fold(GridSummary::default(), |mut summary, (_, cell)| {
                summary.visible += 1;
                match cell.kind {
                    PanelKind::Structure => summary.structure += 1,
                    PanelKind::Window => summary.window += 1,
                    PanelKind::Door => summary.door += 1,
                }
                summary
            })
    }

    /// Visible panels in row-major order
    pub fn panels(&self) -> Vec<PanelSpec> {
        self.visible_cells()
            .filter_map(|(id, cell)| {
                let rect = self.cell_rect(id.row, id.col).ok().flatten()?;
                Some(PanelSpec {
                    id,
                    row_span: cell.row_span,
                    col_span: cell.col_span,
                    kind: cell.kind,
                    rect,
                })
            })
            .collect()
    }

    /// Frame and glass aggregates for every kind, zeroed when absent
    pub fn takeoff(&self) -> Takeoff {
        let mut per_kind: BTreeMap<PanelKind, KindTotals> = PanelKind::all()
            .iter()
            .map(|kind| (*kind, KindTotals::default()))
            .collect();

        for panel in self.panels() {
            let totals = per_kind.entry(panel.kind).or_default();
            totals.panels += 1;
            totals.glass_area += panel.rect.width * panel.rect.height;
            totals.frame_length += 2.0 * (panel.rect.width + panel.rect.height);
        }

        Takeoff {
            width: self.width,
            height: self.height,
            per_kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EditTool;

    fn sample() -> PanelGrid {
        let mut grid = PanelGrid::new(3, 2, 3.0, 2.0).unwrap();
        grid.toggle_select(0, 0).unwrap();
        grid.toggle_select(1, 1).unwrap();
        grid.merge().unwrap();
        grid.set_tool(EditTool::Window);
        grid.click(0, 2).unwrap();
        grid.set_tool(EditTool::Door);
        grid.click(1, 2).unwrap();
        grid
    }

    #[test]
    fn summary_counts_visible_cells() {
        let summary = sample().summarize();
        assert_eq!(
            summary,
            GridSummary {
                visible: 3,
                structure: 1,
                window: 1,
                door: 1,
            }
        );
        assert_eq!(summary.count(PanelKind::Door), 1);
    }

    #[test]
    fn panels_skip_spanned_cells() {
        let panels = sample().panels();
        let ids: Vec<_> = panels.iter().map(|p| p.id).collect();
        assert_eq!(
            ids,
            vec![CellId::new(0, 0), CellId::new(0, 2), CellId::new(1, 2)]
        );
        assert_eq!((panels[0].row_span, panels[0].col_span), (2, 2));
        assert!((panels[0].rect.width - 2.0).abs() < 1e-9);
    }

    #[test]
    fn takeoff_areas_cover_the_wall() {
        let takeoff = sample().takeoff();
        assert!((takeoff.total_area() - 6.0).abs() < 1e-9);

        let structure = takeoff.totals(PanelKind::Structure);
        assert_eq!(structure.panels, 1);
        assert!((structure.glass_area - 4.0).abs() < 1e-9);
        assert!((structure.frame_length - 8.0).abs() < 1e-9);

        let window = takeoff.totals(PanelKind::Window);
        assert!((window.frame_length - 4.0).abs() < 1e-9);
    }

    #[test]
    fn takeoff_lists_every_kind() {
        let grid = PanelGrid::new(1, 1, 1.0, 1.0).unwrap();
        let takeoff = grid.takeoff();
        assert_eq!(takeoff.per_kind.len(), 3);
        assert_eq!(takeoff.totals(PanelKind::Door), KindTotals::default());

        let json = serde_json::to_value(&takeoff).unwrap();
        assert!(json["per_kind"]["window"].is_object());
    }
}
