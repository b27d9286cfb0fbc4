// ABOUTME: Plain-text diagram of the panel grid for terminal hosts.
// ABOUTME: Shows panel kinds, merged coverage and the current selection.

use std::fmt::Write;

use crate::grid::PanelGrid;

impl PanelGrid {
    /// One line per row. Visible cells show their kind code, selected cells
    /// are bracketed, and cells covered by a merged panel show `.`
    pub fn render_ascii(&self) -> String {
        let mut out = String::from("   ");
        for col in 0..self.cols {
            let _ = write!(out, "{col:^3}");
        }
        out.push('\n');

        for (row, cells) in self.cells.iter().enumerate() {
            let _ = write!(out, "{row:>2} ");
            for cell in cells {
                if cell.is_spanned {
                    out.push_str(" . ");
                } else if cell.selected {
                    let _ = write!(out, "[{}]", cell.kind.code());
                } else {
                    let _ = write!(out, " {} ", cell.kind.code());
                }
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use crate::{EditTool, PanelGrid};

    #[test]
    fn renders_spans_and_selection() {
        let mut grid = PanelGrid::new(3, 2, 3.0, 2.0).unwrap();
        grid.toggle_select(0, 0).unwrap();
        grid.toggle_select(0, 1).unwrap();
        grid.merge().unwrap();
        grid.set_tool(EditTool::Door);
        grid.click(1, 2).unwrap();
        grid.set_tool(EditTool::Select);
        grid.toggle_select(1, 0).unwrap();

        let expected = "    0  1  2 \n 0  S  .  S \n 1 [S] S  D \n";
        assert_eq!(grid.render_ascii(), expected);
    }
}
