// ABOUTME: Designer session owning one panel grid.
// ABOUTME: Executes parsed commands and formats their results for the terminal.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cw_core::{Config, ProjectError, ProjectFile};
use cw_grid::{ClickOutcome, GridSnapshot, PanelGrid};

use crate::command::{self, Command};

pub struct Host {
    grid: PanelGrid,
    config: Config,
    name: String,
}

impl Host {
    pub fn new(config: Config, name: impl Into<String>) -> Result<Self> {
        let grid = PanelGrid::from_config(&config.grid).context("Invalid grid defaults in config")?;
        Ok(Self {
            grid,
            config,
            name: name.into(),
        })
    }

    #[cfg(test)]
    pub fn grid(&self) -> &PanelGrid {
        &self.grid
    }

    /// Read commands until end of input. Bad commands and grid errors are
    /// reported and skipped; only failures to read input or write output abort.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        for (number, line) in input.lines().enumerate() {
            let line = line.context("Failed to read command input")?;
            if self.config.behavior.echo_commands && !line.trim().is_empty() {
                writeln!(out, "> {}", line.trim())?;
            }

            let command = match command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!("Line {}: {}", number + 1, e);
                    writeln!(out, "error: {e}")?;
                    continue;
                }
            };

            let edits = command.edits();
            match self.execute(command) {
                Ok(response) => {
                    if !response.is_empty() {
                        writeln!(out, "{response}")?;
                    }
                    if edits && self.config.behavior.show_after_edit {
                        write!(out, "{}", self.grid.render_ascii())?;
                    }
                }
                Err(e) => writeln!(out, "error: {e:#}")?,
            }
        }
        out.flush()?;
        Ok(())
    }

    pub fn execute(&mut self, command: Command) -> Result<String> {
        let grid = &mut self.grid;
        let response = match command {
            Command::Init { cols, rows } => {
                grid.initialize(cols, rows)?;
                let soft_max = self.config.grid.soft_max_cells_per_axis;
                if cols > soft_max || rows > soft_max {
                    tracing::warn!(
                        "Grid {}x{} exceeds the usual maximum of {} per axis",
                        cols,
                        rows,
                        soft_max
                    );
                }
                format!("grid {cols}x{rows}")
            }
            Command::Size { width, height } => {
                grid.set_size(width, height)?;
                format!("size {width:.3} x {height:.3} m")
            }
            Command::Tool(tool) => {
                grid.set_tool(tool);
                format!("tool {tool}")
            }
            Command::Click { row, col } => match grid.click(row, col)? {
                ClickOutcome::Selected(id) => format!("selected ({}, {})", id.row, id.col),
                ClickOutcome::Deselected(id) => format!("deselected ({}, {})", id.row, id.col),
                ClickOutcome::Painted(id, kind) => {
                    format!("painted ({}, {}) {kind}", id.row, id.col)
                }
                ClickOutcome::Ignored => "ignored".to_string(),
            },
            Command::Paint { row, col, kind } => {
                if grid.set_cell_type(row, col, kind)? {
                    format!("painted ({row}, {col}) {kind}")
                } else {
                    "unchanged".to_string()
                }
            }
            Command::Select { row, col } => {
                let selection = grid.toggle_select(row, col)?;
                let ids: Vec<String> = selection
                    .iter()
                    .map(|id| format!("({}, {})", id.row, id.col))
                    .collect();
                format!("selection: {}", ids.join(" "))
            }
            Command::Clear => {
                grid.clear_selection();
                "selection cleared".to_string()
            }
            Command::Merge => {
                let anchor = grid.merge()?;
                let cell = grid
                    .cell(anchor.row, anchor.col)
                    .context("Merged anchor missing from grid")?;
                format!(
                    "merged {}x{} panel at ({}, {})",
                    cell.col_span, cell.row_span, anchor.row, anchor.col
                )
            }
            Command::Split => {
                let range = grid.split()?;
                format!(
                    "split ({}, {}) into {} cells",
                    range.top,
                    range.left,
                    range.cell_count()
                )
            }
            Command::ColRatio { index, value } => {
                grid.set_col_ratio(index, value)?;
                format!("col ratios: {}", join_ratios(grid.col_ratios()))
            }
            Command::RowRatio { index, value } => {
                grid.set_row_ratio(index, value)?;
                format!("row ratios: {}", join_ratios(grid.row_ratios()))
            }
            Command::Dims { row, col } => {
                let (width, height) = grid.compute_cell_dimensions(row, col)?;
                format!("({row}, {col}): {width:.3} x {height:.3} m")
            }
            Command::Summary => {
                let summary = grid.summarize();
                format!(
                    "visible {}: structure {}, window {}, door {}",
                    summary.visible, summary.structure, summary.window, summary.door
                )
            }
            Command::Panels => serde_json::to_string_pretty(&grid.panels())?,
            Command::Takeoff => serde_json::to_string_pretty(&grid.takeoff())?,
            Command::Show => grid.render_ascii().trim_end().to_string(),
            Command::Save(path) => {
                let path = self.save(path.as_deref())?;
                format!("saved {}", path.display())
            }
            Command::Load(path) => {
                self.load(path.as_deref())?;
                format!(
                    "loaded '{}' ({}x{})",
                    self.name,
                    self.grid.cols(),
                    self.grid.rows()
                )
            }
        };
        Ok(response)
    }

    /// Save the session as a project file, at the default location when no
    /// path is given. Returns where the file was written.
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let project = self.grid.snapshot().to_project(self.name.clone())?;
        match path {
            Some(path) => {
                project
                    .save(path)
                    .with_context(|| format!("Failed to save project to {}", path.display()))?;
                Ok(path.to_path_buf())
            }
            None => project
                .save_to_default()
                .context("Failed to save project to the default location"),
        }
    }

    pub fn load(&mut self, path: Option<&Path>) -> Result<()> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => ProjectFile::default_path().ok_or(ProjectError::NoStatePath)?,
        };
        let project = ProjectFile::load(&path)
            .with_context(|| format!("Failed to load project from {}", path.display()))?;
        let snapshot = GridSnapshot::from_project(&project)?;
        self.grid.restore(snapshot)?;
        self.name = project.name;
        Ok(())
    }
}

fn join_ratios(ratios: &[f64]) -> String {
    ratios
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cw_grid::PanelKind;
    use std::io::Cursor;

    fn run_script(host: &mut Host, script: &str) -> String {
        let mut out = Vec::new();
        host.run(Cursor::new(script), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn script_merges_and_reports() {
        let mut host = Host::new(Config::default(), "Test").unwrap();
        let output = run_script(
            &mut host,
            "# 4x3 wall\n\
             click 0 0\n\
             click 1 1\n\
             merge\n\
             dims 0 0\n\
             dims 1 1\n\
             summary\n",
        );
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                "selected (0, 0)",
                "selected (1, 1)",
                "merged 2x2 panel at (0, 0)",
                "(0, 0): 2.000 x 2.000 m",
                "(1, 1): 0.000 x 0.000 m",
                "visible 9: structure 9, window 0, door 0",
            ]
        );
    }

    #[test]
    fn errors_are_reported_and_skipped() {
        let mut host = Host::new(Config::default(), "Test").unwrap();
        let output = run_script(&mut host, "merge\nbogus\ninit 0 2\nclick 9 9\ninit 2 2\n");
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("error: Merge needs at least two"));
        assert_eq!(lines[1], "error: unknown command: bogus");
        assert!(lines[2].starts_with("error: Grid needs at least one column"));
        assert!(lines[3].starts_with("error: Cell (9, 9) is outside"));
        assert_eq!(lines[4], "grid 2x2");
    }

    #[test]
    fn painting_and_ratios() {
        let mut host = Host::new(Config::default(), "Test").unwrap();
        let output = run_script(
            &mut host,
            "init 2 1\nsize 4 2\ncol-ratio 0 3\ntool window\nclick 0 1\npaint 0 1 window\ndims 0 0\n",
        );
        assert!(output.contains("col ratios: 3 1"));
        assert!(output.contains("painted (0, 1) window"));
        assert!(output.contains("unchanged"));
        assert!(output.contains("(0, 0): 3.000 x 2.000 m"));
        assert_eq!(host.grid().cell(0, 1).unwrap().kind, PanelKind::Window);
    }

    #[test]
    fn show_after_edit_prints_diagram() {
        let mut config = Config::default();
        config.behavior.show_after_edit = true;
        config.behavior.echo_commands = true;
        config.grid.cols = 2;
        config.grid.rows = 1;
        let mut host = Host::new(config, "Test").unwrap();

        let output = run_script(&mut host, "click 0 1\n");
        assert_eq!(output, "> click 0 1\nselected (0, 1)\n    0  1 \n 0  S [S]\n");
    }

    #[test]
    fn save_and_load_project() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wall.bin");

        let mut host = Host::new(Config::default(), "Atrium").unwrap();
        run_script(&mut host, "click 0 0\nclick 0 1\nmerge\n");
        assert_eq!(host.save(Some(&path)).unwrap(), path);

        let mut other = Host::new(Config::default(), "Scratch").unwrap();
        let output = run_script(&mut other, &format!("load {}\nsummary\n", path.display()));
        assert!(output.contains("loaded 'Atrium' (4x3)"));
        assert!(output.contains("visible 11"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn bare_save_and_load_use_default_location() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("XDG_DATA_HOME", dir.path());
        let expected = dir.path().join("curtain-wall").join("project.bin");

        let mut host = Host::new(Config::default(), "Canopy").unwrap();
        let output = run_script(&mut host, "init 2 2\nsave\n");
        assert!(output.contains(&format!("saved {}", expected.display())));
        assert!(expected.exists());

        let mut other = Host::new(Config::default(), "Scratch").unwrap();
        let output = run_script(&mut other, "load\n");
        assert!(output.contains("loaded 'Canopy' (2x2)"));
    }

    #[test]
    fn takeoff_is_json() {
        let mut host = Host::new(Config::default(), "Test").unwrap();
        let response = host.execute(Command::Takeoff).unwrap();
        let value: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["per_kind"]["structure"]["panels"], 12);
    }
}
