// ABOUTME: Line-oriented command language for the designer host.
// ABOUTME: Parses one command per line; blank lines and '#' comments are skipped.

use std::path::PathBuf;
use std::str::FromStr;

use cw_grid::{EditTool, PanelKind};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Init { cols: usize, rows: usize },
    Size { width: f64, height: f64 },
    Tool(EditTool),
    Click { row: usize, col: usize },
    Paint { row: usize, col: usize, kind: PanelKind },
    Select { row: usize, col: usize },
    Clear,
    Merge,
    Split,
    ColRatio { index: usize, value: f64 },
    RowRatio { index: usize, value: f64 },
    Dims { row: usize, col: usize },
    Summary,
    Panels,
    Takeoff,
    Show,
    /// `None` uses the default project location
    Save(Option<PathBuf>),
    Load(Option<PathBuf>),
}

impl Command {
    /// Whether the command can change the grid
    pub fn edits(&self) -> bool {
        matches!(
            self,
            Command::Init { .. }
                | Command::Click { .. }
                | Command::Paint { .. }
                | Command::Select { .. }
                | Command::Clear
                | Command::Merge
                | Command::Split
                | Command::ColRatio { .. }
                | Command::RowRatio { .. }
                | Command::Load(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("{command}: expected {expected}")]
    Arguments {
        command: String,
        expected: &'static str,
    },

    #[error("{command}: invalid value '{value}'")]
    Value { command: &'static str, value: String },
}

fn arg<T: FromStr>(command: &'static str, value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::Value {
        command,
        value: value.to_string(),
    })
}

/// Parse one input line. Returns `Ok(None)` for blank lines and comments.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.split('#').next().unwrap_or_default().trim();
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match (name.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("init", [cols, rows]) => Command::Init {
            cols: arg("init", cols)?,
            rows: arg("init", rows)?,
        },
        ("init", _) => return Err(expected("init", "<cols> <rows>")),
        ("size", [width, height]) => Command::Size {
            width: arg("size", width)?,
            height: arg("size", height)?,
        },
        ("size", _) => return Err(expected("size", "<width> <height>")),
        ("tool", [tool]) => Command::Tool(arg("tool", tool)?),
        ("tool", _) => return Err(expected("tool", "select|window|door")),
        ("click", [row, col]) => Command::Click {
            row: arg("click", row)?,
            col: arg("click", col)?,
        },
        ("click", _) => return Err(expected("click", "<row> <col>")),
        ("paint", [row, col, kind]) => Command::Paint {
            row: arg("paint", row)?,
            col: arg("paint", col)?,
            kind: arg("paint", kind)?,
        },
        ("paint", _) => return Err(expected("paint", "<row> <col> structure|window|door")),
        ("select", [row, col]) => Command::Select {
            row: arg("select", row)?,
            col: arg("select", col)?,
        },
        ("select", _) => return Err(expected("select", "<row> <col>")),
        ("col-ratio", [index, value]) => Command::ColRatio {
            index: arg("col-ratio", index)?,
            value: arg("col-ratio", value)?,
        },
        ("col-ratio", _) => return Err(expected("col-ratio", "<index> <value>")),
        ("row-ratio", [index, value]) => Command::RowRatio {
            index: arg("row-ratio", index)?,
            value: arg("row-ratio", value)?,
        },
        ("row-ratio", _) => return Err(expected("row-ratio", "<index> <value>")),
        ("dims", [row, col]) => Command::Dims {
            row: arg("dims", row)?,
            col: arg("dims", col)?,
        },
        ("dims", _) => return Err(expected("dims", "<row> <col>")),
        ("save", []) => Command::Save(None),
        ("save", [path]) => Command::Save(Some(PathBuf::from(path))),
        ("save", _) => return Err(expected("save", "[<path>]")),
        ("load", []) => Command::Load(None),
        ("load", [path]) => Command::Load(Some(PathBuf::from(path))),
        ("load", _) => return Err(expected("load", "[<path>]")),
        ("clear", []) => Command::Clear,
        ("merge", []) => Command::Merge,
        ("split", []) => Command::Split,
        ("summary", []) => Command::Summary,
        ("panels", []) => Command::Panels,
        ("takeoff", []) => Command::Takeoff,
        ("show", []) => Command::Show,
        (bare @ ("clear" | "merge" | "split" | "summary" | "panels" | "takeoff" | "show"), _) => {
            return Err(expected(bare, "no arguments"))
        }
        _ => return Err(ParseError::Unknown(name.to_string())),
    };
    Ok(Some(command))
}

fn expected(command: &str, expected: &'static str) -> ParseError {
    ParseError::Arguments {
        command: command.to_string(),
        expected,
    }
}
