// ABOUTME: Edit tools the host can activate before cell interactions.
// ABOUTME: Select builds a merge/split selection; the others paint panel kinds.

use std::fmt;
use std::str::FromStr;

use cw_core::PanelKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditTool {
    /// Structure tool: clicks toggle selection
    #[default]
    Select,
    /// Paints window panels
    Window,
    /// Paints door panels
    Door,
}

impl EditTool {
    /// Kind painted by this tool, `None` in selection mode
    pub fn paint_kind(&self) -> Option<PanelKind> {
        match self {
            EditTool::Select => None,
            EditTool::Window => Some(PanelKind::Window),
            EditTool::Door => Some(PanelKind::Door),
        }
    }

    pub fn is_painting(&self) -> bool {
        self.paint_kind().is_some()
    }
}

impl fmt::Display for EditTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditTool::Select => f.write_str("select"),
            EditTool::Window => f.write_str("window"),
            EditTool::Door => f.write_str("door"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown tool: {0}")]
pub struct UnknownTool(pub String);

impl FromStr for EditTool {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "select" | "structure" => Ok(EditTool::Select),
            "window" => Ok(EditTool::Window),
            "door" => Ok(EditTool::Door),
            _ => Err(UnknownTool(s.to_string())),
        }
    }
}
