// ABOUTME: Panel kind shared between the grid model and its consumers.
// ABOUTME: Closed set of fill types a curtain-wall panel can take.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Fill type of a visible panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    /// Fixed structural infill (default)
    #[default]
    Structure,
    /// Glazed window unit
    Window,
    /// Door leaf
    Door,
}

impl PanelKind {
    pub fn all() -> &'static [PanelKind] {
        &[PanelKind::Structure, PanelKind::Window, PanelKind::Door]
    }

    pub fn label(&self) -> &'static str {
        match self {
            PanelKind::Structure => "structure",
            PanelKind::Window => "window",
            PanelKind::Door => "door",
        }
    }

    /// Single-letter code used in text diagrams
    pub fn code(&self) -> char {
        match self {
            PanelKind::Structure => 'S',
            PanelKind::Window => 'W',
            PanelKind::Door => 'D',
        }
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown panel kind: {0}")]
pub struct UnknownPanelKind(pub String);

impl FromStr for PanelKind {
    type Err = UnknownPanelKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PanelKind::all()
            .iter()
            .copied()
            .find(|kind| kind.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownPanelKind(s.to_string()))
    }
}
