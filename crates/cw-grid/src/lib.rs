// ABOUTME: Curtain-wall panel grid model.
// ABOUTME: Cell merge/split, selection, and ratio-weighted panel sizing.

mod cell;
mod error;
mod grid;
mod render;
mod snapshot;
mod takeoff;
mod tool;

pub use cell::{Cell, CellId, CellRange};
pub use error::{Axis, GridError};
pub use grid::{ClickOutcome, PanelGrid, PanelRect, DEFAULT_RATIO};
pub use snapshot::GridSnapshot;
pub use takeoff::{GridSummary, KindTotals, PanelSpec, Takeoff};
pub use tool::{EditTool, UnknownTool};

pub use cw_core::PanelKind;
