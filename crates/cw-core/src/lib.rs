// ABOUTME: Shared types and configuration for the curtain-wall designer.
// ABOUTME: Defines panel kinds, config file handling and project files.

pub mod config;
pub mod panel;
pub mod project;

pub use config::{BehaviorSettings, Config, ConfigError, GridDefaults};
pub use panel::{PanelKind, UnknownPanelKind};
pub use project::{ProjectError, ProjectFile};
