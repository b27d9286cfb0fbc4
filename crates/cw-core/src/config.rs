// ABOUTME: Application configuration handling.
// ABOUTME: Loads and saves designer settings from TOML config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Grid applied when a session starts without a loaded project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridDefaults {
    /// Number of columns
    pub cols: usize,
    /// Number of rows
    pub rows: usize,
    /// Wall width in meters
    pub width: f64,
    /// Wall height in meters
    pub height: f64,
    /// Columns/rows beyond this only produce a warning
    pub soft_max_cells_per_axis: usize,
}

impl Default for GridDefaults {
    fn default() -> Self {
        Self {
            cols: 4,
            rows: 3,
            width: 4.0,
            height: 3.0,
            soft_max_cells_per_axis: 10,
        }
    }
}

/// Behavior settings (non-model preferences of the command host)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorSettings {
    /// Echo each command before its output
    pub echo_commands: bool,
    /// Print the grid diagram after every state-changing command
    pub show_after_edit: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial grid
    pub grid: GridDefaults,

    /// Behavior settings
    pub behavior: BehaviorSettings,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

impl Config {
    /// Get the default config file path (~/.config/curtain-wall/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("curtain-wall").join("config.toml"))
    }

    /// Load config from a path
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load config from default path, or return default config if not found
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        match Self::load(&path) {
            Ok(config) => config,
            Err(ConfigError::ReadError(_)) => Self::default(),
            Err(e) => {
                tracing::warn!("Ignoring invalid config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to a path
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config: Config = toml::from_str("[grid]\ncols = 6\n").unwrap();
        assert_eq!(config.grid.cols, 6);
        assert_eq!(config.grid.rows, 3);
        assert!((config.grid.width - 4.0).abs() < 1e-9);
        assert!(!config.behavior.echo_commands);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.grid.width = 7.5;
        config.behavior.show_after_edit = true;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.grid, config.grid);
        assert!(loaded.behavior.show_after_edit);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "grid = 12").unwrap();

        assert!(matches!(Config::load(&path), Err(ConfigError::ParseError(_))));
    }
}
