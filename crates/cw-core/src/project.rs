// ABOUTME: Project file persistence for saved curtain-wall designs.
// ABOUTME: Stores a named grid payload as zstd-compressed JSON on disk.

use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::PathBuf;

/// A saved design: a name plus the grid payload owned by the grid crate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub version: u32,
    pub name: String,
    /// Serialized grid snapshot
    pub grid: serde_json::Value,
}

impl ProjectFile {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new(name: impl Into<String>, grid: serde_json::Value) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            name: name.into(),
            grid,
        }
    }

    /// Get the default project file path (~/.local/share/curtain-wall/project.bin)
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|p| p.join("curtain-wall").join("project.bin"))
    }

    /// Save project data to disk
    pub fn save(&self, path: &std::path::Path) -> Result<(), ProjectError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Serialize to JSON then compress with zstd
        let json = serde_json::to_vec(self)?;
        let mut encoder = zstd::Encoder::new(Vec::new(), 3)?;
        encoder.write_all(&json)?;
        let compressed = encoder.finish()?;

        std::fs::write(path, compressed)?;
        tracing::info!("Saved project '{}' to {}", self.name, path.display());
        Ok(())
    }

    /// Save project to default path
    pub fn save_to_default(&self) -> Result<PathBuf, ProjectError> {
        let path = Self::default_path().ok_or(ProjectError::NoStatePath)?;
        self.save(&path)?;
        Ok(path)
    }

    /// Load project data from disk
    pub fn load(path: &std::path::Path) -> Result<Self, ProjectError> {
        let compressed = std::fs::read(path)?;

        let mut decoder = zstd::Decoder::new(&compressed[..])?;
        let mut json = Vec::new();
        decoder.read_to_end(&mut json)?;

        let project: ProjectFile = serde_json::from_slice(&json)?;

        if project.version > Self::CURRENT_VERSION {
            return Err(ProjectError::UnsupportedVersion(project.version));
        }

        tracing::info!("Loaded project '{}' from {}", project.name, path.display());
        Ok(project)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not determine data directory")]
    NoStatePath,

    #[error("Unsupported project version: {0}")]
    UnsupportedVersion(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_roundtrip() {
        let project = ProjectFile::new("Lobby facade", serde_json::json!({ "cols": 4 }));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lobby.bin");
        project.save(&path).unwrap();

        let loaded = ProjectFile::load(&path).unwrap();
        assert_eq!(loaded, project);
    }

    #[test]
    fn test_future_version_rejected() {
        let mut project = ProjectFile::new("Future", serde_json::Value::Null);
        project.version = ProjectFile::CURRENT_VERSION + 1;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("future.bin");
        project.save(&path).unwrap();

        assert!(matches!(
            ProjectFile::load(&path),
            Err(ProjectError::UnsupportedVersion(v)) if v == ProjectFile::CURRENT_VERSION + 1
        ));
    }

    #[test]
    fn test_default_path() {
        if let Some(p) = ProjectFile::default_path() {
            assert!(p.ends_with("curtain-wall/project.bin"));
        }
    }
}
