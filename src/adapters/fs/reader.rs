use crate::domain::ports::ArchiveSource;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// File system archive source. Storage keys are paths relative to `root`
/// (or absolute paths, which `Path::join` keeps as-is).
pub struct FileArchiveSource {
    root: PathBuf,
}

impl FileArchiveSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for FileArchiveSource {
    fn default() -> Self {
        Self::new(".")
    }
}

impl ArchiveSource for FileArchiveSource {
    fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.root.join(key);
        std::fs::read(&path)
            .with_context(|| format!("Failed to read archive: {}", path.display()))
    }
}
