//! Scoped intermediate files

use std::path::{Path, PathBuf};

/// A file in the output directory that is removed when the guard drops
///
/// Call [`Intermediate::keep`] to turn it into a final artifact.
#[derive(Debug)]
pub struct Intermediate {
    path: PathBuf,
    keep: bool,
}

impl Intermediate {
    pub fn new(path: PathBuf) -> Self {
        Self { path, keep: false }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keep the file on disk and hand back its path
    pub fn keep(mut self) -> PathBuf {
        self.keep = true;
        std::mem::take(&mut self.path)
    }
}

impl Drop for Intermediate {
    fn drop(&mut self) {
        if self.keep || !self.path.exists() {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!("Failed to remove intermediate {:?}: {}", self.path, e);
        }
    }
}
