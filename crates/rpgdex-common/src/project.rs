//! Project root validation and layout.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Marker file that identifies a project root.
pub const PROJECT_MARKER: &str = "Game.rpgproject";

/// Directory holding the structured collections.
pub const DATA_DIR: &str = "data";

/// A validated project root.
///
/// Construction is the only place a terminal error can come from; everything
/// downstream degrades to warnings.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    /// Validate `root` and open it as a project.
    ///
    /// The root must exist, contain the marker file, and contain a `data`
    /// directory.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();

        if !root.is_dir() {
            return Err(invalid(root, "project path does not exist or is not a directory"));
        }

        if !root.join(PROJECT_MARKER).is_file() {
            return Err(invalid(root, &format!("{PROJECT_MARKER} not found")));
        }

        let data = root.join(DATA_DIR);
        if !data.is_dir() {
            return Err(invalid(root, "data directory not found"));
        }

        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[inline]
    pub fn data_dir(&self) -> PathBuf {
        self.root.join(DATA_DIR)
    }

    /// Path of a file inside the data directory.
    #[inline]
    pub fn data_file(&self, name: &str) -> PathBuf {
        self.data_dir().join(name)
    }
}

fn invalid(path: &Path, reason: &str) -> Error {
    Error::InvalidProject {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
