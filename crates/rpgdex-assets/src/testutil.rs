//! Test fixtures.

use std::fs;
use std::path::Path;

use rpgdex_common::Project;
use tempfile::TempDir;

/// A temporary project with the given data files.
pub(crate) fn project_with(files: &[(&str, &str)]) -> (TempDir, Project) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Game.rpgproject"), "").unwrap();
    fs::create_dir(dir.path().join("data")).unwrap();
    for (name, body) in files {
        fs::write(dir.path().join("data").join(name), body).unwrap();
    }
    let project = Project::open(dir.path()).unwrap();
    (dir, project)
}

/// Write a zero-filled file of `size` bytes at `relative` under `root`.
pub(crate) fn write_asset(root: &Path, relative: &str, size: usize) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, vec![0u8; size]).unwrap();
}
