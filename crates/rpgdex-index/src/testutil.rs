//! Test fixtures.

use std::fs;

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
