//! Byte formatting and project size breakdown.

use std::path::Path;

use serde::Serialize;
use walkdir::WalkDir;

/// Top-level directories counted by [`project_size`].
pub const SIZE_DIRS: &[&str] = &["img", "audio", "data", "js", "movies"];

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Format a byte count with base-1024 units and up to two decimals.
///
/// `0` is `"0 Bytes"`, `1536` is `"1.5 KB"`, `2048` is `"2 KB"`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut scaled = bytes as f64;
    while scaled >= 1024.0 && unit < UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }

    let rounded = (scaled * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

/// Bytes per top-level directory plus their sum.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSize {
    pub breakdown: Vec<(String, u64)>,
    pub total: u64,
}

/// Recursively total the sizes of the project's content directories.
///
/// Missing directories and unreadable entries count as zero.
pub fn project_size(root: &Path) -> ProjectSize {
    let breakdown: Vec<(String, u64)> = SIZE_DIRS
        .iter()
        .map(|dir| (dir.to_string(), directory_size(&root.join(dir))))
        .collect();
    let total = breakdown.iter().map(|(_, n)| n).sum();
    ProjectSize { breakdown, total }
}

fn directory_size(dir: &Path) -> u64 {
    if !dir.is_dir() {
        return 0;
    }
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .map(|meta| meta.len())
        .sum()
}
