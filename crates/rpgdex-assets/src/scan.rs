//! Asset inventory scanner.

use std::path::Path;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use walkdir::WalkDir;

use rpgdex_common::Logger;

use crate::category::CATEGORY_DIRS;
use crate::{AssetCategory, AssetRecord, AssetUniverse};

/// Enumerate every asset under the category directories of `root`.
///
/// Directories are scanned independently and concatenated in table order.
/// Missing directories contribute nothing.
pub fn scan_assets(root: &Path, logger: &dyn Logger) -> AssetUniverse {
    #[cfg(feature = "parallel")]
    let per_dir: Vec<Vec<AssetRecord>> = CATEGORY_DIRS
        .par_iter()
        .map(|&(dir, category)| scan_dir(root, dir, category, logger))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let per_dir: Vec<Vec<AssetRecord>> = CATEGORY_DIRS
        .iter()
        .map(|&(dir, category)| scan_dir(root, dir, category, logger))
        .collect();

    let assets: Vec<AssetRecord> = per_dir.into_iter().flatten().collect();
    logger.info(&format!("Found {} assets under {}", assets.len(), root.display()));
    AssetUniverse::new(assets)
}

/// Scan one directory (non-recursively) for files of `category`.
pub fn scan_dir(
    root: &Path,
    relative: &str,
    category: AssetCategory,
    logger: &dyn Logger,
) -> Vec<AssetRecord> {
    let dir = root.join(relative);
    if !dir.is_dir() {
        logger.debug(&format!("{} absent, skipping", dir.display()));
        return Vec::new();
    }

    let mut assets = Vec::new();
    let walker = WalkDir::new(&dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                logger.warn(&format!("Failed to read entry in {}: {e}", dir.display()));
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(file_name) = entry.file_name().to_str() else {
            logger.debug(&format!("Skipping non-UTF-8 file name in {}", dir.display()));
            continue;
        };
        if !category.accepts(file_name) {
            continue;
        }

        match entry.metadata() {
            Ok(meta) => assets.push(AssetRecord::new(
                file_name,
                entry.path().to_path_buf(),
                category,
                meta.len(),
            )),
            Err(e) => logger.warn(&format!("Failed to stat {}: {e}", entry.path().display())),
        }
    }

    assets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::write_asset;
    use rpgdex_common::MemoryLogger;

    #[test]
    fn test_scan_filters_by_extension_and_records_size() {
        let dir = tempfile::tempdir().unwrap();
        write_asset(dir.path(), "img/characters/Hero1.png", 300);
        write_asset(dir.path(), "img/characters/notes.txt", 5);
        write_asset(dir.path(), "img/faces/Hero1.PNG", 200);
        write_asset(dir.path(), "audio/bgm/Battle1.ogg", 1000);
        write_asset(dir.path(), "audio/bgm/cover.png", 10);

        let universe = scan_assets(dir.path(), &MemoryLogger::new());
        let found: Vec<(&str, AssetCategory, u64)> = universe
            .assets()
            .iter()
            .map(|a| (a.file_name(), a.category(), a.size()))
            .collect();

        assert_eq!(
            found,
            vec![
                ("Hero1.png", AssetCategory::Character, 300),
                ("Hero1.PNG", AssetCategory::Face, 200),
                ("Battle1.ogg", AssetCategory::Audio, 1000),
            ]
        );
        assert!(universe.assets().iter().all(AssetRecord::is_unused));
    }

    #[test]
    fn test_missing_directories_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        let logger = MemoryLogger::new();

        let universe = scan_assets(dir.path(), &logger);
        assert!(universe.is_empty());
        assert!(logger.warnings().is_empty());
    }

    #[test]
    fn test_scan_is_not_recursive() {
        let dir = tempfile::tempdir().unwrap();
        write_asset(dir.path(), "img/pictures/nested/deep.png", 1);
        write_asset(dir.path(), "img/pictures/top.png", 1);

        let assets = scan_dir(dir.path(), "img/pictures", AssetCategory::Picture, &MemoryLogger::new());
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].file_name(), "top.png");
    }
}
