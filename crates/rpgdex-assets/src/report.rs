//! Asset report and recommendations.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::BuildHasherDefault;
use std::path::{Path, PathBuf};

use hashbrown::HashSet as FastHashSet;
use rustc_hash::FxHasher;
use serde::{Serialize, Serializer};

use rpgdex_common::{Logger, Project};

use crate::scan::scan_assets;
use crate::size::format_bytes;
use crate::xref::cross_reference;
use crate::{AssetCategory, AssetRecord, AssetUniverse, Result};

type FxHashSet<T> = FastHashSet<T, BuildHasherDefault<FxHasher>>;

/// Assets strictly larger than this are flagged for optimization.
pub const LARGE_ASSET_BYTES: u64 = 1_048_576;

/// Assets strictly larger than this are listed in the rendered report.
pub const REPORT_LARGE_ASSET_BYTES: u64 = 512_000;

/// A heuristic finding about the asset set.
///
/// Recommendations are produced in declaration order, and `Healthy` only
/// when nothing else applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    RemoveUnused { count: usize, bytes: u64 },
    OptimizeLarge { count: usize },
    PossibleDuplicates { count: usize },
    InUse { count: usize },
    AddCharacterSprites,
    Healthy,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::RemoveUnused { count, bytes } => write!(
                f,
                "Removing {count} unused assets would save {}",
                format_bytes(*bytes)
            ),
            Recommendation::OptimizeLarge { count } => {
                write!(f, "Consider optimizing {count} large files")
            }
            Recommendation::PossibleDuplicates { count } => {
                write!(f, "{count} assets share a file name with another asset (possible duplicates)")
            }
            Recommendation::InUse { count } => write!(f, "{count} assets are in use"),
            Recommendation::AddCharacterSprites => f.write_str("Consider adding character sprites"),
            Recommendation::Healthy => f.write_str("Asset configuration looks healthy"),
        }
    }
}

impl Serialize for Recommendation {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Evaluate the fixed recommendation rules over a cross-referenced asset set.
pub fn recommend(assets: &[AssetRecord]) -> Vec<Recommendation> {
    let mut out = Vec::new();

    let (unused_count, unused_bytes) = assets
        .iter()
        .filter(|a| a.is_unused())
        .fold((0usize, 0u64), |(n, bytes), a| (n + 1, bytes + a.size()));
    if unused_count > 0 {
        out.push(Recommendation::RemoveUnused {
            count: unused_count,
            bytes: unused_bytes,
        });
    }

    let large = assets.iter().filter(|a| a.size() > LARGE_ASSET_BYTES).count();
    if large > 0 {
        out.push(Recommendation::OptimizeLarge { count: large });
    }

    let mut names: FxHashSet<String> = FxHashSet::default();
    for asset in assets {
        names.insert(asset.file_name().to_lowercase());
    }
    let duplicates = assets.len() - names.len();
    if duplicates > 0 {
        out.push(Recommendation::PossibleDuplicates { count: duplicates });
    }

    let used = assets.len() - unused_count;
    if used > 0 {
        out.push(Recommendation::InUse { count: used });
    }

    let has = |category: AssetCategory| assets.iter().any(|a| a.category() == category);
    if !has(AssetCategory::Character) && has(AssetCategory::Enemy) {
        out.push(Recommendation::AddCharacterSprites);
    }

    if out.is_empty() {
        out.push(Recommendation::Healthy);
    }
    out
}

/// Everything known about a project's assets after one scan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetReport {
    pub project: PathBuf,
    pub total_assets: usize,
    pub total_size: u64,
    pub total_size_formatted: String,
    pub by_category: BTreeMap<AssetCategory, usize>,
    pub used: usize,
    pub unused: usize,
    pub assets: Vec<AssetRecord>,
    pub recommendations: Vec<Recommendation>,
    /// Non-fatal problems met while cross-referencing.
    pub warnings: Vec<String>,
}

impl AssetReport {
    pub fn used_assets(&self) -> impl Iterator<Item = &AssetRecord> {
        self.assets.iter().filter(|a| !a.is_unused())
    }

    pub fn unused_assets(&self) -> impl Iterator<Item = &AssetRecord> {
        self.assets.iter().filter(|a| a.is_unused())
    }

    /// Bytes that deleting every unused asset would reclaim.
    pub fn unused_bytes(&self) -> u64 {
        self.unused_assets().map(AssetRecord::size).sum()
    }
}

/// Summarize a cross-referenced universe. Pure.
pub fn build_report(project: &Path, universe: AssetUniverse, warnings: Vec<String>) -> AssetReport {
    let assets = universe.into_assets();

    let mut by_category = BTreeMap::new();
    for asset in &assets {
        *by_category.entry(asset.category()).or_insert(0) += 1;
    }

    let total_size: u64 = assets.iter().map(AssetRecord::size).sum();
    let unused = assets.iter().filter(|a| a.is_unused()).count();
    let recommendations = recommend(&assets);

    AssetReport {
        project: project.to_path_buf(),
        total_assets: assets.len(),
        total_size,
        total_size_formatted: format_bytes(total_size),
        by_category,
        used: assets.len() - unused,
        unused,
        assets,
        recommendations,
        warnings,
    }
}

/// Scan, cross-reference, and summarize the project at `root`.
///
/// Fails only when `root` is not a valid project.
pub fn analyze_project<P: AsRef<Path>>(root: P, logger: &dyn Logger) -> Result<AssetReport> {
    let project = Project::open(root)?;
    logger.info(&format!("Analyzing assets in {}", project.root().display()));

    let mut universe = scan_assets(project.root(), logger);
    let warnings = cross_reference(&project, &mut universe, logger);
    let report = build_report(project.root(), universe, warnings);

    logger.info(&format!(
        "Asset analysis complete: {} assets, {} used, {} unused",
        report.total_assets, report.used, report.unused
    ));
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{project_with, write_asset};
    use crate::ConsumerKind;
    use rpgdex_common::MemoryLogger;

    fn asset(name: &str, category: AssetCategory, size: u64) -> AssetRecord {
        AssetRecord::new(name, PathBuf::from(name), category, size)
    }

    fn used(name: &str, category: AssetCategory, size: u64) -> AssetRecord {
        let mut a = asset(name, category, size);
        a.record_use(ConsumerKind::Actor, 1);
        a
    }

    #[test]
    fn test_orphan_is_reported_unused() {
        let (dir, _project) = project_with(&[(
            "Actors.json",
            r#"[null, {"id": 1, "name": "Hero", "characterName": "Hero1"}]"#,
        )]);
        write_asset(dir.path(), "img/characters/Hero1.png", 100);
        write_asset(dir.path(), "img/pictures/Orphan.png", 50);

        let report = analyze_project(dir.path(), &MemoryLogger::new()).unwrap();
        assert_eq!(report.total_assets, 2);
        assert_eq!(report.used, 1);
        assert_eq!(report.unused, 1);

        let orphan = report.assets.iter().find(|a| a.file_name() == "Orphan.png").unwrap();
        assert_eq!(orphan.usage_count(), 0);
        assert!(orphan.is_unused());

        assert_eq!(
            report.recommendations[0],
            Recommendation::RemoveUnused { count: 1, bytes: 50 }
        );
        assert_eq!(report.unused_bytes(), 50);
    }

    #[test]
    fn test_invalid_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = analyze_project(dir.path().join("missing"), &MemoryLogger::new()).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Common(rpgdex_common::Error::InvalidProject { .. })
        ));
    }

    #[test]
    fn test_large_file_threshold() {
        let big = recommend(&[used("Title.png", AssetCategory::Picture, 2 * 1024 * 1024)]);
        assert!(big.contains(&Recommendation::OptimizeLarge { count: 1 }));

        let small = recommend(&[used("Icon.png", AssetCategory::Picture, 10 * 1024)]);
        assert!(!small
            .iter()
            .any(|r| matches!(r, Recommendation::OptimizeLarge { .. })));

        let exact = recommend(&[used("Edge.png", AssetCategory::Picture, LARGE_ASSET_BYTES)]);
        assert!(!exact
            .iter()
            .any(|r| matches!(r, Recommendation::OptimizeLarge { .. })));
    }

    #[test]
    fn test_duplicate_names_across_categories() {
        let recs = recommend(&[
            used("Hero1.png", AssetCategory::Character, 10),
            used("hero1.PNG", AssetCategory::Face, 10),
            used("Slime.png", AssetCategory::Enemy, 10),
        ]);
        assert_eq!(
            recs,
            vec![
                Recommendation::PossibleDuplicates { count: 1 },
                Recommendation::InUse { count: 3 },
            ]
        );
    }

    #[test]
    fn test_missing_character_sprites() {
        let recs = recommend(&[used("Slime.png", AssetCategory::Enemy, 10)]);
        assert_eq!(
            recs,
            vec![
                Recommendation::InUse { count: 1 },
                Recommendation::AddCharacterSprites,
            ]
        );
    }

    #[test]
    fn test_empty_universe_is_healthy() {
        assert_eq!(recommend(&[]), vec![Recommendation::Healthy]);
    }

    #[test]
    fn test_build_report_totals() {
        let universe = AssetUniverse::new(vec![
            used("Hero1.png", AssetCategory::Character, 100),
            asset("Orphan.png", AssetCategory::Picture, 1536),
            asset("Battle1.ogg", AssetCategory::Audio, 10),
        ]);
        let report = build_report(Path::new("/game"), universe, Vec::new());

        assert_eq!(report.total_size, 1646);
        assert_eq!(report.by_category[&AssetCategory::Character], 1);
        assert_eq!(report.by_category.get(&AssetCategory::Face), None);
        assert_eq!((report.used, report.unused), (1, 2));
        assert_eq!(report.unused_bytes(), 1546);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["totalAssets"], 3);
        assert_eq!(json["byCategory"]["picture"], 1);
        assert_eq!(
            json["recommendations"][0],
            "Removing 2 unused assets would save 1.51 KB"
        );
    }
}
