//! Asset inventory and usage cross-referencing for RPG projects.
//!
//! Binary media lives in fixed category directories (`img/characters`,
//! `audio/bgm`, ...). This crate enumerates those files, matches them against
//! the reference fields of the project's database, and summarizes what is
//! used, what is not, and what could be cleaned up.
//!
//! # Quick Start
//!
//! ```no_run
//! use rpgdex_assets::{analyze_project, render_asset_context};
//! use rpgdex_common::LogFacade;
//!
//! let report = analyze_project("MyGame", &LogFacade::default())?;
//!
//! for asset in report.unused_assets() {
//!     println!("unused: {} ({} bytes)", asset.file_name(), asset.size());
//! }
//! for recommendation in &report.recommendations {
//!     println!("- {recommendation}");
//! }
//!
//! println!("{}", render_asset_context(&report)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Pipeline
//!
//! 1. **Scan** ([`scan_assets`]): category directories to an [`AssetUniverse`]
//! 2. **Cross-reference** ([`cross_reference`]): records annotate asset usage
//! 3. **Report** ([`build_report`]): totals plus [`Recommendation`]s
//!
//! [`analyze_project`] runs all three. Only an invalid project root fails;
//! unreadable data files become warnings on the report.

mod asset;
mod category;
mod error;
mod prune;
mod render;
mod report;
mod scan;
mod size;
mod xref;

#[cfg(test)]
mod testutil;

pub use asset::{AssetRecord, AssetUniverse};
pub use category::{AssetCategory, ConsumerKind, AUDIO_EXTENSIONS, CATEGORY_DIRS, IMAGE_EXTENSIONS};
pub use error::{Error, Result};
pub use prune::{prune_unused, PruneOutcome};
pub use render::{asset_mapping, format_usage, render_asset_context, write_asset_context};
pub use report::{
    analyze_project, build_report, recommend, AssetReport, Recommendation, LARGE_ASSET_BYTES,
    REPORT_LARGE_ASSET_BYTES,
};
pub use scan::{scan_assets, scan_dir};
pub use size::{format_bytes, project_size, ProjectSize, SIZE_DIRS};
pub use xref::{
    cross_reference, map_file_name, ImageRef, ACTOR_REFS, ENEMY_REFS, MAP_AUDIO_REFS, MAP_IMAGE_REFS,
    MAP_INFOS_FILE, TILESET_NAMES_FIELD,
};
