//! Unused-asset pruning.

use std::fs;
use std::path::PathBuf;

use serde::Serialize;

use rpgdex_common::Logger;

use crate::size::format_bytes;
use crate::{AssetReport, Error, Result};

/// Files removed (or that would be removed) and the bytes reclaimed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PruneOutcome {
    pub dry_run: bool,
    pub removed: Vec<PathBuf>,
    pub saved: u64,
}

/// Delete every asset `report` marks unused.
///
/// With `dry_run` nothing is touched and the outcome lists what would go.
/// The first failed deletion aborts; files already removed stay removed.
pub fn prune_unused(report: &AssetReport, dry_run: bool, logger: &dyn Logger) -> Result<PruneOutcome> {
    let mut outcome = PruneOutcome {
        dry_run,
        ..Default::default()
    };

    for asset in report.unused_assets() {
        if !dry_run {
            fs::remove_file(asset.path()).map_err(|source| Error::Remove {
                path: asset.path().to_path_buf(),
                source,
            })?;
            logger.debug(&format!("Removed {}", asset.path().display()));
        }
        outcome.removed.push(asset.path().to_path_buf());
        outcome.saved += asset.size();
    }

    let verb = if dry_run { "Would remove" } else { "Removed" };
    logger.info(&format!(
        "{verb} {} files ({})",
        outcome.removed.len(),
        format_bytes(outcome.saved)
    ));
    Ok(outcome)
}
