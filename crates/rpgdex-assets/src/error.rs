//! Error types for asset handling.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when analyzing or pruning assets.
#[derive(Debug, Error)]
pub enum Error {
    /// Common library error.
    #[error("{0}")]
    Common(#[from] rpgdex_common::Error),

    /// Deleting an unused asset failed.
    #[error("failed to remove {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for asset operations.
pub type Result<T> = std::result::Result<T, Error>;
