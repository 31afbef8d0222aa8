//! Error types for rpgdex-common.

use std::path::PathBuf;

use thiserror::Error;

/// Common error type for rpgdex operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A source file that was looked up does not exist.
    #[error("not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// A source file exists but does not parse as the expected structure.
    #[error("malformed {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    /// A collection type name that is not one of the known types.
    #[error("unsupported collection type: {0}")]
    UnsupportedKind(String),

    /// The project root failed validation.
    #[error("invalid project at {}: {reason}", path.display())]
    InvalidProject { path: PathBuf, reason: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error means "absent" rather than "broken".
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
