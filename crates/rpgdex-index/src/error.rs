//! Error types for the entity index.

use thiserror::Error;

/// Errors that can occur when building or querying the entity index.
#[derive(Debug, Error)]
pub enum Error {
    /// Common library error.
    #[error("{0}")]
    Common(#[from] rpgdex_common::Error),

    /// A record reference that does not resolve.
    #[error("entry not found: {kind} {id}")]
    EntryNotFound { kind: String, id: u32 },
}

/// Result type for index operations.
pub type Result<T> = std::result::Result<T, Error>;
