//! Common utilities for rpgdex.
//!
//! This crate provides the foundations shared by the index and asset crates:
//!
//! - [`Project`] - A validated project root and its fixed directory layout
//! - [`read_collection`] - Structured-collection reader distinguishing absence from corruption
//! - [`Logger`] - Injected logging capability, with [`LogFacade`] and [`MemoryLogger`]
//! - [`Error`] - The shared error type

mod error;
mod logger;
mod project;
mod source;

pub use error::{Error, Result};
pub use logger::{Level, LogFacade, Logger, MemoryLogger};
pub use project::{Project, DATA_DIR, PROJECT_MARKER};
pub use source::{read_collection, read_document};

/// Re-export serde_json so downstream crates agree on the payload type.
pub use serde_json;
