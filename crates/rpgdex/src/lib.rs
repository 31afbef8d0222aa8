//! Rpgdex - RPG project database indexing and asset auditing library.
//!
//! This crate provides a unified interface to the rpgdex library crates.
//!
//! # Crates
//!
//! - [`rpgdex_common`] - Project validation, collection reading, injected logging
//! - [`rpgdex_index`] - Entity index, name lookup, and queries over database collections
//! - [`rpgdex_assets`] - Asset scanning, usage cross-referencing, and reports
//!
//! # Example
//!
//! ```no_run
//! use rpgdex::prelude::*;
//!
//! let logger = LogFacade::default();
//!
//! // Index the database and query it
//! let index = EntityIndex::open("MyGame", &logger)?;
//! let strong = Query::new(&index)
//!     .kind(CollectionKind::Enemy)
//!     .order_by("exp")
//!     .limit(5)
//!     .run();
//! for hit in strong {
//!     println!("{} #{}: {}", hit.kind, hit.id, hit.name);
//! }
//!
//! // Audit assets
//! let report = analyze_project("MyGame", &logger)?;
//! println!("{} of {} assets unused", report.unused, report.total_assets);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use rpgdex_assets as assets;
pub use rpgdex_common as common;
pub use rpgdex_index as index;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use rpgdex_assets::{
        analyze_project, asset_mapping, format_bytes, project_size, prune_unused,
        render_asset_context, AssetCategory, AssetRecord, AssetReport, ConsumerKind,
        Recommendation,
    };
    pub use rpgdex_common::{LogFacade, Logger, MemoryLogger, Project};
    pub use rpgdex_index::{
        render_database_context, CollectionKind, EntityIndex, Query, QueryHit, Record,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
