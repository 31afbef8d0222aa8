//! Entity index over RPG project database collections.
//!
//! A project's `data/` directory holds one JSON array per collection type
//! (actors, enemies, skills, ...). This crate loads them into uniform
//! id-keyed collections, derives a case-insensitive name index, and answers
//! multi-predicate queries over the result.
//!
//! # Quick Start
//!
//! ```no_run
//! use rpgdex_common::LogFacade;
//! use rpgdex_index::EntityIndex;
//!
//! let index = EntityIndex::open("MyGame", &LogFacade::default())?;
//!
//! if let Some(enemy) = index.get_by_id("enemy", 6)? {
//!     println!("{}: {:?}", enemy.display_name(), enemy.get("exp"));
//! }
//!
//! for record in index.find_by_name("slime") {
//!     println!("{} {}", record.kind(), record.id());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Architecture
//!
//! - **Loader** (`load_collection`): one data file to one `Collection`
//! - **Index** (`EntityIndex`): all collections plus the name index
//! - **Query** (`Query`): fluent filter/sort/limit builder over an index
//!
//! # Failure Policy
//!
//! Builds are best-effort. A missing collection file is simply empty. A
//! corrupt one is logged, recorded in [`EntityIndex::warnings`], and left
//! empty while the other collections load normally. Only an invalid project
//! root fails [`EntityIndex::open`].

mod context;
mod error;
mod index;
mod kind;
mod loader;
mod query;
mod record;
mod value;

#[cfg(test)]
mod testutil;

pub use context::{render_database_context, write_database_context};
pub use error::{Error, Result};
pub use index::{EntityIndex, EntryRef, IndexStats, LoadWarning};
pub use kind::CollectionKind;
pub use loader::load_collection;
pub use query::{Query, QueryHit};
pub use record::{Collection, Record};
pub use value::{compare_values, values_equal};
