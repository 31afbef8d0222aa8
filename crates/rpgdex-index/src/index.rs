//! Entity index over all collections.
//!
//! Key properties:
//! - One id-keyed collection per type, stored in processing order
//! - A derived name index (lowercased name -> entries) built from those
//!   collections, never edited on its own
//! - Best-effort builds: a damaged collection becomes a warning, siblings
//!   still load

use std::hash::BuildHasherDefault;
use std::path::Path;

use hashbrown::HashMap as FastHashMap;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use rustc_hash::FxHasher;
use serde::Serialize;

use rpgdex_common::{Logger, Project};

use crate::loader::load_collection;
use crate::{Collection, CollectionKind, Error, Record, Result};

type FxHashMap<K, V> = FastHashMap<K, V, BuildHasherDefault<FxHasher>>;

/// A `(type, id)` reference into the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EntryRef {
    #[serde(rename = "type")]
    pub kind: CollectionKind,
    pub id: u32,
}

/// A collection that failed to load during a build.
#[derive(Debug, Clone, Serialize)]
pub struct LoadWarning {
    #[serde(rename = "type")]
    pub kind: CollectionKind,
    pub message: String,
}

/// Lowercased name -> entries, with buckets kept in first-seen order.
#[derive(Debug, Default)]
struct NameIndex {
    slots: FxHashMap<String, usize>,
    buckets: Vec<(String, Vec<EntryRef>)>,
}

impl NameIndex {
    fn push(&mut self, name: &str, entry: EntryRef) {
        let key = name.to_lowercase();
        let slot = match self.slots.get(&key) {
            Some(&slot) => slot,
            None => {
                let slot = self.buckets.len();
                self.slots.insert(key.clone(), slot);
                self.buckets.push((key, Vec::new()));
                slot
            }
        };
        self.buckets[slot].1.push(entry);
    }

    fn bucket(&self, key: &str) -> &[EntryRef] {
        self.slots
            .get(key)
            .map(|&slot| self.buckets[slot].1.as_slice())
            .unwrap_or(&[])
    }
}

/// Per-type record counts.
#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    pub counts: Vec<(CollectionKind, usize)>,
    pub total: usize,
    pub unique_names: usize,
}

impl IndexStats {
    pub fn count(&self, kind: CollectionKind) -> usize {
        self.counts
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(0, |(_, n)| *n)
    }
}

/// In-memory index over every collection of one project.
///
/// Built fresh per request and immutable afterwards.
#[derive(Debug)]
pub struct EntityIndex {
    collections: Vec<Collection>,
    names: NameIndex,
    warnings: Vec<LoadWarning>,
}

impl EntityIndex {
    /// Validate `root` as a project and build its index.
    ///
    /// Only an inaccessible or invalid root is an error. Collections that
    /// fail to load are reported through [`EntityIndex::warnings`].
    pub fn open<P: AsRef<Path>>(root: P, logger: &dyn Logger) -> Result<Self> {
        let project = Project::open(root)?;
        Ok(Self::build(&project, logger))
    }

    /// Build the index for an already validated project.
    pub fn build(project: &Project, logger: &dyn Logger) -> Self {
        logger.info(&format!("Building database index for {}", project.root().display()));

        #[cfg(feature = "parallel")]
        let loaded: Vec<(CollectionKind, Result<Collection>)> = CollectionKind::ALL
            .par_iter()
            .map(|&kind| (kind, load_collection(project, kind, logger)))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let loaded: Vec<(CollectionKind, Result<Collection>)> = CollectionKind::ALL
            .iter()
            .map(|&kind| (kind, load_collection(project, kind, logger)))
            .collect();

        let mut collections = Vec::with_capacity(CollectionKind::ALL.len());
        let mut warnings = Vec::new();

        // Merge sequentially so bucket order is the processing order.
        for (kind, result) in loaded {
            match result {
                Ok(collection) => collections.push(collection),
                Err(e) => {
                    let message = format!("Failed to load {}: {e}", kind.file_name());
                    logger.warn(&message);
                    warnings.push(LoadWarning { kind, message });
                    collections.push(Collection::new(kind));
                }
            }
        }

        let mut index = Self::assemble(collections);
        index.warnings = warnings;

        let stats = index.stats();
        logger.info(&format!(
            "Database index built: {} entries, {} unique names",
            stats.total, stats.unique_names
        ));

        index
    }

    /// Build an index from collections already in memory.
    ///
    /// Types without a collection are empty; a later collection of the same
    /// type replaces an earlier one.
    pub fn from_collections(collections: impl IntoIterator<Item = Collection>) -> Self {
        let mut slots: Vec<Collection> = CollectionKind::ALL.into_iter().map(Collection::new).collect();
        for collection in collections {
            let slot = collection.kind().slot();
            slots[slot] = collection;
        }
        Self::assemble(slots)
    }

    fn assemble(collections: Vec<Collection>) -> Self {
        let mut names = NameIndex::default();
        for collection in &collections {
            for record in collection.iter() {
                if let Some(name) = record.name() {
                    names.push(
                        name,
                        EntryRef {
                            kind: record.kind(),
                            id: record.id(),
                        },
                    );
                }
            }
        }

        Self {
            collections,
            names,
            warnings: Vec::new(),
        }
    }

    /// The collection for `kind`.
    #[inline]
    pub fn collection(&self, kind: CollectionKind) -> &Collection {
        &self.collections[kind.slot()]
    }

    /// All collections in processing order.
    pub fn collections(&self) -> impl Iterator<Item = &Collection> {
        self.collections.iter()
    }

    /// Get a record by type and id.
    #[inline]
    pub fn record(&self, kind: CollectionKind, id: u32) -> Option<&Record> {
        self.collection(kind).get(id)
    }

    /// Get a record by type name and id.
    ///
    /// An unknown type name is an error; a missing id is `Ok(None)`.
    pub fn get_by_id(&self, type_name: &str, id: u32) -> Result<Option<&Record>> {
        let kind: CollectionKind = type_name.parse()?;
        Ok(self.record(kind, id))
    }

    /// Like [`EntityIndex::get_by_id`], but a missing id is an error too.
    pub fn require(&self, type_name: &str, id: u32) -> Result<&Record> {
        self.get_by_id(type_name, id)?.ok_or_else(|| Error::EntryNotFound {
            kind: type_name.to_string(),
            id,
        })
    }

    /// Resolve a name-index entry.
    #[inline]
    pub fn resolve(&self, entry: EntryRef) -> Option<&Record> {
        self.record(entry.kind, entry.id)
    }

    /// Entries filed under exactly `name` (case-insensitive).
    pub fn entries_named(&self, name: &str) -> &[EntryRef] {
        self.names.bucket(&name.to_lowercase())
    }

    /// Find all records whose lowercased name contains `query`.
    ///
    /// Results follow bucket creation order, then bucket order.
    pub fn find_by_name(&self, query: &str) -> Vec<&Record> {
        let needle = query.to_lowercase();
        self.names
            .buckets
            .iter()
            .filter(|(key, _)| key.contains(&needle))
            .flat_map(|(_, entries)| entries.iter())
            .filter_map(|&entry| self.resolve(entry))
            .collect()
    }

    /// Collections that failed to load during the build.
    #[inline]
    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    /// Per-type counts and the grand total.
    pub fn stats(&self) -> IndexStats {
        let counts: Vec<(CollectionKind, usize)> = self
            .collections
            .iter()
            .map(|c| (c.kind(), c.len()))
            .collect();
        let total = counts.iter().map(|(_, n)| n).sum();

        IndexStats {
            counts,
            total,
            unique_names: self.names.buckets.len(),
        }
    }

    /// Iterate every record in processing order, ids ascending.
    pub fn all_records(&self) -> impl Iterator<Item = &Record> {
        self.collections.iter().flat_map(Collection::iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::project_with;
    use rpgdex_common::MemoryLogger;

    fn sample() -> (tempfile::TempDir, Project) {
        project_with(&[
            (
                "Actors.json",
                r#"[null, {"id": 1, "name": "Hero", "characterName": "Hero1"}, {"id": 2, "name": "Slime"}]"#,
            ),
            (
                "Enemies.json",
                r#"[null, {"id": 1, "name": "Slime"}, {"id": 6, "name": "Bat"}, {"id": 12, "name": ""}]"#,
            ),
            ("Skills.json", r#"[null, {"id": 1, "name": "Attack"}]"#),
        ])
    }

    #[test]
    fn test_get_by_id_returns_exact_record() {
        let (_dir, project) = sample();
        let index = EntityIndex::build(&project, &MemoryLogger::new());

        for record in index.all_records() {
            let found = index.get_by_id(record.kind().as_str(), record.id()).unwrap();
            assert_eq!(found, Some(record));
        }
        assert_eq!(index.get_by_id("enemy", 6).unwrap().unwrap().name(), Some("Bat"));
        assert!(index.get_by_id("enemy", 5).unwrap().is_none());
    }

    #[test]
    fn test_unknown_type_is_distinct_from_missing_id() {
        let (_dir, project) = sample();
        let index = EntityIndex::build(&project, &MemoryLogger::new());

        let err = index.get_by_id("monster", 1).unwrap_err();
        assert!(matches!(err, Error::Common(rpgdex_common::Error::UnsupportedKind(_))));

        let err = index.require("enemy", 99).unwrap_err();
        assert!(matches!(err, Error::EntryNotFound { id: 99, .. }));
    }

    #[test]
    fn test_name_index_covers_exactly_named_records() {
        let (_dir, project) = sample();
        let index = EntityIndex::build(&project, &MemoryLogger::new());

        for record in index.all_records() {
            let entry = EntryRef {
                kind: record.kind(),
                id: record.id(),
            };
            let filed = index
                .names
                .buckets
                .iter()
                .any(|(_, entries)| entries.contains(&entry));
            assert_eq!(filed, record.name().is_some(), "{entry:?}");
        }
    }

    #[test]
    fn test_name_bucket_follows_processing_order() {
        let (_dir, project) = sample();
        let index = EntityIndex::build(&project, &MemoryLogger::new());

        let slime = index.entries_named("SLIME");
        assert_eq!(
            slime,
            &[
                EntryRef { kind: CollectionKind::Actor, id: 2 },
                EntryRef { kind: CollectionKind::Enemy, id: 1 },
            ]
        );
    }

    #[test]
    fn test_find_by_name_is_case_insensitive_substring() {
        let (_dir, project) = sample();
        let index = EntityIndex::build(&project, &MemoryLogger::new());

        let hits: Vec<(CollectionKind, u32)> = index
            .find_by_name("LI")
            .into_iter()
            .map(|r| (r.kind(), r.id()))
            .collect();
        assert_eq!(hits, vec![(CollectionKind::Actor, 2), (CollectionKind::Enemy, 1)]);
        assert!(index.find_by_name("dragon").is_empty());
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let (_dir, project) = sample();
        let a = EntityIndex::build(&project, &MemoryLogger::new());
        let b = EntityIndex::build(&project, &MemoryLogger::new());

        assert_eq!(a.names.buckets, b.names.buckets);
        assert!(a.all_records().eq(b.all_records()));
    }

    #[test]
    fn test_corrupt_collection_degrades_to_warning() {
        let (_dir, project) = project_with(&[
            ("Actors.json", r#"[null, {"id": 1, "name": "Hero"}]"#),
            ("Items.json", "[{broken"),
        ]);
        let logger = MemoryLogger::new();
        let index = EntityIndex::build(&project, &logger);

        assert_eq!(index.collection(CollectionKind::Actor).len(), 1);
        assert!(index.collection(CollectionKind::Item).is_empty());
        assert_eq!(index.warnings().len(), 1);
        assert_eq!(index.warnings()[0].kind, CollectionKind::Item);
        assert!(index.warnings()[0].message.contains("Items.json"));
        assert_eq!(logger.warnings().len(), 1);
    }

    #[test]
    fn test_stats_counts_per_type() {
        let (_dir, project) = sample();
        let stats = EntityIndex::build(&project, &MemoryLogger::new()).stats();

        assert_eq!(stats.count(CollectionKind::Actor), 2);
        assert_eq!(stats.count(CollectionKind::Enemy), 3);
        assert_eq!(stats.count(CollectionKind::Weapon), 0);
        assert_eq!(stats.total, 6);
        assert_eq!(stats.counts.len(), CollectionKind::ALL.len());
        // hero, slime, bat, attack
        assert_eq!(stats.unique_names, 4);
    }

    #[test]
    fn test_open_rejects_invalid_root() {
        let dir = tempfile::tempdir().unwrap();
        assert!(EntityIndex::open(dir.path(), &MemoryLogger::new()).is_err());
    }
}
