//! Asset records and the scanned asset universe.

use std::collections::BTreeMap;
use std::hash::BuildHasherDefault;
use std::path::{Path, PathBuf};

use hashbrown::HashMap as FastHashMap;
use rustc_hash::FxHasher;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::size::format_bytes;
use crate::{AssetCategory, ConsumerKind};

type FxHashMap<K, V> = FastHashMap<K, V, BuildHasherDefault<FxHasher>>;

/// One binary media file and the records that use it.
///
/// The usage count and unused flag are derived from the breakdown on every
/// call, so they cannot drift from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    file_name: String,
    path: PathBuf,
    category: AssetCategory,
    size: u64,
    used_by: BTreeMap<ConsumerKind, Vec<u32>>,
}

impl AssetRecord {
    pub fn new(file_name: impl Into<String>, path: PathBuf, category: AssetCategory, size: u64) -> Self {
        Self {
            file_name: file_name.into(),
            path,
            category,
            size,
            used_by: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn category(&self) -> AssetCategory {
        self.category
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Consumer ids per kind. Kinds with no consumers are absent.
    #[inline]
    pub fn used_by(&self) -> &BTreeMap<ConsumerKind, Vec<u32>> {
        &self.used_by
    }

    /// Consumer ids of one kind.
    pub fn consumers(&self, kind: ConsumerKind) -> &[u32] {
        self.used_by.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn usage_count(&self) -> usize {
        self.used_by.values().map(Vec::len).sum()
    }

    #[inline]
    pub fn is_unused(&self) -> bool {
        self.usage_count() == 0
    }

    /// Record that consumer `id` of `kind` uses this asset.
    ///
    /// Returns `false` if the pair was already recorded.
    pub fn record_use(&mut self, kind: ConsumerKind, id: u32) -> bool {
        let ids = self.used_by.entry(kind).or_default();
        if ids.contains(&id) {
            return false;
        }
        ids.push(id);
        true
    }
}

impl Serialize for AssetRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("AssetRecord", 8)?;
        s.serialize_field("filename", &self.file_name)?;
        s.serialize_field("path", &self.path)?;
        s.serialize_field("type", &self.category)?;
        s.serialize_field("size", &self.size)?;
        s.serialize_field("sizeFormatted", &format_bytes(self.size))?;
        s.serialize_field("usedBy", &self.used_by)?;
        s.serialize_field("usageCount", &self.usage_count())?;
        s.serialize_field("isUnused", &self.is_unused())?;
        s.end()
    }
}

/// Every asset found by one scan.
///
/// Order is scan order and only meaningful for display.
#[derive(Debug, Clone, Default)]
pub struct AssetUniverse {
    assets: Vec<AssetRecord>,
    by_name: FxHashMap<(AssetCategory, String), usize>,
}

impl AssetUniverse {
    pub fn new(assets: Vec<AssetRecord>) -> Self {
        let mut by_name = FxHashMap::default();
        for (i, asset) in assets.iter().enumerate() {
            by_name
                .entry((asset.category, asset.file_name.clone()))
                .or_insert(i);
        }
        Self { assets, by_name }
    }

    #[inline]
    pub fn assets(&self) -> &[AssetRecord] {
        &self.assets
    }

    pub fn into_assets(self) -> Vec<AssetRecord> {
        self.assets
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// First asset of `category` named exactly `file_name`.
    pub fn find_exact(&self, category: AssetCategory, file_name: &str) -> Option<usize> {
        self.by_name
            .get(&(category, file_name.to_string()))
            .copied()
    }

    /// First asset of `category` named `file_name` inside `dir`.
    ///
    /// `dir` is matched against the trailing components of the asset's
    /// parent directory, e.g. `img/battlebacks2`.
    pub fn find_in_dir(&self, category: AssetCategory, dir: &str, file_name: &str) -> Option<usize> {
        self.assets.iter().position(|a| {
            a.category == category
                && a.file_name == file_name
                && a.path.parent().is_some_and(|parent| parent.ends_with(dir))
        })
    }

    /// Every asset of `category` whose file name starts with `prefix`.
    pub fn find_prefixed(&self, category: AssetCategory, prefix: &str) -> Vec<usize> {
        self.assets
            .iter()
            .enumerate()
            .filter(|(_, a)| a.category == category && a.file_name.starts_with(prefix))
            .map(|(i, _)| i)
            .collect()
    }

    /// Record a use on the asset at `index`.
    pub fn record_use(&mut self, index: usize, kind: ConsumerKind, id: u32) -> bool {
        match self.assets.get_mut(index) {
            Some(asset) => asset.record_use(kind, id),
            None => false,
        }
    }
}
