//! Usage cross-referencer.
//!
//! Matches scanned assets against the reference fields each record type
//! exposes. The fields are an explicit table below; nothing is inferred from
//! key names. Image references hold a file stem and match `<stem>.png`
//! exactly within one category, or within one directory when the category
//! spans several (the two battleback layers). Audio references hold a name that matches
//! every audio file starting with it, so all format variants of a track count
//! as used.
//!
//! Master collections (actors, enemies, tilesets, the map list) that fail to
//! parse contribute no matches and produce a warning. A missing or broken map
//! file only skips that map.

use std::path::PathBuf;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde_json::{Map, Value};

use rpgdex_common::{read_collection, read_document, Logger, Project};
use rpgdex_index::{load_collection, Collection, CollectionKind};

use crate::{AssetCategory, AssetUniverse, ConsumerKind};

/// A record field holding the stem of an image file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRef {
    pub field: &'static str,
    pub category: AssetCategory,
    /// Directory the file must sit in, relative to the project root.
    pub dir: Option<&'static str>,
}

const fn image_ref(field: &'static str, category: AssetCategory) -> ImageRef {
    ImageRef { field, category, dir: None }
}

const fn dir_ref(field: &'static str, category: AssetCategory, dir: &'static str) -> ImageRef {
    ImageRef { field, category, dir: Some(dir) }
}

pub const ACTOR_REFS: &[ImageRef] = &[
    image_ref("characterName", AssetCategory::Character),
    image_ref("faceName", AssetCategory::Face),
    image_ref("battlerName", AssetCategory::SvActor),
];

pub const ENEMY_REFS: &[ImageRef] = &[image_ref("battlerName", AssetCategory::Enemy)];

pub const MAP_IMAGE_REFS: &[ImageRef] = &[
    dir_ref("battleback1Name", AssetCategory::Battleback, "img/battlebacks1"),
    dir_ref("battleback2Name", AssetCategory::Battleback, "img/battlebacks2"),
];

/// Map fields holding an audio object whose `name` is matched by prefix.
pub const MAP_AUDIO_REFS: &[&str] = &["bgm", "bgs"];

/// Tileset field listing the sheet stems a map using it draws from.
pub const TILESET_NAMES_FIELD: &str = "tilesetNames";

/// The map list; element `i` describes map `i`.
pub const MAP_INFOS_FILE: &str = "MapInfos.json";

const IMAGE_EXTENSION: &str = "png";

/// Data file holding map `id`, e.g. `Map007.json`.
pub fn map_file_name(id: u32) -> String {
    format!("Map{id:03}.json")
}

/// Annotate `universe` with every use found in `project`'s data.
///
/// Returns the warnings raised along the way; each is also sent to `logger`.
/// Running this twice over the same inputs leaves the universe unchanged the
/// second time.
pub fn cross_reference(
    project: &Project,
    universe: &mut AssetUniverse,
    logger: &dyn Logger,
) -> Vec<String> {
    let mut xref = CrossReferencer {
        universe,
        logger,
        warnings: Vec::new(),
        recorded: 0,
    };

    let actors = xref.load(project, CollectionKind::Actor);
    xref.records(&actors, ACTOR_REFS, ConsumerKind::Actor);

    let enemies = xref.load(project, CollectionKind::Enemy);
    xref.records(&enemies, ENEMY_REFS, ConsumerKind::Enemy);

    let tilesets = xref.load(project, CollectionKind::Tileset);
    xref.maps(project, &tilesets);

    logger.debug(&format!("Recorded {} asset uses", xref.recorded));
    xref.warnings
}

struct CrossReferencer<'a> {
    universe: &'a mut AssetUniverse,
    logger: &'a dyn Logger,
    warnings: Vec<String>,
    recorded: usize,
}

impl CrossReferencer<'_> {
    fn warn(&mut self, message: String) {
        self.logger.warn(&message);
        self.warnings.push(message);
    }

    fn load(&mut self, project: &Project, kind: CollectionKind) -> Collection {
        match load_collection(project, kind, self.logger) {
            Ok(collection) => collection,
            Err(e) => {
                self.warn(format!("{} unusable, no {} references counted: {e}", kind.file_name(), kind));
                Collection::new(kind)
            }
        }
    }

    fn records(&mut self, collection: &Collection, refs: &[ImageRef], consumer: ConsumerKind) {
        for record in collection.iter() {
            for image in refs {
                if let Some(stem) = record.get_str(image.field) {
                    self.match_image(image, stem, consumer, record.id());
                }
            }
        }
    }

    fn match_image(&mut self, image: &ImageRef, stem: &str, consumer: ConsumerKind, id: u32) {
        if stem.is_empty() {
            return;
        }
        let file_name = format!("{stem}.{IMAGE_EXTENSION}");
        let found = match image.dir {
            Some(dir) => self.universe.find_in_dir(image.category, dir, &file_name),
            None => self.universe.find_exact(image.category, &file_name),
        };
        if let Some(index) = found {
            self.record(index, consumer, id);
        }
    }

    fn match_audio(&mut self, prefix: &str, consumer: ConsumerKind, id: u32) {
        if prefix.is_empty() {
            return;
        }
        for index in self.universe.find_prefixed(AssetCategory::Audio, prefix) {
            self.record(index, consumer, id);
        }
    }

    fn record(&mut self, index: usize, consumer: ConsumerKind, id: u32) {
        if self.universe.record_use(index, consumer, id) {
            self.recorded += 1;
        }
    }

    fn map_ids(&mut self, project: &Project) -> Vec<u32> {
        let path = project.data_file(MAP_INFOS_FILE);
        match read_collection(&path) {
            Ok(infos) => infos
                .iter()
                .enumerate()
                .filter(|(_, info)| info.is_object())
                .filter_map(|(i, _)| u32::try_from(i).ok())
                .collect(),
            Err(e) if e.is_not_found() => {
                self.logger.debug(&format!("{} absent, no maps to check", path.display()));
                Vec::new()
            }
            Err(e) => {
                self.warn(format!("{MAP_INFOS_FILE} unusable, no map references counted: {e}"));
                Vec::new()
            }
        }
    }

    fn maps(&mut self, project: &Project, tilesets: &Collection) {
        let files: Vec<(u32, PathBuf)> = self
            .map_ids(project)
            .into_iter()
            .map(|id| (id, project.data_file(&map_file_name(id))))
            .collect();

        #[cfg(feature = "parallel")]
        let documents: Vec<_> = files
            .into_par_iter()
            .map(|(id, path)| {
                let document = read_document(&path);
                (id, path, document)
            })
            .collect();

        #[cfg(not(feature = "parallel"))]
        let documents: Vec<_> = files
            .into_iter()
            .map(|(id, path)| {
                let document = read_document(&path);
                (id, path, document)
            })
            .collect();

        for (id, path, document) in documents {
            match document {
                Ok(Value::Object(map)) => self.map(id, &map, tilesets),
                Ok(_) => self.warn(format!(
                    "{}: expected a JSON object, skipping map {id}",
                    path.display()
                )),
                Err(e) if e.is_not_found() => {
                    self.logger.debug(&format!("{} absent, skipping map {id}", path.display()));
                }
                Err(e) => self.warn(format!("Skipping map {id}: {e}")),
            }
        }
    }

    fn map(&mut self, id: u32, map: &Map<String, Value>, tilesets: &Collection) {
        let tileset_id = map.get("tilesetId").and_then(Value::as_u64).unwrap_or(0);
        if tileset_id != 0 {
            match u32::try_from(tileset_id).ok().and_then(|tid| tilesets.get(tid)) {
                Some(tileset) => {
                    let sheet = image_ref(TILESET_NAMES_FIELD, AssetCategory::Tileset);
                    for stem in tileset.get_str_list(TILESET_NAMES_FIELD) {
                        self.match_image(&sheet, stem, ConsumerKind::Map, id);
                    }
                }
                None => self
                    .logger
                    .debug(&format!("Map {id}: tileset {tileset_id} not found")),
            }
        }

        for image in MAP_IMAGE_REFS {
            if let Some(stem) = map.get(image.field).and_then(Value::as_str) {
                self.match_image(image, stem, ConsumerKind::Map, id);
            }
        }

        for field in MAP_AUDIO_REFS {
            let name = map
                .get(*field)
                .and_then(|audio| audio.get("name"))
                .and_then(Value::as_str);
            if let Some(name) = name {
                self.match_audio(name, ConsumerKind::Map, id);
            }
        }
    }
}
