//! Collection loader.

use rpgdex_common::{read_collection, Logger, Project};

use crate::{Collection, CollectionKind, Record, Result};

/// Load one collection from the project's data directory.
///
/// A missing file yields an empty collection. A file that exists but is not
/// a JSON array is an error, since that means corruption rather than
/// absence.
pub fn load_collection(
    project: &Project,
    kind: CollectionKind,
    logger: &dyn Logger,
) -> Result<Collection> {
    let path = project.data_file(kind.file_name());

    let items = match read_collection(&path) {
        Ok(items) => items,
        Err(e) if e.is_not_found() => {
            logger.debug(&format!("{} absent, treating {} as empty", path.display(), kind));
            return Ok(Collection::new(kind));
        }
        Err(e) => return Err(e.into()),
    };

    let mut collection = Collection::new(kind);
    let mut skipped = 0usize;

    for item in items {
        if item.is_null() {
            continue;
        }
        let Some(record) = Record::from_value(kind, item) else {
            skipped += 1;
            continue;
        };
        let id = record.id();
        if collection.insert(record).is_some() {
            logger.warn(&format!(
                "{}: duplicate id {id}, keeping the later entry",
                kind.file_name()
            ));
        }
    }

    if skipped > 0 {
        logger.debug(&format!(
            "{}: skipped {skipped} entries without a usable id",
            kind.file_name()
        ));
    }

    Ok(collection)
}
