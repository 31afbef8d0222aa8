//! Records and collections.
//!
//! A [`Record`] keeps its full JSON object as an open payload, since every
//! collection type has its own schema. Typed accessors cover the fields
//! callers actually read.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::CollectionKind;

/// One entity of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    kind: CollectionKind,
    id: u32,
    payload: Map<String, Value>,
}

impl Record {
    /// Build a record from one collection element.
    ///
    /// Returns `None` for null slots, non-objects, and objects without a
    /// non-negative integer `id`.
    pub fn from_value(kind: CollectionKind, value: Value) -> Option<Self> {
        let Value::Object(payload) = value else {
            return None;
        };
        let id = payload
            .get("id")
            .and_then(Value::as_u64)
            .and_then(|id| u32::try_from(id).ok())?;
        Some(Self { kind, id, payload })
    }

    #[inline]
    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// The display name, if present and non-empty.
    pub fn name(&self) -> Option<&str> {
        self.get_str("name").filter(|name| !name.is_empty())
    }

    /// The name, or `"<type> <id>"` for unnamed records.
    pub fn display_name(&self) -> Cow<'_, str> {
        match self.name() {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(format!("{} {}", self.kind, self.id)),
        }
    }

    /// The raw attribute payload.
    #[inline]
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    #[inline]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.payload.get(field)
    }

    #[inline]
    pub fn has_property(&self, field: &str) -> bool {
        self.payload.contains_key(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(Value::as_i64)
    }

    pub fn get_array(&self, field: &str) -> Option<&[Value]> {
        self.get(field).and_then(Value::as_array).map(Vec::as_slice)
    }

    /// String elements of an array field, skipping anything else.
    pub fn get_str_list(&self, field: &str) -> Vec<&str> {
        self.get_array(field)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.payload.serialize(serializer)
    }
}

/// Sparse id-keyed records of one type, in ascending id order.
#[derive(Debug, Clone)]
pub struct Collection {
    kind: CollectionKind,
    records: BTreeMap<u32, Record>,
}

impl Collection {
    pub fn new(kind: CollectionKind) -> Self {
        Self {
            kind,
            records: BTreeMap::new(),
        }
    }

    /// Build a collection from records, ignoring any of a different kind.
    pub fn from_records(kind: CollectionKind, records: impl IntoIterator<Item = Record>) -> Self {
        let mut collection = Self::new(kind);
        for record in records {
            if record.kind == kind {
                collection.insert(record);
            }
        }
        collection
    }

    #[inline]
    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    /// Insert a record, returning the one it replaced.
    pub(crate) fn insert(&mut self, record: Record) -> Option<Record> {
        self.records.insert(record.id, record)
    }

    #[inline]
    pub fn get(&self, id: u32) -> Option<&Record> {
        self.records.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_requires_object_with_id() {
        assert!(Record::from_value(CollectionKind::Item, Value::Null).is_none());
        assert!(Record::from_value(CollectionKind::Item, json!({"name": "Potion"})).is_none());
        assert!(Record::from_value(CollectionKind::Item, json!({"id": -1})).is_none());
        assert!(Record::from_value(CollectionKind::Item, json!({"id": "3"})).is_none());

        let record = Record::from_value(CollectionKind::Item, json!({"id": 3})).unwrap();
        assert_eq!(record.id(), 3);
    }

    #[test]
    fn test_display_name_falls_back_for_empty_names() {
        let named = Record::from_value(CollectionKind::Enemy, json!({"id": 2, "name": "Bat"})).unwrap();
        assert_eq!(named.display_name(), "Bat");

        let blank = Record::from_value(CollectionKind::Enemy, json!({"id": 4, "name": ""})).unwrap();
        assert_eq!(blank.name(), None);
        assert_eq!(blank.display_name(), "enemy 4");
    }

    #[test]
    fn test_typed_accessors() {
        let record = Record::from_value(
            CollectionKind::Tileset,
            json!({"id": 1, "mode": 1, "tilesetNames": ["Outside_A1", "", 5]}),
        )
        .unwrap();

        assert_eq!(record.get_i64("mode"), Some(1));
        assert_eq!(record.get_str_list("tilesetNames"), vec!["Outside_A1", ""]);
        assert!(record.has_property("tilesetNames"));
        assert!(!record.has_property("flags"));
    }

    #[test]
    fn test_collection_orders_by_id() {
        let records = [5, 1, 3]
            .into_iter()
            .filter_map(|id| Record::from_value(CollectionKind::Skill, json!({"id": id})));
        let collection = Collection::from_records(CollectionKind::Skill, records);

        let ids: Vec<u32> = collection.iter().map(Record::id).collect();
        assert_eq!(ids, vec![1, 3, 5]);
    }
}
