//! Query API for the entity index.
//!
//! Predicates compose as a logical AND. Sorting is stable, and the limit is
//! applied after filtering and sorting.

use serde::Serialize;
use serde_json::Value;

use crate::value::{compare_values, values_equal};
use crate::{CollectionKind, EntityIndex, Record};

/// One query result.
#[derive(Debug, Clone, Serialize)]
pub struct QueryHit<'a> {
    #[serde(rename = "type")]
    pub kind: CollectionKind,
    pub id: u32,
    pub name: String,
    #[serde(rename = "data")]
    pub record: &'a Record,
}

impl<'a> QueryHit<'a> {
    fn new(record: &'a Record) -> Self {
        Self {
            kind: record.kind(),
            id: record.id(),
            name: record.display_name().into_owned(),
            record,
        }
    }
}

/// Query builder for record searches.
///
/// # Example
///
/// ```no_run
/// use rpgdex_index::{CollectionKind, EntityIndex, Query};
/// use rpgdex_common::LogFacade;
///
/// let index = EntityIndex::open("MyGame", &LogFacade::default())?;
///
/// let hits = Query::new(&index)
///     .kind(CollectionKind::Enemy)
///     .id_range(Some(5), Some(10))
///     .order_by("exp")
///     .limit(3)
///     .run();
///
/// for hit in hits {
///     println!("{} {}: {}", hit.kind, hit.id, hit.name);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Query<'a> {
    index: &'a EntityIndex,
    kinds: Option<Vec<CollectionKind>>,
    min_id: Option<u32>,
    max_id: Option<u32>,
    name_contains: Option<String>,
    has_property: Option<String>,
    where_eq: Vec<(String, Value)>,
    order_by: Option<String>,
    limit: Option<usize>,
}

impl<'a> Query<'a> {
    /// Create a new query over every type.
    pub fn new(index: &'a EntityIndex) -> Self {
        Self {
            index,
            kinds: None,
            min_id: None,
            max_id: None,
            name_contains: None,
            has_property: None,
            where_eq: Vec::new(),
            order_by: None,
            limit: None,
        }
    }

    /// Restrict to `kind`. Repeated calls widen the type set.
    pub fn kind(mut self, kind: CollectionKind) -> Self {
        let kinds = self.kinds.get_or_insert_with(Vec::new);
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
        self
    }

    pub fn kinds(mut self, kinds: impl IntoIterator<Item = CollectionKind>) -> Self {
        for kind in kinds {
            self = self.kind(kind);
        }
        self
    }

    /// Restrict to the named types.
    ///
    /// Unknown names are ignored. If none of them is known the type set is
    /// empty and the query matches nothing.
    pub fn kind_names<S: AsRef<str>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.kinds.get_or_insert_with(Vec::new);
        for name in names {
            if let Some(kind) = CollectionKind::parse(name.as_ref()) {
                self = self.kind(kind);
            }
        }
        self
    }

    /// Inclusive id bounds; `None` leaves that side open.
    pub fn id_range(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.min_id = min;
        self.max_id = max;
        self
    }

    /// Case-insensitive substring on the display name.
    ///
    /// Records without a name are matched against an empty string.
    pub fn name_contains(mut self, needle: &str) -> Self {
        self.name_contains = Some(needle.to_lowercase());
        self
    }

    /// Require the payload to have `field`.
    pub fn has_property(mut self, field: &str) -> Self {
        self.has_property = Some(field.to_string());
        self
    }

    /// Require `field == value`. Multiple constraints all apply.
    pub fn where_eq(mut self, field: &str, value: Value) -> Self {
        self.where_eq.push((field.to_string(), value));
        self
    }

    /// Sort by the payload field, ties kept in input order.
    pub fn order_by(mut self, field: &str) -> Self {
        self.order_by = Some(field.to_string());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, record: &Record) -> bool {
        if let Some(min) = self.min_id {
            if record.id() < min {
                return false;
            }
        }
        if let Some(max) = self.max_id {
            if record.id() > max {
                return false;
            }
        }

        if let Some(ref needle) = self.name_contains {
            let name = record.name().unwrap_or("").to_lowercase();
            if !name.contains(needle.as_str()) {
                return false;
            }
        }

        if let Some(ref field) = self.has_property {
            if !record.has_property(field) {
                return false;
            }
        }

        self.where_eq.iter().all(|(field, expected)| {
            record
                .get(field)
                .is_some_and(|actual| values_equal(actual, expected))
        })
    }

    /// Execute the query.
    pub fn run(self) -> Vec<QueryHit<'a>> {
        let index = self.index;
        let kinds: Vec<CollectionKind> = match self.kinds {
            Some(ref kinds) => CollectionKind::ALL
                .into_iter()
                .filter(|k| kinds.contains(k))
                .collect(),
            None => CollectionKind::ALL.to_vec(),
        };

        let mut records: Vec<&'a Record> = kinds
            .into_iter()
            .flat_map(|kind| index.collection(kind).iter())
            .filter(|record| self.matches(record))
            .collect();

        if let Some(ref field) = self.order_by {
            records.sort_by(|a, b| compare_values(a.get(field), b.get(field)));
        }

        if let Some(limit) = self.limit {
            records.truncate(limit);
        }

        records.into_iter().map(QueryHit::new).collect()
    }

    /// Execute the query and return the first result.
    pub fn first(self) -> Option<QueryHit<'a>> {
        self.run().into_iter().next()
    }

    /// Execute the query and count results.
    pub fn count(self) -> usize {
        self.run().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Collection;
    use serde_json::json;

    fn collection(kind: CollectionKind, items: Value) -> Collection {
        let Value::Array(items) = items else {
            unreachable!()
        };
        Collection::from_records(
            kind,
            items.into_iter().filter_map(|v| Record::from_value(kind, v)),
        )
    }

    fn sample() -> EntityIndex {
        EntityIndex::from_collections([
            collection(
                CollectionKind::Actor,
                json!([
                    {"id": 1, "name": "Hero", "classId": 1, "initialLevel": 5},
                    {"id": 2, "name": "Mage", "classId": 2, "initialLevel": 3},
                ]),
            ),
            collection(
                CollectionKind::Enemy,
                json!([
                    {"id": 1, "name": "Slime", "exp": 10, "gold": 5},
                    {"id": 6, "name": "Bat", "exp": 30, "gold": 5},
                    {"id": 12, "exp": 10},
                ]),
            ),
            collection(
                CollectionKind::Item,
                json!([{"id": 1, "name": "Potion", "description": "Heals", "itypeId": 1}]),
            ),
        ])
    }

    fn ids(hits: &[QueryHit<'_>]) -> Vec<(CollectionKind, u32)> {
        hits.iter().map(|h| (h.kind, h.id)).collect()
    }

    #[test]
    fn test_no_type_filter_searches_everything() {
        let index = sample();
        assert_eq!(Query::new(&index).count(), 6);
    }

    #[test]
    fn test_type_filter_restricts() {
        let index = sample();
        let hits = Query::new(&index).kind(CollectionKind::Item).run();
        assert_eq!(ids(&hits), vec![(CollectionKind::Item, 1)]);
    }

    #[test]
    fn test_unknown_type_names_are_ignored() {
        let index = sample();
        let hits = Query::new(&index).kind_names(["monster", "enemy"]).run();
        assert_eq!(hits.len(), 3);

        assert_eq!(Query::new(&index).kind_names(["monster"]).count(), 0);
    }

    #[test]
    fn test_id_range_is_inclusive() {
        let index = sample();
        let hits = Query::new(&index)
            .kind(CollectionKind::Enemy)
            .id_range(Some(5), Some(10))
            .run();
        assert_eq!(ids(&hits), vec![(CollectionKind::Enemy, 6)]);

        let hits = Query::new(&index)
            .kind(CollectionKind::Enemy)
            .id_range(Some(6), Some(12))
            .run();
        assert_eq!(hits.len(), 2);

        let hits = Query::new(&index)
            .kind(CollectionKind::Enemy)
            .id_range(None, Some(6))
            .run();
        assert_eq!(ids(&hits), vec![(CollectionKind::Enemy, 1), (CollectionKind::Enemy, 6)]);
    }

    #[test]
    fn test_name_filter_skips_unnamed_records() {
        let index = sample();
        let hits = Query::new(&index).name_contains("A").run();
        assert_eq!(
            ids(&hits),
            vec![(CollectionKind::Actor, 2), (CollectionKind::Enemy, 6)]
        );

        let hits = Query::new(&index).kind(CollectionKind::Enemy).name_contains("").run();
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn test_has_property_and_where() {
        let index = sample();
        assert_eq!(Query::new(&index).has_property("exp").count(), 3);

        let hits = Query::new(&index)
            .where_eq("exp", json!(10))
            .where_eq("gold", json!(5.0))
            .run();
        assert_eq!(ids(&hits), vec![(CollectionKind::Enemy, 1)]);
    }

    #[test]
    fn test_sort_is_stable_and_limit_applies_after() {
        let index = sample();
        let hits = Query::new(&index)
            .kind(CollectionKind::Enemy)
            .order_by("exp")
            .run();
        assert_eq!(
            ids(&hits),
            vec![
                (CollectionKind::Enemy, 1),
                (CollectionKind::Enemy, 12),
                (CollectionKind::Enemy, 6),
            ]
        );

        let hits = Query::new(&index)
            .kind(CollectionKind::Enemy)
            .order_by("exp")
            .limit(1)
            .run();
        assert_eq!(ids(&hits), vec![(CollectionKind::Enemy, 1)]);

        // Bat comes after Slime in input order but sorts ahead of it
        let hits = Query::new(&index).has_property("exp").order_by("name").limit(2).run();
        assert_eq!(ids(&hits), vec![(CollectionKind::Enemy, 6), (CollectionKind::Enemy, 1)]);
    }

    #[test]
    fn test_hit_name_falls_back() {
        let index = sample();
        let hit = Query::new(&index)
            .kind(CollectionKind::Enemy)
            .id_range(Some(12), None)
            .first()
            .unwrap();
        assert_eq!(hit.name, "enemy 12");
    }

    #[test]
    fn test_hit_serializes_payload_as_data() {
        let index = sample();
        let hit = Query::new(&index).kind(CollectionKind::Item).first().unwrap();
        let json = serde_json::to_value(&hit).unwrap();
        assert_eq!(json["type"], "item");
        assert_eq!(json["data"]["description"], "Heals");
    }
}
