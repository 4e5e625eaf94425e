//! In-memory record store backend.
//!
//! Used by tests and local development. Collections are insertion-ordered
//! vectors of JSON documents behind a single async `RwLock`; every
//! operation takes the lock once and never holds it across awaits.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

use super::{FieldPatch, Filter, Record, RecordStore, Sort, StoreError};

#[derive(Debug, Clone)]
struct Document {
    id: String,
    body: Value,
}

/// Insertion-ordered in-memory document store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<&'static str, Vec<Document>>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn decode<R: Record>(doc: &Document) -> Result<R, StoreError> {
        serde_json::from_value(doc.body.clone()).map_err(|e| StoreError::corrupt(R::COLLECTION, &e))
    }
}

impl RecordStore for MemoryStore {
    async fn find_all<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        let collections = self.collections.read().await;
        collections
            .get(R::COLLECTION)
            .into_iter()
            .flatten()
            .map(Self::decode)
            .collect()
    }

    async fn find_by_id<R: Record>(&self, id: &str) -> Result<Option<R>, StoreError> {
        let collections = self.collections.read().await;
        collections
            .get(R::COLLECTION)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .map(Self::decode)
            .transpose()
    }

    async fn find_one<R: Record>(&self, filter: &Filter) -> Result<Option<R>, StoreError> {
        let collections = self.collections.read().await;
        collections
            .get(R::COLLECTION)
            .and_then(|docs| docs.iter().find(|d| filter.matches(&d.body)))
            .map(Self::decode)
            .transpose()
    }

    async fn find_many<R: Record>(
        &self,
        filter: &Filter,
        sort: Option<&Sort>,
    ) -> Result<Vec<R>, StoreError> {
        let collections = self.collections.read().await;
        let mut matched: Vec<&Document> = collections
            .get(R::COLLECTION)
            .into_iter()
            .flatten()
            .filter(|d| filter.matches(&d.body))
            .collect();

        if let Some(sort) = sort {
            // Stable sort: scan order breaks ties.
            matched.sort_by(|a, b| sort.compare(&a.body, &b.body));
        }

        matched.into_iter().map(Self::decode).collect()
    }

    async fn insert<R: Record>(&self, record: &R) -> Result<(), StoreError> {
        let body =
            serde_json::to_value(record).map_err(|e| StoreError::corrupt(R::COLLECTION, &e))?;
        let id = record.record_id().to_owned();

        let mut collections = self.collections.write().await;
        let docs = collections.entry(R::COLLECTION).or_default();
        if docs.iter().any(|d| d.id == id) {
            return Err(StoreError::DuplicateId(id));
        }

        docs.push(Document { id, body });
        Ok(())
    }

    async fn update_fields<R: Record>(
        &self,
        id: &str,
        patch: &FieldPatch,
    ) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(doc) = collections
            .get_mut(R::COLLECTION)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
        else {
            return Ok(0);
        };

        patch.apply(&mut doc.body);
        Ok(1)
    }

    async fn delete_by_id<R: Record>(&self, id: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(R::COLLECTION) {
            docs.retain(|d| d.id != id);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Widget {
        id: String,
        name: String,
        size: Option<f64>,
    }

    impl Record for Widget {
        const COLLECTION: &'static str = "widgets";

        fn record_id(&self) -> &str {
            &self.id
        }
    }

    fn widget(id: &str, name: &str, size: Option<f64>) -> Widget {
        Widget {
            id: id.to_owned(),
            name: name.to_owned(),
            size,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_by_id() {
        let store = MemoryStore::new();
        store.insert(&widget("w1", "bolt", Some(3.0))).await.unwrap();

        let found: Option<Widget> = store.find_by_id("w1").await.unwrap();
        assert_eq!(found.unwrap().name, "bolt");

        let absent: Option<Widget> = store.find_by_id("nope").await.unwrap();
        assert!(absent.is_none());
    }

    #[tokio::test]
    async fn test_insert_duplicate_id_fails() {
        let store = MemoryStore::new();
        store.insert(&widget("w1", "bolt", None)).await.unwrap();

        let err = store.insert(&widget("w1", "nut", None)).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(id) if id == "w1"));
    }

    #[tokio::test]
    async fn test_find_all_preserves_insertion_order() {
        let store = MemoryStore::new();
        for name in ["a", "b", "c"] {
            store.insert(&widget(name, name, None)).await.unwrap();
        }

        let all: Vec<Widget> = store.find_all().await.unwrap();
        let names: Vec<&str> = all.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_find_many_with_filter_and_sort() {
        let store = MemoryStore::new();
        store.insert(&widget("w1", "bolt", Some(10.0))).await.unwrap();
        store.insert(&widget("w2", "bolt", Some(5.0))).await.unwrap();
        store.insert(&widget("w3", "nut", Some(1.0))).await.unwrap();

        let sort = Sort::descending("size");
        let bolts: Vec<Widget> = store
            .find_many(&Filter::eq("name", "bolt"), Some(&sort))
            .await
            .unwrap();

        let ids: Vec<&str> = bolts.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["w1", "w2"]);
    }

    #[tokio::test]
    async fn test_update_fields_patches_in_place() {
        let store = MemoryStore::new();
        store.insert(&widget("w1", "bolt", Some(3.0))).await.unwrap();

        let mut patch = FieldPatch::new();
        patch.set("name", "hex bolt");
        let matched = store.update_fields::<Widget>("w1", &patch).await.unwrap();
        assert_eq!(matched, 1);

        let updated: Widget = store.find_by_id("w1").await.unwrap().unwrap();
        assert_eq!(updated.name, "hex bolt");
        assert_eq!(updated.size, Some(3.0));
    }

    #[tokio::test]
    async fn test_update_fields_missing_id_matches_zero() {
        let store = MemoryStore::new();
        let mut patch = FieldPatch::new();
        patch.set("name", "ghost");
        let matched = store.update_fields::<Widget>("nope", &patch).await.unwrap();
        assert_eq!(matched, 0);
    }

    #[tokio::test]
    async fn test_delete_is_noop_when_absent() {
        let store = MemoryStore::new();
        store.insert(&widget("w1", "bolt", None)).await.unwrap();

        store.delete_by_id::<Widget>("nope").await.unwrap();
        store.delete_by_id::<Widget>("w1").await.unwrap();
        store.delete_by_id::<Widget>("w1").await.unwrap();

        let all: Vec<Widget> = store.find_all().await.unwrap();
        assert!(all.is_empty());
    }
}
