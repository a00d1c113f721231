//! In-memory `DocumentStore` for router tests. Honors the same key semantics
//! and newest-first ordering as the MongoDB store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bson::{oid::ObjectId, Bson, Document};

use crate::store::{
    Collection, DocumentStore, RecordKey, StoreError, StoreStatus, CREATED_AT_FIELD,
    NATIVE_ID_FIELD,
};

#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<Collection, Vec<Document>>>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that behaves like an unreachable database.
    pub fn offline() -> Self {
        let store = Self::default();
        store.offline.store(true, Ordering::SeqCst);
        store
    }

    /// Inserts a document verbatim, bypassing id assignment. Used to seed
    /// records that only carry an opaque `id`.
    pub fn seed(&self, collection: Collection, doc: Document) {
        self.collections
            .lock()
            .unwrap()
            .entry(collection)
            .or_default()
            .push(doc);
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable)
        } else {
            Ok(())
        }
    }
}

fn matches(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(k, v)| doc.get(k) == Some(v))
}

/// Position of the first document matched by the key's filters, in filter order.
fn locate(docs: &[Document], key: &RecordKey) -> Option<usize> {
    key.filters()
        .iter()
        .find_map(|filter| docs.iter().position(|d| matches(d, filter)))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn status(&self) -> StoreStatus {
        match self.check_online() {
            Ok(()) => StoreStatus::Connected,
            Err(_) => StoreStatus::Disconnected,
        }
    }

    async fn list(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<Vec<Document>, StoreError> {
        self.check_online()?;
        let guard = self.collections.lock().unwrap();
        let mut docs: Vec<Document> = guard
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| matches(d, &filter)).cloned().collect())
            .unwrap_or_default();
        docs.sort_by(|a, b| {
            let created = |d: &Document| match d.get(CREATED_AT_FIELD) {
                Some(Bson::DateTime(dt)) => dt.timestamp_millis(),
                _ => i64::MIN,
            };
            created(b).cmp(&created(a))
        });
        Ok(docs)
    }

    async fn insert(
        &self,
        collection: Collection,
        mut doc: Document,
    ) -> Result<Document, StoreError> {
        self.check_online()?;
        doc.insert(NATIVE_ID_FIELD, ObjectId::new());
        self.seed(collection, doc.clone());
        Ok(doc)
    }

    async fn find(
        &self,
        collection: Collection,
        key: &RecordKey,
    ) -> Result<Option<Document>, StoreError> {
        self.check_online()?;
        let guard = self.collections.lock().unwrap();
        Ok(guard
            .get(&collection)
            .and_then(|docs| locate(docs, key).map(|i| docs[i].clone())))
    }

    async fn update(
        &self,
        collection: Collection,
        key: &RecordKey,
        changes: Document,
    ) -> Result<Option<Document>, StoreError> {
        self.check_online()?;
        let mut guard = self.collections.lock().unwrap();
        let Some(docs) = guard.get_mut(&collection) else {
            return Ok(None);
        };
        let Some(i) = locate(docs, key) else {
            return Ok(None);
        };
        for (k, v) in changes {
            docs[i].insert(k, v);
        }
        Ok(Some(docs[i].clone()))
    }

    async fn delete(&self, collection: Collection, key: &RecordKey) -> Result<bool, StoreError> {
        self.check_online()?;
        let mut guard = self.collections.lock().unwrap();
        let Some(docs) = guard.get_mut(&collection) else {
            return Ok(false);
        };
        match locate(docs, key) {
            Some(i) => {
                docs.remove(i);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[tokio::test]
    async fn test_opaque_key_falls_back_after_native_miss() {
        let store = MemoryStore::new();
        // An opaque id that happens to look native must still resolve via `id`.
        let raw = "aaaaaaaaaaaaaaaaaaaaaaaa";
        store.seed(Collection::Resumes, doc! { "id": raw, "title": "Legacy" });

        let found = store
            .find(Collection::Resumes, &RecordKey::parse(raw))
            .await
            .unwrap()
            .expect("legacy record should resolve by opaque id");
        assert_eq!(found.get_str("title").unwrap(), "Legacy");
    }

    #[tokio::test]
    async fn test_offline_store_reports_unavailable() {
        let store = MemoryStore::offline();
        assert_eq!(store.status().await, StoreStatus::Disconnected);
        let err = store
            .list(Collection::Resumes, Document::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable));
    }
}
