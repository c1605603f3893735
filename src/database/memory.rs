use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{strip_id, Collection, Document, DocumentStore};
use crate::error::AppResult;

/// Process-local store. Documents are kept per collection in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<(Uuid, Document)>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: Collection, id: Uuid, document: Document) -> AppResult<()> {
        let mut guard = self.collections.write().await;
        guard.entry(collection).or_default().push((id, document));
        Ok(())
    }

    async fn find_all(&self, collection: Collection) -> AppResult<Vec<Document>> {
        let guard = self.collections.read().await;
        Ok(guard
            .get(&collection)
            .map(|docs| docs.iter().map(|(_, doc)| doc.clone()).collect())
            .unwrap_or_default())
    }

    async fn find_by_id(&self, collection: Collection, id: Uuid) -> AppResult<Option<Document>> {
        let guard = self.collections.read().await;
        Ok(guard
            .get(&collection)
            .and_then(|docs| docs.iter().find(|(doc_id, _)| *doc_id == id))
            .map(|(_, doc)| doc.clone()))
    }

    async fn find_by_field(
        &self,
        collection: Collection,
        field: &'static str,
        value: &str,
    ) -> AppResult<Vec<Document>> {
        let guard = self.collections.read().await;
        Ok(guard
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, doc)| matches!(doc.get(field), Some(Value::String(s)) if s == value))
                    .map(|(_, doc)| doc.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn count(&self, collection: Collection) -> AppResult<u64> {
        let guard = self.collections.read().await;
        Ok(guard.get(&collection).map_or(0, |docs| docs.len() as u64))
    }

    async fn update(&self, collection: Collection, id: Uuid, patch: Document) -> AppResult<bool> {
        let patch = strip_id(patch);
        let mut guard = self.collections.write().await;
        let Some(doc) = guard
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|(doc_id, _)| *doc_id == id))
            .map(|(_, doc)| doc)
        else {
            return Ok(false);
        };
        for (key, value) in patch {
            doc.insert(key, value);
        }
        Ok(true)
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> AppResult<bool> {
        let mut guard = self.collections.write().await;
        let Some(docs) = guard.get_mut(&collection) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|(doc_id, _)| *doc_id != id);
        Ok(docs.len() < before)
    }

    async fn close(&self) {}
}
