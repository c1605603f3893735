mod memory;
mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{config::Config, error::AppResult};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// A loosely-typed stored document: a JSON object keyed by field name.
pub type Document = Map<String, Value>;

/// Field holding the store-assigned identifier inside every document.
pub const ID_FIELD: &str = "_id";

pub type Database = Arc<dyn DocumentStore>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    RawMaterials,
    Processes,
    Wip,
    FinishedProducts,
    QualityChecks,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::RawMaterials => "rawMaterials",
            Collection::Processes => "processes",
            Collection::Wip => "wip",
            Collection::FinishedProducts => "finishedProducts",
            Collection::QualityChecks => "qualityChecks",
        }
    }
}

/// Document store contract shared by the PostgreSQL and in-memory back-ends.
///
/// Every call is a single independent round trip. Nothing spans more than one
/// document atomically; `update` is atomic for the one document it touches.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, collection: Collection, id: Uuid, document: Document) -> AppResult<()>;

    /// All documents of a collection, in insertion order.
    async fn find_all(&self, collection: Collection) -> AppResult<Vec<Document>>;

    async fn find_by_id(&self, collection: Collection, id: Uuid) -> AppResult<Option<Document>>;

    /// Documents whose top-level string `field` equals `value`.
    async fn find_by_field(
        &self,
        collection: Collection,
        field: &'static str,
        value: &str,
    ) -> AppResult<Vec<Document>>;

    async fn count(&self, collection: Collection) -> AppResult<u64>;

    /// Merges the top-level keys of `patch` into the stored document.
    /// Returns `false` when no document has that id. Any `_id` key in the
    /// patch is discarded.
    async fn update(&self, collection: Collection, id: Uuid, patch: Document) -> AppResult<bool>;

    /// Returns `false` when no document has that id.
    async fn delete(&self, collection: Collection, id: Uuid) -> AppResult<bool>;

    async fn close(&self);
}

pub async fn create_database(config: &Config) -> AppResult<Database> {
    match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url).await?;
            log::info!("Connected to PostgreSQL document store");
            Ok(Arc::new(store))
        }
        None => {
            log::warn!("DATABASE_URL not set; using in-memory store (data is lost on exit)");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

pub(crate) fn strip_id(mut patch: Document) -> Document {
    patch.remove(ID_FIELD);
    patch
}
