pub mod analytics;
pub mod lifecycle;

use std::marker::PhantomData;

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    database::{Database, Document},
    error::{AppError, AppResult},
    models::{
        quality_check::ITEM_REFERENCE_FIELD, Entity, MutableEntity, QualityCheck, UPDATED_AT_FIELD,
    },
};

pub use analytics::Analytics;
pub use lifecycle::Lifecycle;

/// Typed CRUD over one collection.
///
/// Nothing beyond presence is validated: whatever the caller sends is stored
/// once defaults are filled in.
pub struct Repository<E> {
    db: Database,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            _entity: PhantomData,
        }
    }
}

pub(crate) fn encode<T: serde::Serialize>(value: &T) -> AppResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(AppError::Store(format!("expected a JSON object, got {}", other))),
    }
}

pub(crate) fn decode<E: Entity>(document: Document) -> AppResult<E> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

impl<E: Entity> Repository<E> {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    pub async fn list(&self) -> AppResult<Vec<E>> {
        self.db
            .find_all(E::COLLECTION)
            .await?
            .into_iter()
            .map(decode::<E>)
            .collect()
    }

    pub async fn find(&self, id: Uuid) -> AppResult<E> {
        let document = self
            .db
            .find_by_id(E::COLLECTION, id)
            .await?
            .ok_or_else(|| AppError::not_found(E::LABEL))?;
        decode(document)
    }

    pub async fn count(&self) -> AppResult<u64> {
        self.db.count(E::COLLECTION).await
    }

    /// Assigns a fresh id, stamps the creation timestamps and stores the
    /// record.
    pub async fn create(&self, new: E::New) -> AppResult<E> {
        let record = E::from_new(new, Uuid::new_v4(), Utc::now());
        self.insert(&record).await?;
        Ok(record)
    }

    /// Stores an already-built record under its own id.
    pub async fn insert(&self, record: &E) -> AppResult<()> {
        self.db
            .insert(E::COLLECTION, record.id(), encode(record)?)
            .await
    }
}

impl<E: MutableEntity> Repository<E> {
    /// Merges the present patch fields and bumps `updatedAt`. The stored id
    /// never changes.
    pub async fn update(&self, id: Uuid, patch: E::Patch) -> AppResult<()> {
        let mut fields = encode(&patch)?;
        fields.insert(
            UPDATED_AT_FIELD.to_string(),
            serde_json::to_value(Utc::now())?,
        );

        if self.db.update(E::COLLECTION, id, fields).await? {
            Ok(())
        } else {
            Err(AppError::not_found(E::LABEL))
        }
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if self.db.delete(E::COLLECTION, id).await? {
            Ok(())
        } else {
            Err(AppError::not_found(E::LABEL))
        }
    }
}

impl Repository<QualityCheck> {
    /// Checks whose `itemReference` matches exactly.
    pub async fn for_item(&self, item_reference: &str) -> AppResult<Vec<QualityCheck>> {
        self.db
            .find_by_field(QualityCheck::COLLECTION, ITEM_REFERENCE_FIELD, item_reference)
            .await?
            .into_iter()
            .map(decode::<QualityCheck>)
            .collect()
    }
}
