//! WIP batch termination: complete (becomes a finished product) or cancel.
//!
//! Completion is two independent writes, insert then delete, with no
//! transaction around them. The ordering means a failure can duplicate a
//! batch but never lose it.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::Repository;
use crate::{
    database::Database,
    error::{AppError, AppResult},
    models::{finished_product::QUALITY_PENDING, FinishedProduct, WipBatch},
};

pub const SKU_PREFIX: &str = "FP-";

/// Builds the finished-product record a completed batch turns into.
pub fn finished_product_from(batch: &WipBatch, id: Uuid, now: DateTime<Utc>) -> FinishedProduct {
    FinishedProduct {
        id,
        name: batch
            .process_name
            .clone()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| batch.batch_number.clone()),
        sku: format!("{}{}", SKU_PREFIX, batch.batch_number),
        quantity: if batch.quantity == 0 { 1 } else { batch.quantity },
        batch_number: Some(batch.batch_number.clone()),
        manufacturing_date: Some(now.to_rfc3339()),
        quality_status: QUALITY_PENDING.to_string(),
        location: None,
        specifications: Some(format!("Completed from batch {}", batch.batch_number)),
        created_at: now,
        updated_at: now,
    }
}

#[derive(Clone)]
pub struct Lifecycle {
    wip: Repository<WipBatch>,
    products: Repository<FinishedProduct>,
}

impl Lifecycle {
    pub fn new(db: Database) -> Self {
        Self {
            wip: Repository::new(db.clone()),
            products: Repository::new(db),
        }
    }

    /// Active -> Completed.
    ///
    /// If the batch disappears between the read and the delete (a concurrent
    /// complete or cancel got there first) the product just inserted is
    /// removed again and `NotFound` is returned. If the delete fails outright
    /// the product is kept and the batch stays listed as WIP too.
    pub async fn complete(&self, wip_id: Uuid) -> AppResult<FinishedProduct> {
        let batch = self.wip.find(wip_id).await?;
        let product = finished_product_from(&batch, Uuid::new_v4(), Utc::now());

        self.products.insert(&product).await?;

        match self.wip.delete(wip_id).await {
            Ok(()) => {
                log::info!(
                    "Batch {} completed as finished product {} ({})",
                    batch.batch_number,
                    product.sku,
                    product.id
                );
                Ok(product)
            }
            Err(AppError::NotFound(msg)) => {
                log::warn!(
                    "Batch {} vanished during completion; rolling back product {}",
                    batch.batch_number,
                    product.id
                );
                if let Err(e) = self.products.delete(product.id).await {
                    log::error!(
                        "Failed to roll back product {} for batch {}: {}",
                        product.id,
                        batch.batch_number,
                        e
                    );
                }
                Err(AppError::NotFound(msg))
            }
            Err(e) => {
                log::warn!(
                    "Batch {} recorded as product {} but WIP delete failed: {}",
                    batch.batch_number,
                    product.id,
                    e
                );
                Err(e)
            }
        }
    }

    /// Active -> Cancelled. Nothing is produced.
    pub async fn cancel(&self, wip_id: Uuid) -> AppResult<()> {
        self.wip.delete(wip_id).await?;
        log::info!("WIP batch {} cancelled", wip_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::database::{Collection, Document, DocumentStore, MemoryStore};
    use crate::models::{Entity, NewWipBatch, WipBatchPatch};

    fn db() -> Database {
        Arc::new(MemoryStore::new())
    }

    async fn start(db: &Database, batch_number: &str, process: &str, quantity: i64) -> WipBatch {
        Repository::<WipBatch>::new(db.clone())
            .create(NewWipBatch {
                batch_number: Some(batch_number.into()),
                process_name: Some(process.into()),
                quantity: Some(quantity),
                ..Default::default()
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn complete_moves_batch_to_finished_products() {
        let db = db();
        let batch = start(&db, "B1", "Widget", 7).await;

        let product = Lifecycle::new(db.clone()).complete(batch.id).await.unwrap();
        assert_eq!(product.name, "Widget");
        assert_eq!(product.sku, "FP-B1");
        assert_eq!(product.quantity, 7);
        assert_eq!(product.quality_status, "pending");
        assert_eq!(product.batch_number.as_deref(), Some("B1"));

        let wip = Repository::<WipBatch>::new(db.clone()).list().await.unwrap();
        assert!(wip.is_empty());

        let products = Repository::<FinishedProduct>::new(db).list().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, product.id);
    }

    #[tokio::test]
    async fn zero_quantity_batch_completes_as_one_unit() {
        let db = db();
        let batch = start(&db, "B4", "Widget", 5).await;
        Repository::<WipBatch>::new(db.clone())
            .update(
                batch.id,
                WipBatchPatch {
                    quantity: Some(0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let product = Lifecycle::new(db).complete(batch.id).await.unwrap();
        assert_eq!(product.quantity, 1);
    }

    #[test]
    fn product_without_process_is_named_after_batch() {
        let batch = WipBatch::from_new(
            NewWipBatch {
                batch_number: Some("B5".into()),
                ..Default::default()
            },
            Uuid::new_v4(),
            Utc::now(),
        );
        let product = finished_product_from(&batch, Uuid::new_v4(), Utc::now());
        assert_eq!(product.name, "B5");
        assert_eq!(product.sku, "FP-B5");
    }

    #[test]
    fn completion_counts_as_made_today() {
        let batch = WipBatch::from_new(
            NewWipBatch {
                batch_number: Some("B3".into()),
                ..Default::default()
            },
            Uuid::new_v4(),
            Utc::now(),
        );
        let product = finished_product_from(&batch, Uuid::new_v4(), Utc::now());
        assert_eq!(
            product.manufacturing_day(),
            Some(chrono::Local::now().date_naive())
        );
    }

    #[tokio::test]
    async fn complete_unknown_batch_is_not_found_and_writes_nothing() {
        let db = db();
        let err = Lifecycle::new(db.clone()).complete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(db.count(Collection::FinishedProducts).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn cancel_deletes_without_product() {
        let db = db();
        let batch = start(&db, "B2", "Gear", 3).await;
        let lifecycle = Lifecycle::new(db.clone());

        lifecycle.cancel(batch.id).await.unwrap();
        assert_eq!(db.count(Collection::Wip).await.unwrap(), 0);
        assert_eq!(db.count(Collection::FinishedProducts).await.unwrap(), 0);

        let err = lifecycle.cancel(batch.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    /// Store whose WIP deletes return a fixed outcome, to observe what a
    /// completion leaves behind when the second write goes wrong.
    struct FlakyWipDelete(MemoryStore, fn() -> AppResult<bool>);

    #[async_trait]
    impl DocumentStore for FlakyWipDelete {
        async fn insert(&self, c: Collection, id: Uuid, d: Document) -> AppResult<()> {
            self.0.insert(c, id, d).await
        }
        async fn find_all(&self, c: Collection) -> AppResult<Vec<Document>> {
            self.0.find_all(c).await
        }
        async fn find_by_id(&self, c: Collection, id: Uuid) -> AppResult<Option<Document>> {
            self.0.find_by_id(c, id).await
        }
        async fn find_by_field(&self, c: Collection, f: &'static str, v: &str) -> AppResult<Vec<Document>> {
            self.0.find_by_field(c, f, v).await
        }
        async fn count(&self, c: Collection) -> AppResult<u64> {
            self.0.count(c).await
        }
        async fn update(&self, c: Collection, id: Uuid, p: Document) -> AppResult<bool> {
            self.0.update(c, id, p).await
        }
        async fn delete(&self, c: Collection, id: Uuid) -> AppResult<bool> {
            if c == Collection::Wip {
                return (self.1)();
            }
            self.0.delete(c, id).await
        }
        async fn close(&self) {}
    }

    #[tokio::test]
    async fn failed_delete_duplicates_rather_than_loses() {
        let db: Database = Arc::new(FlakyWipDelete(MemoryStore::new(), || {
            Err(AppError::Store("connection reset".into()))
        }));
        let batch = start(&db, "B9", "Widget", 2).await;

        let err = Lifecycle::new(db.clone()).complete(batch.id).await.unwrap_err();
        assert!(matches!(err, AppError::Store(_)));
        assert_eq!(db.count(Collection::Wip).await.unwrap(), 1);
        assert_eq!(db.count(Collection::FinishedProducts).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn lost_race_rolls_back_product() {
        let db: Database = Arc::new(FlakyWipDelete(MemoryStore::new(), || Ok(false)));
        let batch = start(&db, "B10", "Widget", 2).await;

        let err = Lifecycle::new(db.clone()).complete(batch.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(db.count(Collection::FinishedProducts).await.unwrap(), 0);
    }
}
