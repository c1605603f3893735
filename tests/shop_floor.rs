use std::sync::Arc;

use chrono::Local;
use rust_decimal::Decimal;
use shopfloor::{
    database::{Database, MemoryStore},
    error::AppError,
    models::{
        FinishedProduct, NewProcess, NewQualityCheck, NewRawMaterial, NewWipBatch, Process,
        QualityCheck, RawMaterial, RawMaterialPatch, WipBatch, WipBatchPatch,
    },
    services::{Analytics, Lifecycle, Repository},
};

fn store() -> Database {
    Arc::new(MemoryStore::new())
}

#[tokio::test]
async fn batch_runs_from_start_to_finished_goods() {
    let db = store();
    let processes = Repository::<Process>::new(db.clone());
    let wip = Repository::<WipBatch>::new(db.clone());
    let checks = Repository::<QualityCheck>::new(db.clone());
    let analytics = Analytics::new(db.clone());

    let process = processes
        .create(NewProcess {
            name: Some("Gearbox assembly".into()),
            output_product: Some("Gearbox".into()),
            estimated_duration: Some(6.0),
            ..Default::default()
        })
        .await
        .unwrap();

    let batch = wip
        .create(NewWipBatch {
            batch_number: Some("GB-001".into()),
            process_id: Some(process.id.to_string()),
            process_name: Some(process.name.clone()),
            quantity: Some(12),
            current_stage: Some("Preparation".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    wip.update(
        batch.id,
        WipBatchPatch {
            current_stage: Some("Quality Check".into()),
            progress: Some(90),
            assigned_operator: Some("Sam".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let production = analytics.production(Local::now().date_naive()).await.unwrap();
    assert_eq!(production.active_production, 1);
    assert_eq!(production.average_progress, "90.0");
    assert_eq!(production.wip_by_stage.get("Quality Check"), Some(&1));

    checks
        .create(NewQualityCheck {
            item_reference: Some("GB-001".into()),
            inspector: Some("Ira".into()),
            status: Some("pass".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    let product = Lifecycle::new(db.clone()).complete(batch.id).await.unwrap();
    assert_eq!(product.name, "Gearbox assembly");
    assert_eq!(product.sku, "FP-GB-001");
    assert_eq!(product.quantity, 12);

    let production = analytics.production(Local::now().date_naive()).await.unwrap();
    assert_eq!(production.active_production, 0);
    assert_eq!(production.completed_today, 1);
    assert!(production.wip_by_stage.is_empty());

    let inventory = analytics.inventory().await.unwrap();
    assert_eq!(inventory.total_finished_products, 12);
    assert_eq!(inventory.finished_product_types, 1);

    // Quality checks still point at the batch number after completion.
    assert_eq!(checks.for_item("GB-001").await.unwrap().len(), 1);

    let err = wip.find(batch.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn restocking_clears_low_stock_alert() {
    let db = store();
    let materials = Repository::<RawMaterial>::new(db.clone());
    let analytics = Analytics::new(db.clone());

    let resin = materials
        .create(NewRawMaterial {
            name: Some("Resin".into()),
            material_type: Some("polymer".into()),
            quantity: Some(Decimal::from(4)),
            unit: Some("L".into()),
            cost_per_unit: Some(Decimal::new(1250, 2)),
            minimum_stock_level: Some(Decimal::from(4)),
            ..Default::default()
        })
        .await
        .unwrap();

    let dashboard = analytics.dashboard().await.unwrap();
    assert_eq!(dashboard.raw_materials_count, 1);
    assert_eq!(dashboard.low_stock_count, 1);
    assert_eq!(dashboard.low_stock_materials[0].id, resin.id);
    assert_eq!(dashboard.quality_pass_rate, "100.0");

    materials
        .update(
            resin.id,
            RawMaterialPatch {
                quantity: Some(Decimal::from(5)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let dashboard = analytics.dashboard().await.unwrap();
    assert_eq!(dashboard.low_stock_count, 0);
    assert!(dashboard.low_stock_materials.is_empty());

    let inventory = analytics.inventory().await.unwrap();
    assert_eq!(inventory.total_raw_material_value, "62.50");
    assert_eq!(inventory.top_materials[0].value, "62.50");
}

#[tokio::test]
async fn finished_products_can_be_edited_and_removed() {
    let db = store();
    let products = Repository::<FinishedProduct>::new(db);

    let product = products
        .create(shopfloor::models::NewFinishedProduct {
            name: Some("Bracket".into()),
            sku: Some("BR-10".into()),
            quantity: Some(40),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(product.quality_status, "pending");

    products
        .update(
            product.id,
            shopfloor::models::FinishedProductPatch {
                quality_status: Some("pass".into()),
                location: Some("Rack 4".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let stored = products.find(product.id).await.unwrap();
    assert_eq!(stored.quality_status, "pass");
    assert_eq!(stored.location.as_deref(), Some("Rack 4"));
    assert_eq!(stored.created_at, product.created_at);

    products.delete(product.id).await.unwrap();
    assert!(products.list().await.unwrap().is_empty());
}
