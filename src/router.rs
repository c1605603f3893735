use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    database::Database,
    handlers::{self, crud},
    models::{FinishedProduct, Process, QualityCheck, RawMaterial, WipBatch},
};

pub fn create_router(db: Database, static_dir: &str) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // Raw materials
        .route(
            "/api/raw-materials",
            get(crud::list::<RawMaterial>).post(crud::create::<RawMaterial>),
        )
        .route(
            "/api/raw-materials/:id",
            get(crud::show::<RawMaterial>)
                .put(crud::update::<RawMaterial>)
                .delete(crud::delete::<RawMaterial>),
        )
        // Manufacturing processes
        .route(
            "/api/processes",
            get(crud::list::<Process>).post(crud::create::<Process>),
        )
        .route(
            "/api/processes/:id",
            get(crud::show::<Process>)
                .put(crud::update::<Process>)
                .delete(crud::delete::<Process>),
        )
        // Work in progress
        .route(
            "/api/wip",
            get(crud::list::<WipBatch>).post(crud::create::<WipBatch>),
        )
        .route(
            "/api/wip/:id",
            get(crud::show::<WipBatch>)
                .put(crud::update::<WipBatch>)
                .delete(handlers::wip::cancel),
        )
        .route("/api/wip/:id/complete", post(handlers::wip::complete))
        // Finished products
        .route(
            "/api/finished-products",
            get(crud::list::<FinishedProduct>).post(crud::create::<FinishedProduct>),
        )
        .route(
            "/api/finished-products/:id",
            get(crud::show::<FinishedProduct>)
                .put(crud::update::<FinishedProduct>)
                .delete(crud::delete::<FinishedProduct>),
        )
        // Quality checks (append-only)
        .route(
            "/api/quality-checks",
            get(crud::list::<QualityCheck>).post(crud::create::<QualityCheck>),
        )
        .route("/api/quality-checks/:item_id", get(handlers::quality::for_item))
        // Analytics
        .route("/api/analytics/dashboard", get(handlers::analytics::dashboard))
        .route("/api/analytics/production", get(handlers::analytics::production))
        .route("/api/analytics/inventory", get(handlers::analytics::inventory))
        // Static files, then the client shell for everything else
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(handlers::shell::fallback)
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::disable()),
        )
        .with_state(db)
}
