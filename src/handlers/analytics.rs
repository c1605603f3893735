use axum::{extract::State, response::Json};
use chrono::Local;

use crate::{
    database::Database,
    error::AppResult,
    services::{
        analytics::{DashboardSummary, InventorySummary, ProductionSummary},
        Analytics,
    },
};

pub async fn dashboard(State(db): State<Database>) -> AppResult<Json<DashboardSummary>> {
    Ok(Json(Analytics::new(db).dashboard().await?))
}

pub async fn production(State(db): State<Database>) -> AppResult<Json<ProductionSummary>> {
    let today = Local::now().date_naive();
    Ok(Json(Analytics::new(db).production(today).await?))
}

pub async fn inventory(State(db): State<Database>) -> AppResult<Json<InventorySummary>> {
    Ok(Json(Analytics::new(db).inventory().await?))
}
