use axum::{
    extract::{Path, State},
    response::Json,
};

use crate::{
    database::Database,
    error::AppResult,
    models::QualityCheck,
    services::Repository,
};

// Get quality checks for a specific batch number or SKU
pub async fn for_item(
    State(db): State<Database>,
    Path(item_id): Path<String>,
) -> AppResult<Json<Vec<QualityCheck>>> {
    let checks = Repository::<QualityCheck>::new(db).for_item(&item_id).await?;
    Ok(Json(checks))
}
