use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;

use super::crud::MessageResponse;
use crate::{
    database::Database,
    error::AppResult,
    models::FinishedProduct,
    services::Lifecycle,
};

// Mark a batch complete and move it to finished products
pub async fn complete(
    State(db): State<Database>,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<(StatusCode, Json<FinishedProduct>)> {
    let Path(id) = id?;
    let product = Lifecycle::new(db).complete(id).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

// Cancel production (delete WIP)
pub async fn cancel(
    State(db): State<Database>,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Path(id) = id?;
    Lifecycle::new(db).cancel(id).await?;
    Ok(MessageResponse::new("Production cancelled successfully"))
}
