use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    database::Database,
    error::AppResult,
    models::{Entity, MutableEntity},
    services::Repository,
};

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

pub async fn list<E: Entity>(State(db): State<Database>) -> AppResult<Json<Vec<E>>> {
    let records = Repository::<E>::new(db).list().await?;
    Ok(Json(records))
}

pub async fn show<E: Entity>(
    State(db): State<Database>,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<E>> {
    let Path(id) = id?;
    let record = Repository::<E>::new(db).find(id).await?;
    Ok(Json(record))
}

pub async fn create<E: Entity>(
    State(db): State<Database>,
    payload: Result<Json<E::New>, JsonRejection>,
) -> AppResult<(StatusCode, Json<E>)> {
    let Json(new) = payload?;
    let record = Repository::<E>::new(db).create(new).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update<E: MutableEntity>(
    State(db): State<Database>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<E::Patch>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Path(id) = id?;
    let Json(patch) = payload?;
    Repository::<E>::new(db).update(id, patch).await?;
    Ok(MessageResponse::new(format!("{} updated successfully", E::ACK_LABEL)))
}

pub async fn delete<E: MutableEntity>(
    State(db): State<Database>,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Path(id) = id?;
    Repository::<E>::new(db).delete(id).await?;
    Ok(MessageResponse::new(format!("{} deleted successfully", E::ACK_LABEL)))
}
