//! Record endpoints
//!
//! Each handler decodes input, makes one repository call and maps the
//! outcome. Handlers only ever see `ApiError`, never raw store errors.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::http::error::ApiError;
use crate::http::extractors::JsonBody;
use crate::http::server::AppState;
use crate::models::{NewRecord, PostRecordInput, Record, RecordChanges, UpdateRecordInput};

/// Body returned by DELETE
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
}

/// GET /{collection} - list all records
async fn list_records(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let records = state.records.read().await?;
    Ok(Json(records))
}

/// POST /{collection} - create a record
async fn create_record(
    State(state): State<Arc<AppState>>,
    JsonBody(input): JsonBody<PostRecordInput>,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    let new = NewRecord::try_from(input)?;
    let record = state.records.create(new).await?;

    tracing::info!(id = %record.id, "record created");
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /{collection}/{id} - get a single record
async fn get_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Record>, ApiError> {
    let record = state.records.read_one(&id).await?;
    Ok(Json(record))
}

/// PUT /{collection}/{id} - partial update
async fn update_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<UpdateRecordInput>,
) -> Result<Json<Record>, ApiError> {
    let changes = RecordChanges::from(input);
    if changes.is_empty() {
        tracing::debug!(%id, "update carries no changes");
    }

    let record = state.records.update(&id, changes).await?;
    Ok(Json(record))
}

/// DELETE /{collection}/{id} - delete a record
async fn delete_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let deleted = state.records.delete(&id).await?;

    tracing::info!(id = %deleted, "record deleted");
    Ok(Json(DeleteResponse {
        message: "record successfully deleted",
    }))
}

/// Record routes mounted under `/{collection}`
pub fn router(collection: &str) -> Router<Arc<AppState>> {
    let base = format!("/{}", collection);
    let item = format!("{}/{{id}}", base);

    Router::new()
        .route(&base, get(list_records).post(create_record))
        .route(
            &item,
            get(get_record).put(update_record).delete(delete_record),
        )
}
