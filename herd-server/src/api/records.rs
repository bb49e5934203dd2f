//! Records API Handlers
//!
//! Read pass-through to the source API and the batch ingest receiver.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use herd_core::domain::record::{Record, record_id};
use herd_core::dto::ingest::IngestAck;
use herd_core::dto::page::Page;
use serde::Deserialize;

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

/// GET /records?page={n}
/// Fetch one listing page from the source API (page 1 by default)
pub async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Page>> {
    let page = query.page.unwrap_or(1);
    tracing::debug!("Fetching listing page {}", page);

    let repository = herd_etl::http_repository(&state.config)
        .map_err(|e| ApiError::InternalError(format!("{:#}", e)))?;

    repository
        .fetch_page(page)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::InternalError("Failed to fetch records".to_string()))
}

/// GET /records/{id}
/// Fetch one record from the source API
pub async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Record>> {
    tracing::debug!("Fetching record {}", id);

    let repository = herd_etl::http_repository(&state.config)
        .map_err(|e| ApiError::InternalError(format!("{:#}", e)))?;

    repository
        .fetch_record(id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Record with ID {} not found", id)))
}

/// POST /records/ingest
/// Accept a batch of records, at most `max_records_per_batch` of them
pub async fn receive_records(
    State(state): State<AppState>,
    Json(records): Json<Vec<Record>>,
) -> ApiResult<Json<IngestAck>> {
    let limit = state.config.max_records_per_batch;
    if records.len() > limit {
        return Err(ApiError::BadRequest(format!(
            "Maximum {} records per batch",
            limit
        )));
    }

    tracing::info!("Received batch of {} records", records.len());
    for record in &records {
        match record_id(record) {
            Some(id) => tracing::debug!("Processing record: {}", id),
            None => tracing::debug!("Processing record: unknown"),
        }
    }

    Ok(Json(IngestAck::received(records.len())))
}
