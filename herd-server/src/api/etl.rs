//! ETL API Handlers
//!
//! Triggers a full pipeline run and reports its summary.

use axum::{Json, extract::State};
use herd_core::domain::batch::RunSummary;

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};

/// POST /etl/run
/// Run the pipeline once against the configured source API
///
/// Partial failures are part of the summary and still answer 200.
pub async fn run_etl(State(state): State<AppState>) -> ApiResult<Json<RunSummary>> {
    tracing::info!("Starting ETL run for {}", state.config.base_url);

    let summary = herd_etl::run_pipeline(state.config.as_ref().clone())
        .await
        .map_err(|e| ApiError::InternalError(format!("Processing failed: {:#}", e)))?;

    Ok(Json(summary))
}
