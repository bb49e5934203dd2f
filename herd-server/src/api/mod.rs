//! API Module
//!
//! HTTP API layer over the ETL pipeline.
//! Each submodule handles endpoints for a specific concern.

pub mod error;
pub mod etl;
pub mod health;
pub mod records;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use herd_etl::config::Config;
use tower_http::trace::TraceLayer;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Create the main API router with all endpoints
pub fn create_router(config: Config) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Pipeline trigger
        .route("/etl/run", post(etl::run_etl))
        // Source pass-through
        .route("/records", get(records::list_records))
        .route("/records/{id}", get(records::get_record))
        // Ingest receiver
        .route("/records/ingest", post(records::receive_records))
        // Add state and middleware
        .with_state(AppState::new(config))
        .layer(TraceLayer::new_for_http())
}
