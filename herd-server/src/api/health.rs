//! Health Check API Handler
//!
//! Simple health check endpoint for monitoring.

use axum::Json;
use serde::Serialize;

const SERVICE_NAME: &str = "Herd ETL API";

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub timestamp: String,
    pub version: &'static str,
    pub service: &'static str,
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy",
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
        service: SERVICE_NAME,
    })
}
