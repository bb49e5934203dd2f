//! Herd ETL
//!
//! Pulls every record from the source API, normalizes it and pushes it back
//! in batches.
//!
//! Architecture:
//! - Configuration: settings from environment or defaults
//! - Repository: HTTP communication with the source API (pages, records, ingest)
//! - Stages: discovery, concurrent fetch-transform, batch load
//! - Scheduler: per-page chunk fan-out and run accounting
//!
//! Every failure below the pipeline is resolved to data. The run always
//! returns a `RunSummary` once the client could be built.

pub mod config;
pub mod context;
pub mod repository;
pub mod scheduler;
pub mod stage;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use anyhow::{Context as _, Result};
use herd_client::SourceClient;
use tracing::info;

use crate::config::Config;
use crate::context::RunContext;
use crate::repository::{HttpRecordRepository, RecordRepository};
use crate::scheduler::EtlPipeline;

pub use herd_core::domain::batch::{BatchResult, RunSummary};

/// Runs one full pipeline against the configured source API
///
/// The HTTP client (and its connection pool) lives exactly as long as the run.
pub async fn run_pipeline(config: Config) -> Result<RunSummary> {
    let repository = http_repository(&config)?;
    let context = RunContext::new(config, repository);
    info!("Created run context {}", context.run_id);

    Ok(EtlPipeline::new(context).run_all().await)
}

/// Lists every record id exposed by the source API without fetching records
pub async fn discover(config: Config) -> Result<Vec<i64>> {
    let repository = http_repository(&config)?;
    Ok(stage::discover_all_ids(repository.as_ref()).await)
}

/// Builds the HTTP repository for `config`, validating it first
pub fn http_repository(config: &Config) -> Result<Arc<dyn RecordRepository>> {
    config.validate().context("Invalid pipeline configuration")?;

    let client = SourceClient::new(config.base_url.clone(), config.client_settings())
        .context("Failed to build source API client")?;
    info!("Source API client initialized for {}", client.base_url());

    Ok(Arc::new(HttpRecordRepository::new(client)))
}
