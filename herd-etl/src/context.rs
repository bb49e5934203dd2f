//! Run-scoped context
//!
//! Created once per pipeline run and shared by every stage:
//! - Run identity (id, start time) for log correlation
//! - Configuration
//! - The record repository, which owns the run's single HTTP connection pool
//! - The fetch admission gate policy

use std::num::NonZeroUsize;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::config::{ConcurrencyScope, Config};
use crate::repository::RecordRepository;

/// Execution context shared across one pipeline run
pub struct RunContext {
    /// Identifier attached to every log line of this run
    pub run_id: Uuid,

    pub started_at: DateTime<Utc>,

    pub config: Config,

    repository: Arc<dyn RecordRepository>,

    /// Present only with `ConcurrencyScope::Global`
    shared_gate: Option<Arc<Semaphore>>,
}

impl RunContext {
    /// Creates a new run context
    ///
    /// # Arguments
    /// * `config` - Validated pipeline configuration
    /// * `repository` - Source of pages and records, sink for batches
    pub fn new(config: Config, repository: Arc<dyn RecordRepository>) -> Arc<Self> {
        let shared_gate = match config.concurrency_scope {
            ConcurrencyScope::Global => Some(Arc::new(Semaphore::new(
                config.max_concurrent_requests.max(1),
            ))),
            ConcurrencyScope::PerBatch => None,
        };

        Arc::new(Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            config,
            repository,
            shared_gate,
        })
    }

    pub fn repository(&self) -> Arc<dyn RecordRepository> {
        Arc::clone(&self.repository)
    }

    /// Admission gate for one fetch-transform invocation
    ///
    /// A fresh gate per call with `PerBatch`, the run-wide gate with `Global`.
    pub fn fetch_gate(&self) -> Arc<Semaphore> {
        match &self.shared_gate {
            Some(gate) => Arc::clone(gate),
            None => Arc::new(Semaphore::new(self.config.max_concurrent_requests.max(1))),
        }
    }

    pub fn batch_size(&self) -> NonZeroUsize {
        self.config.batch_size()
    }
}
