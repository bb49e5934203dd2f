//! Batch and run accounting types
//!
//! `BatchResult` is produced once per chunk and folded into a `RunSummary`
//! by the orchestrator. Both exist only for the duration of a single run.

use serde::{Deserialize, Serialize};

/// Outcome of one chunk's fetch-transform-load cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub batch_number: u64,
    pub processed: usize,
    pub failed: usize,
    pub success: bool,
}

impl BatchResult {
    /// A chunk whose transformed records were accepted by the sink
    ///
    /// Ids that failed upstream (fetch or transform) still count as failed.
    pub fn loaded(batch_number: u64, attempted: usize, loaded: usize) -> Self {
        Self {
            batch_number,
            processed: loaded,
            failed: attempted.saturating_sub(loaded),
            success: true,
        }
    }

    /// A chunk that produced nothing or whose load was rejected
    pub fn rejected(batch_number: u64, attempted: usize) -> Self {
        Self {
            batch_number,
            processed: 0,
            failed: attempted,
            success: false,
        }
    }
}

/// Aggregate counters for a full pipeline run
///
/// This is the pipeline's only externally visible output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub message: String,
    pub total_records: usize,
    pub processed_records: usize,
    pub failed_records: usize,
    pub batches_sent: usize,
    pub total_batches: u64,
}

impl RunSummary {
    pub fn new() -> Self {
        Self {
            message: "ETL processing complete".to_string(),
            total_records: 0,
            processed_records: 0,
            failed_records: 0,
            batches_sent: 0,
            total_batches: 0,
        }
    }

    /// Folds one chunk's result into the running totals
    pub fn record_batch(&mut self, result: &BatchResult) {
        self.processed_records += result.processed;
        self.failed_records += result.failed;
        if result.success {
            self.batches_sent += 1;
        }
    }

    /// Counts a chunk whose task died before reporting a result
    pub fn record_lost_batch(&mut self, attempted: usize) {
        self.failed_records += attempted;
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}
