//! Concurrent fetch-transform stage
//!
//! Every id of a batch is dispatched as its own task at once; the admission
//! gate bounds how many fetches are in flight. Results are collected in
//! completion order, so the output order need not match the input order.

use std::sync::Arc;

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use herd_core::domain::record::Record;
use herd_core::transform::transform_record;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::repository::RecordRepository;

/// Failed ids listed in the batch log line
const LOGGED_FAILURES: usize = 10;

/// Records that made it through a fetch-transform pass, and the ids that did not
#[derive(Debug, Default)]
pub struct ExtractOutcome {
    pub records: Vec<Record>,
    pub failed_ids: Vec<i64>,
}

/// Fetches and transforms `ids`, at most `gate`'s permits at a time
///
/// A missing record or a task that dies is recorded as a failed id; it never
/// stops the other fetches.
pub async fn fetch_and_transform(
    repository: Arc<dyn RecordRepository>,
    ids: &[i64],
    gate: Arc<Semaphore>,
) -> ExtractOutcome {
    let mut pending: FuturesUnordered<_> = ids
        .iter()
        .map(|&id| {
            let repository = Arc::clone(&repository);
            let gate = Arc::clone(&gate);
            let handle = tokio::spawn(async move {
                let _permit = gate.acquire_owned().await.ok()?;
                match repository.fetch_record(id).await {
                    Some(record) => Some(transform_record(&record)),
                    None => {
                        warn!("Failed to fetch record {} after all retries", id);
                        None
                    }
                }
            });
            async move { (id, handle.await) }
        })
        .collect();

    let mut outcome = ExtractOutcome::default();
    while let Some((id, joined)) = pending.next().await {
        match joined {
            Ok(Some(record)) => outcome.records.push(record),
            Ok(None) => outcome.failed_ids.push(id),
            Err(e) => {
                error!("Fetch task for record {} failed: {}", id, e);
                outcome.failed_ids.push(id);
            }
        }
    }

    info!(
        "Batch processing complete: {} successful, {} failed",
        outcome.records.len(),
        outcome.failed_ids.len()
    );

    if !outcome.failed_ids.is_empty() {
        let shown = &outcome.failed_ids[..outcome.failed_ids.len().min(LOGGED_FAILURES)];
        let ellipsis = if outcome.failed_ids.len() > LOGGED_FAILURES { "..." } else { "" };
        warn!("Failed record ids in batch: {:?}{}", shown, ellipsis);
    }

    outcome
}
