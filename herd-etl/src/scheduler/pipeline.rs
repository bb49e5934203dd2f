//! ETL pipeline
//!
//! Walks the listing page by page. Each page is cut into chunks and every
//! chunk runs as its own task (fetch-transform, then load). All chunk tasks
//! of a page are awaited before the next page is requested.

use std::sync::Arc;

use herd_core::chunk::chunk;
use herd_core::domain::batch::{BatchResult, RunSummary};
use tokio::task::JoinHandle;
use tracing::{Instrument, Span, error, info, info_span};

use crate::context::RunContext;
use crate::stage::{fetch_and_transform, load_batch};

/// Pipeline driver for a single run
pub struct EtlPipeline {
    context: Arc<RunContext>,
}

impl EtlPipeline {
    /// Creates a new pipeline over a run context
    pub fn new(context: Arc<RunContext>) -> Self {
        Self { context }
    }

    /// Runs discovery, extract, transform and load over every listing page
    ///
    /// Failures never abort the run; they are counted in the summary.
    pub async fn run_all(&self) -> RunSummary {
        let span = info_span!("etl_run", run_id = %self.context.run_id);
        self.run_pages().instrument(span).await
    }

    async fn run_pages(&self) -> RunSummary {
        info!(
            "Starting ETL run (batch size {}, {} concurrent fetches, {} gate)",
            self.context.batch_size(),
            self.context.config.max_concurrent_requests,
            self.context.config.concurrency_scope
        );

        let repository = self.context.repository();
        let mut summary = RunSummary::new();
        let mut page = 1;
        let mut batch_number: u64 = 1;

        loop {
            info!("Fetching listing page {}", page);

            let listing = match repository.fetch_page(page).await {
                Some(listing) if !listing.is_empty() => listing,
                _ => {
                    info!("No more records found at page {}", page);
                    break;
                }
            };

            let ids = listing.ids();
            summary.total_records += ids.len();
            info!("Processing {} ids from page {}", ids.len(), page);

            let mut handles = Vec::new();
            for ids in chunk(&ids, self.context.batch_size()) {
                let attempted = ids.len();
                handles.push((attempted, self.spawn_batch_task(batch_number, ids)));
                batch_number += 1;
            }

            for (attempted, handle) in handles {
                match handle.await {
                    Ok(result) => summary.record_batch(&result),
                    Err(e) => {
                        error!("ETL batch task panicked: {}", e);
                        summary.record_lost_batch(attempted);
                    }
                }
            }

            page += 1;
        }

        summary.total_batches = batch_number - 1;

        let elapsed = chrono::Utc::now() - self.context.started_at;
        info!(
            "ETL run finished in {}ms: {} total, {} processed, {} failed, {}/{} batches sent",
            elapsed.num_milliseconds(),
            summary.total_records,
            summary.processed_records,
            summary.failed_records,
            summary.batches_sent,
            summary.total_batches
        );

        summary
    }

    /// Spawns the fetch-transform-load task for one chunk
    fn spawn_batch_task(&self, batch_number: u64, ids: Vec<i64>) -> JoinHandle<BatchResult> {
        let context = Arc::clone(&self.context);

        tokio::spawn(
            async move {
                info!("Processing ETL batch {} with {} records", batch_number, ids.len());

                let repository = context.repository();
                let outcome =
                    fetch_and_transform(Arc::clone(&repository), &ids, context.fetch_gate()).await;

                load_batch(repository.as_ref(), batch_number, ids.len(), &outcome.records).await
            }
            .instrument(Span::current()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConcurrencyScope, Config};
    use crate::repository::RecordRepository;
    use crate::testing::FakeRepository;

    fn pipeline(config: Config, repository: Arc<FakeRepository>) -> EtlPipeline {
        let repository: Arc<dyn RecordRepository> = repository;
        EtlPipeline::new(RunContext::new(config, repository))
    }

    fn config(batch: usize, concurrent: usize) -> Config {
        Config {
            max_records_per_batch: batch,
            max_concurrent_requests: concurrent,
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_single_page_run() {
        let repository = Arc::new(
            FakeRepository::new()
                .with_pages(vec![vec![1, 2, 3], vec![]])
                .with_records(&[1, 2, 3]),
        );

        let summary = pipeline(config(100, 10), repository.clone()).run_all().await;

        assert_eq!(summary.total_records, 3);
        assert_eq!(summary.processed_records, 3);
        assert_eq!(summary.failed_records, 0);
        assert_eq!(summary.batches_sent, 1);
        assert_eq!(summary.total_batches, 1);
        assert_eq!(repository.posted_batches(), vec![3]);
    }

    #[tokio::test]
    async fn test_empty_source() {
        let repository = Arc::new(FakeRepository::new().with_pages(vec![vec![]]));

        let summary = pipeline(config(100, 10), repository.clone()).run_all().await;

        assert_eq!(summary, RunSummary::new());
        assert!(repository.posted_batches().is_empty());
    }

    #[tokio::test]
    async fn test_batch_numbers_span_pages() {
        let repository = Arc::new(
            FakeRepository::new()
                .with_pages(vec![vec![1, 2, 3], vec![4, 5], vec![]])
                .with_records(&[1, 2, 3, 4, 5]),
        );

        let summary = pipeline(config(2, 10), repository.clone()).run_all().await;

        // page 1 -> batches 1, 2; page 2 -> batch 3
        assert_eq!(summary.total_batches, 3);
        assert_eq!(summary.batches_sent, 3);
        assert_eq!(summary.processed_records, 5);
        let mut posted = repository.posted_batches();
        posted.sort();
        assert_eq!(posted, vec![1, 2, 2]);
    }

    #[tokio::test]
    async fn test_missing_record_counts_as_failed() {
        let repository = Arc::new(
            FakeRepository::new()
                .with_pages(vec![vec![1, 2, 3]])
                .with_records(&[1, 3]),
        );

        let summary = pipeline(config(100, 10), repository).run_all().await;

        assert_eq!(summary.total_records, 3);
        assert_eq!(summary.processed_records, 2);
        assert_eq!(summary.failed_records, 1);
        assert_eq!(summary.batches_sent, 1);
    }

    #[tokio::test]
    async fn test_rejected_load_fails_whole_batch() {
        let repository = Arc::new(
            FakeRepository::new()
                .with_pages(vec![vec![1, 2]])
                .with_records(&[1, 2])
                .reject_posts(),
        );

        let summary = pipeline(config(100, 10), repository).run_all().await;

        assert_eq!(summary.processed_records, 0);
        assert_eq!(summary.failed_records, 2);
        assert_eq!(summary.batches_sent, 0);
        assert_eq!(summary.total_batches, 1);
    }

    #[tokio::test]
    async fn test_panicking_batch_is_counted_lost() {
        let repository = Arc::new(
            FakeRepository::new()
                .with_pages(vec![vec![1, 2, 3, 4]])
                .with_records(&[1, 2, 3, 4])
                .panic_on_post(),
        );

        let summary = pipeline(config(2, 10), repository).run_all().await;

        assert_eq!(summary.total_records, 4);
        assert_eq!(summary.processed_records, 0);
        assert_eq!(summary.failed_records, 4);
        assert_eq!(summary.batches_sent, 0);
        assert_eq!(summary.total_batches, 2);
    }

    #[tokio::test]
    async fn test_global_gate_caps_fetches_across_batches() {
        let ids: Vec<i64> = (1..=12).collect();
        let repository = Arc::new(
            FakeRepository::new()
                .with_pages(vec![ids.clone()])
                .with_records(&ids)
                .with_fetch_delay_ms(10),
        );
        let config = Config {
            concurrency_scope: ConcurrencyScope::Global,
            ..config(3, 2)
        };

        let summary = pipeline(config, repository.clone()).run_all().await;

        assert_eq!(summary.processed_records, 12);
        assert!(repository.peak_in_flight() <= 2);
    }

    #[tokio::test]
    async fn test_per_batch_gate_caps_each_batch() {
        let ids: Vec<i64> = (1..=12).collect();
        let repository = Arc::new(
            FakeRepository::new()
                .with_pages(vec![ids.clone()])
                .with_records(&ids)
                .with_fetch_delay_ms(10),
        );

        let summary = pipeline(config(3, 2), repository.clone()).run_all().await;

        assert_eq!(summary.processed_records, 12);
        // four batches, two permits each
        assert!(repository.peak_in_flight() <= 8);
        assert!(repository.peak_in_flight() > 2);
    }
}
