//! Batch load stage

use herd_core::domain::batch::BatchResult;
use herd_core::domain::record::Record;
use tracing::{error, info, warn};

use crate::repository::RecordRepository;

/// Posts one batch of transformed records and accounts for it
///
/// # Arguments
/// * `batch_number` - Run-wide batch identifier
/// * `attempted` - Number of ids the batch started with
/// * `records` - Records that survived fetch and transform
///
/// An empty `records` slice is reported as a failed batch without any call.
pub async fn load_batch(
    repository: &dyn RecordRepository,
    batch_number: u64,
    attempted: usize,
    records: &[Record],
) -> BatchResult {
    if records.is_empty() {
        warn!("No records transformed in ETL batch {}", batch_number);
        return BatchResult::rejected(batch_number, attempted);
    }

    if repository.post_batch(records).await {
        info!(
            "Successfully processed ETL batch {}: {} records",
            batch_number,
            records.len()
        );
        BatchResult::loaded(batch_number, attempted, records.len())
    } else {
        error!("Failed to post ETL batch {}", batch_number);
        BatchResult::rejected(batch_number, attempted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeRepository, sample_record};

    #[tokio::test]
    async fn test_partial_batch_loaded() {
        let repository = FakeRepository::new();
        let records = vec![sample_record(1), sample_record(3)];

        let result = load_batch(&repository, 1, 3, &records).await;

        assert_eq!(result, BatchResult { batch_number: 1, processed: 2, failed: 1, success: true });
        assert_eq!(repository.posted_batches(), vec![2]);
    }

    #[tokio::test]
    async fn test_rejected_post() {
        let repository = FakeRepository::new().reject_posts();
        let records = vec![sample_record(1)];

        let result = load_batch(&repository, 2, 1, &records).await;

        assert_eq!(result, BatchResult { batch_number: 2, processed: 0, failed: 1, success: false });
    }

    #[tokio::test]
    async fn test_empty_batch_skips_post() {
        let repository = FakeRepository::new();

        let result = load_batch(&repository, 5, 4, &[]).await;

        assert_eq!(result, BatchResult { batch_number: 5, processed: 0, failed: 4, success: false });
        assert!(repository.posted_batches().is_empty());
    }
}
