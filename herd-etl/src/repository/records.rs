//! Records repository
//!
//! Handles communication with the source API for:
//! - Fetching listing pages
//! - Fetching single records
//! - Posting transformed batches

use async_trait::async_trait;
use herd_client::SourceClient;
use herd_core::domain::record::Record;
use herd_core::dto::page::Page;

/// Repository trait for record-related operations with the source API
///
/// Implementations resolve every failure to data: `None` or `false`.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Fetches listing page `page` (1-based)
    async fn fetch_page(&self, page: u32) -> Option<Page>;

    /// Fetches the full record for `id`
    async fn fetch_record(&self, id: i64) -> Option<Record>;

    /// Posts a batch of transformed records
    ///
    /// # Returns
    /// `true` if the sink accepted the batch
    async fn post_batch(&self, records: &[Record]) -> bool;
}

/// HTTP implementation of RecordRepository
pub struct HttpRecordRepository {
    client: SourceClient,
}

impl HttpRecordRepository {
    /// Creates a new HTTP record repository
    ///
    /// # Arguments
    /// * `client` - Source API client; its connection pool is reused by every call
    pub fn new(client: SourceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RecordRepository for HttpRecordRepository {
    async fn fetch_page(&self, page: u32) -> Option<Page> {
        self.client.fetch_page(page).await
    }

    async fn fetch_record(&self, id: i64) -> Option<Record> {
        self.client.fetch_record(id).await
    }

    async fn post_batch(&self, records: &[Record]) -> bool {
        self.client.post_ingest(records).await
    }
}
