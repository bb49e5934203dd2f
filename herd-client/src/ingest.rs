//! Write-side endpoint: batch ingest

use std::time::Duration;

use herd_core::domain::record::Record;
use reqwest::Client;
use tracing::info;

use crate::SourceClient;
use crate::error::ClientError;
use crate::retry::{ErrorClass, run_with_retry};

/// Statuses accepted as a successful batch post
const ACCEPTED_STATUSES: [u16; 3] = [200, 201, 202];

impl SourceClient {
    /// Post a batch of transformed records to the ingest endpoint
    ///
    /// # Returns
    /// `true` if the sink accepted the batch
    pub async fn post_ingest(&self, records: &[Record]) -> bool {
        let url = format!("{}/v1/ingest", self.base_url);
        self.post_batch_with_retry(&url, records).await
    }

    /// POST `records` as a JSON array to `url`, retrying transient failures
    ///
    /// - 200/201/202: success
    /// - 500/502/503/504: exponential backoff
    /// - timeout: fixed wait
    /// - any other failure to send: shorter fixed wait
    /// - any other status: failure without retrying
    pub async fn post_batch_with_retry(&self, url: &str, records: &[Record]) -> bool {
        let timeout = self.settings.batch_post_timeout;

        let outcome = run_with_retry(
            self.settings.max_attempts,
            url,
            |_attempt| send_batch(&self.client, url, timeout, records),
            |err| self.classify_post_error(err),
        )
        .await;

        let sent = outcome.is_completed();
        if sent {
            info!("Successfully sent batch of {} records", records.len());
        }
        sent
    }

    fn classify_post_error(&self, err: &ClientError) -> ErrorClass {
        match err {
            ClientError::Status { .. } if err.is_server_error() => {
                ErrorClass::Retryable(self.settings.post_server_backoff)
            }
            ClientError::Status { .. } => ErrorClass::Terminal,
            ClientError::Timeout(_) => ErrorClass::Retryable(self.settings.post_timeout_backoff),
            _ => ErrorClass::Retryable(self.settings.post_error_backoff),
        }
    }
}

/// One POST attempt
async fn send_batch(
    client: &Client,
    url: &str,
    timeout: Duration,
    records: &[Record],
) -> Result<(), ClientError> {
    let response = client.post(url).timeout(timeout).json(records).send().await?;
    let status = response.status().as_u16();
    if ACCEPTED_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(ClientError::status(status))
    }
}
