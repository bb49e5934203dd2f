//! Read-side endpoints: listing pages and single records

use herd_core::domain::record::Record;
use herd_core::dto::page::Page;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::SourceClient;
use crate::error::ClientError;
use crate::retry::{ErrorClass, run_with_retry};

impl SourceClient {
    // =============================================================================
    // Typed endpoints
    // =============================================================================

    /// Fetch one listing page (1-based)
    ///
    /// # Returns
    /// The page, or `None` if it could not be fetched
    pub async fn fetch_page(&self, page: u32) -> Option<Page> {
        let url = format!("{}/v1/listing?page={}", self.base_url, page);
        self.fetch_with_retry(&url).await
    }

    /// Fetch the full record for `id`
    ///
    /// # Returns
    /// The record, or `None` if it does not exist or could not be fetched
    pub async fn fetch_record(&self, id: i64) -> Option<Record> {
        let url = format!("{}/v1/items/{}", self.base_url, id);
        self.fetch_with_retry(&url).await
    }

    // =============================================================================
    // Retry envelope
    // =============================================================================

    /// GET `url` and deserialize the body, retrying transient failures
    ///
    /// - 200: parsed body
    /// - 404: `None` after one attempt
    /// - 500/502/503/504, connection errors: exponential backoff
    /// - timeouts: progressive backoff
    /// - any other status, malformed body: `None` without retrying
    pub async fn fetch_with_retry<T: DeserializeOwned>(&self, url: &str) -> Option<T> {
        let outcome = run_with_retry(
            self.settings.max_attempts,
            url,
            |_attempt| get_json::<T>(&self.client, url),
            |err| self.classify_fetch_error(err),
        )
        .await;

        outcome.ok().flatten()
    }

    fn classify_fetch_error(&self, err: &ClientError) -> ErrorClass {
        if err.is_server_error() || err.is_transport() {
            ErrorClass::Retryable(self.settings.server_backoff)
        } else if err.is_timeout() {
            ErrorClass::Retryable(self.settings.timeout_backoff)
        } else {
            ErrorClass::Terminal
        }
    }
}

/// One GET attempt; a 404 is a successful "absent" answer
async fn get_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<Option<T>, ClientError> {
    let response = client.get(url).send().await?;
    match response.status() {
        StatusCode::OK => Ok(Some(response.json::<T>().await?)),
        StatusCode::NOT_FOUND => Ok(None),
        status => Err(ClientError::status(status.as_u16())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::ClientSettings;
    use crate::testing::{timeout_error, transport_error};

    fn client() -> SourceClient {
        SourceClient::new("http://localhost:3123", ClientSettings::default()).unwrap()
    }

    #[test]
    fn test_server_statuses_use_server_backoff() {
        let client = client();
        for status in [500, 502, 503, 504] {
            assert_eq!(
                client.classify_fetch_error(&ClientError::status(status)),
                ErrorClass::Retryable(client.settings.server_backoff)
            );
        }
    }

    #[test]
    fn test_other_statuses_and_bad_bodies_are_terminal() {
        let client = client();
        for status in [400, 401, 404, 422, 501] {
            assert_eq!(
                client.classify_fetch_error(&ClientError::status(status)),
                ErrorClass::Terminal
            );
        }
        assert_eq!(
            client.classify_fetch_error(&ClientError::Parse("bad json".to_string())),
            ErrorClass::Terminal
        );
        assert_eq!(
            client.classify_fetch_error(&ClientError::Unexpected("odd".to_string())),
            ErrorClass::Terminal
        );
    }

    #[tokio::test]
    async fn test_timeout_uses_progressive_backoff() {
        let client = client();

        let class = client.classify_fetch_error(&timeout_error().await);

        assert_eq!(class, ErrorClass::Retryable(client.settings.timeout_backoff));
        let ErrorClass::Retryable(backoff) = class else { unreachable!() };
        assert_eq!(backoff.delay(0), Duration::from_secs(3));
        assert_eq!(backoff.delay(2), Duration::from_secs(7));
        assert_eq!(backoff.delay(4), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_connection_failure_uses_server_backoff() {
        let client = client();

        let class = client.classify_fetch_error(&transport_error().await);

        assert_eq!(class, ErrorClass::Retryable(client.settings.server_backoff));
        let ErrorClass::Retryable(backoff) = class else { unreachable!() };
        assert_eq!(backoff.delay(0), Duration::from_secs(1));
        assert_eq!(backoff.delay(3), Duration::from_secs(8));
        assert_eq!(backoff.delay(6), Duration::from_secs(16));
    }
}
