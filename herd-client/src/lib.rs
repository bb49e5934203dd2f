//! Herd HTTP Client
//!
//! A resilient HTTP client for the source API that the Herd pipeline reads
//! records from and loads normalized batches back into.
//!
//! Every call runs inside a bounded retry envelope (see [`retry`]). Failures
//! are resolved to data: fetches yield `None`, batch posts yield `false`.
//!
//! # Example
//!
//! ```no_run
//! use herd_client::{ClientSettings, SourceClient};
//!
//! #[tokio::main]
//! async fn main() -> herd_client::Result<()> {
//!     let client = SourceClient::new("http://localhost:3123", ClientSettings::default())?;
//!
//!     if let Some(page) = client.fetch_page(1).await {
//!         println!("First page has {} records", page.items.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
mod ingest;
mod records;
pub mod retry;
pub mod settings;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use retry::{Backoff, ErrorClass, RetryOutcome, run_with_retry};
pub use settings::ClientSettings;

use reqwest::Client;

/// HTTP client for the source API
///
/// Owns one connection pool; clone it to share the pool. The pool is released
/// when the last clone is dropped.
#[derive(Debug, Clone)]
pub struct SourceClient {
    /// Base URL of the source API (e.g., "http://localhost:3123")
    base_url: String,
    /// HTTP client instance
    client: Client,
    /// Timeouts and retry schedules
    settings: ClientSettings,
}

impl SourceClient {
    /// Create a new source client
    ///
    /// Builds a connection pool configured with the connect and request
    /// timeouts from `settings`.
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the source API (e.g., "http://localhost:3123")
    /// * `settings` - Timeouts and retry schedules
    pub fn new(base_url: impl Into<String>, settings: ClientSettings) -> Result<Self> {
        let base_url = base_url.into();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::InvalidRequest(format!(
                "base URL must start with http:// or https://, got '{}'",
                base_url
            )));
        }

        let client = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| ClientError::InvalidRequest(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(base_url, client, settings))
    }

    /// Create a new source client with a custom HTTP client
    ///
    /// This allows you to configure proxies, TLS settings, etc. The timeouts in
    /// `settings` are only applied per request for batch posts.
    pub fn with_client(base_url: impl Into<String>, client: Client, settings: ClientSettings) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            settings,
        }
    }

    /// Get the base URL of the source API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the timeouts and retry schedules in use
    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }
}
