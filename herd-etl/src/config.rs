//! Pipeline configuration
//!
//! Defines all configurable parameters for a pipeline run: where the source
//! API lives, how wide the fan-out may go, and how patient the HTTP client is.

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::time::Duration;

use herd_client::ClientSettings;

/// Scope of the per-record fetch admission gate
///
/// `PerBatch` gives every fetch-transform invocation its own gate, so the true
/// peak of in-flight fetches is `max_concurrent_requests` times the number of
/// batches running at once. `Global` shares one gate across the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConcurrencyScope {
    #[default]
    PerBatch,
    Global,
}

impl FromStr for ConcurrencyScope {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per-batch" | "per_batch" | "batch" => Ok(Self::PerBatch),
            "global" => Ok(Self::Global),
            other => anyhow::bail!("unknown concurrency scope '{}'", other),
        }
    }
}

impl fmt::Display for ConcurrencyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PerBatch => write!(f, "per-batch"),
            Self::Global => write!(f, "global"),
        }
    }
}

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Source API base URL (e.g., "http://localhost:3123")
    pub base_url: String,

    /// Maximum in-flight record fetches per admission gate
    pub max_concurrent_requests: usize,

    /// Maximum records per load batch
    pub max_records_per_batch: usize,

    /// Attempts per HTTP call, including the first
    pub max_retries: u32,

    /// Exponential backoff base in seconds (attempt n waits base^n)
    pub initial_retry_delay: u32,

    /// Cap on fetch backoff
    pub max_retry_delay: Duration,

    pub connect_timeout: Duration,

    pub request_timeout: Duration,

    pub batch_post_timeout: Duration,

    /// Whether the fetch admission gate is per batch or shared by the run
    pub concurrency_scope: ConcurrencyScope,

    /// Listen address for the HTTP handler layer
    pub bind_addr: String,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            max_concurrent_requests: 100,
            max_records_per_batch: 100,
            max_retries: 5,
            initial_retry_delay: 2,
            max_retry_delay: Duration::from_secs(16),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(20),
            batch_post_timeout: Duration::from_secs(60),
            concurrency_scope: ConcurrencyScope::PerBatch,
            bind_addr: "0.0.0.0:8000".to_string(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables (all optional):
    /// - HERD_SOURCE_URL (default: http://localhost:3123)
    /// - HERD_MAX_CONCURRENT (default: 100)
    /// - HERD_MAX_BATCH (default: 100)
    /// - HERD_MAX_RETRIES (default: 5)
    /// - HERD_RETRY_BASE (seconds, default: 2)
    /// - HERD_MAX_RETRY_DELAY (seconds, default: 16)
    /// - HERD_CONNECT_TIMEOUT (seconds, default: 5)
    /// - HERD_REQUEST_TIMEOUT (seconds, default: 20)
    /// - HERD_BATCH_POST_TIMEOUT (seconds, default: 60)
    /// - HERD_CONCURRENCY_SCOPE (per-batch | global, default: per-batch)
    /// - HERD_BIND_ADDR (default: 0.0.0.0:8000)
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let concurrency_scope = match std::env::var("HERD_CONCURRENCY_SCOPE") {
            Ok(scope) => scope.parse()?,
            Err(_) => defaults.concurrency_scope,
        };

        Ok(Self {
            base_url: std::env::var("HERD_SOURCE_URL").unwrap_or(defaults.base_url),
            max_concurrent_requests: env_or("HERD_MAX_CONCURRENT", defaults.max_concurrent_requests),
            max_records_per_batch: env_or("HERD_MAX_BATCH", defaults.max_records_per_batch),
            max_retries: env_or("HERD_MAX_RETRIES", defaults.max_retries),
            initial_retry_delay: env_or("HERD_RETRY_BASE", defaults.initial_retry_delay),
            max_retry_delay: env_secs_or("HERD_MAX_RETRY_DELAY", defaults.max_retry_delay),
            connect_timeout: env_secs_or("HERD_CONNECT_TIMEOUT", defaults.connect_timeout),
            request_timeout: env_secs_or("HERD_REQUEST_TIMEOUT", defaults.request_timeout),
            batch_post_timeout: env_secs_or("HERD_BATCH_POST_TIMEOUT", defaults.batch_post_timeout),
            concurrency_scope,
            bind_addr: std::env::var("HERD_BIND_ADDR").unwrap_or(defaults.bind_addr),
        })
    }

    /// Loads configuration from the environment and validates it
    pub fn load() -> anyhow::Result<Self> {
        let config = Self::from_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.base_url.is_empty() {
            anyhow::bail!("base_url cannot be empty");
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!("base_url must start with http:// or https://");
        }

        if self.max_concurrent_requests == 0 {
            anyhow::bail!("max_concurrent_requests must be greater than 0");
        }

        if self.max_records_per_batch == 0 {
            anyhow::bail!("max_records_per_batch must be greater than 0");
        }

        if self.max_retries == 0 {
            anyhow::bail!("max_retries must be greater than 0");
        }

        if self.initial_retry_delay == 0 {
            anyhow::bail!("initial_retry_delay must be greater than 0");
        }

        if self.connect_timeout.is_zero()
            || self.request_timeout.is_zero()
            || self.batch_post_timeout.is_zero()
        {
            anyhow::bail!("timeouts must be greater than 0");
        }

        Ok(())
    }

    /// Batch size as a non-zero count
    pub fn batch_size(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.max_records_per_batch).unwrap_or(NonZeroUsize::MIN)
    }

    /// HTTP client settings derived from this configuration
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings::with_retry(self.max_retries, self.initial_retry_delay, self.max_retry_delay)
            .with_timeouts(self.connect_timeout, self.request_timeout, self.batch_post_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("http://localhost:3123".to_string())
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse::<T>().ok())
        .unwrap_or(default)
}

fn env_secs_or(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}
