//! Client settings
//!
//! Timeouts and retry schedules for the source API. The defaults mirror the
//! production tuning: 5 attempts, exponential server backoff capped at 16s,
//! progressive timeout backoff capped at 10s.

use std::time::Duration;

use crate::retry::Backoff;

/// Timeouts and retry schedules applied to every call of a `SourceClient`
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    /// Time allowed to establish a connection
    pub connect_timeout: Duration,

    /// Total time allowed for a single GET
    pub request_timeout: Duration,

    /// Total time allowed for a single batch POST
    pub batch_post_timeout: Duration,

    /// Attempts per call, including the first one
    pub max_attempts: u32,

    /// Wait after a 5xx or connection failure on a fetch
    pub server_backoff: Backoff,

    /// Wait after a fetch timed out
    pub timeout_backoff: Backoff,

    /// Wait after a 5xx on a batch post
    pub post_server_backoff: Backoff,

    /// Wait after a batch post timed out
    pub post_timeout_backoff: Backoff,

    /// Wait after any other batch post failure
    pub post_error_backoff: Backoff,
}

impl ClientSettings {
    /// Builds the exponential schedules from a base and a cap, in seconds
    ///
    /// # Arguments
    /// * `max_attempts` - Attempts per call
    /// * `base` - Exponential base; attempt `n` waits `base^n` seconds
    /// * `max_delay` - Upper bound for fetch backoff
    pub fn with_retry(max_attempts: u32, base: u32, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            server_backoff: Backoff::exponential(base, Some(max_delay)),
            post_server_backoff: Backoff::exponential(base, None),
            ..Self::default()
        }
    }

    /// Sets the connect, request and batch post timeouts
    pub fn with_timeouts(
        mut self,
        connect_timeout: Duration,
        request_timeout: Duration,
        batch_post_timeout: Duration,
    ) -> Self {
        self.connect_timeout = connect_timeout;
        self.request_timeout = request_timeout;
        self.batch_post_timeout = batch_post_timeout;
        self
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(20),
            batch_post_timeout: Duration::from_secs(60),
            max_attempts: 5,
            server_backoff: Backoff::exponential(2, Some(Duration::from_secs(16))),
            timeout_backoff: Backoff::Linear {
                initial: Duration::from_secs(3),
                step: Duration::from_secs(2),
                max: Duration::from_secs(10),
            },
            post_server_backoff: Backoff::exponential(2, None),
            post_timeout_backoff: Backoff::Fixed(Duration::from_secs(5)),
            post_error_backoff: Backoff::Fixed(Duration::from_secs(2)),
        }
    }
}
