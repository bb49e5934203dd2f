//! Bounded retry with classified backoff
//!
//! `run_with_retry` drives an operation for at most `max_attempts` tries. After
//! each failure a classifier decides whether the error is terminal or
//! retryable, and for retryable errors which `Backoff` schedule applies. The
//! caller gets a `RetryOutcome` back instead of an error, so failures can be
//! turned into data at the call site.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::{error, warn};

/// Delay schedule keyed on the zero-based attempt number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// `unit * base^attempt`, optionally capped at `max`
    Exponential {
        base: u32,
        unit: Duration,
        max: Option<Duration>,
    },
    /// `initial + step * attempt`, capped at `max`
    Linear {
        initial: Duration,
        step: Duration,
        max: Duration,
    },
    /// Same wait after every attempt
    Fixed(Duration),
}

impl Backoff {
    /// Exponential schedule in whole seconds
    pub fn exponential(base: u32, max: Option<Duration>) -> Self {
        Self::Exponential {
            base,
            unit: Duration::from_secs(1),
            max,
        }
    }

    /// Delay to wait after the failed attempt `attempt`
    pub fn delay(&self, attempt: u32) -> Duration {
        match *self {
            Self::Exponential { base, unit, max } => {
                let factor = u64::from(base)
                    .saturating_pow(attempt)
                    .min(u64::from(u32::MAX)) as u32;
                let delay = unit.saturating_mul(factor);
                max.map_or(delay, |max| delay.min(max))
            }
            Self::Linear { initial, step, max } => {
                initial.saturating_add(step.saturating_mul(attempt)).min(max)
            }
            Self::Fixed(delay) => delay,
        }
    }
}

/// How a failed attempt should be handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Try again after waiting per the schedule
    Retryable(Backoff),
    /// Stop immediately
    Terminal,
}

/// Result of a retried operation
#[derive(Debug)]
pub enum RetryOutcome<T, E> {
    /// The operation succeeded
    Completed { value: T, attempts: u32 },
    /// The operation failed with an error classified as terminal
    Terminal { error: E, attempts: u32 },
    /// Every attempt failed with a retryable error
    Exhausted { error: E, attempts: u32 },
}

impl<T, E> RetryOutcome<T, E> {
    /// Number of times the operation was invoked
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Completed { attempts, .. }
            | Self::Terminal { attempts, .. }
            | Self::Exhausted { attempts, .. } => *attempts,
        }
    }

    /// The successful value, discarding the failure reason
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Completed { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Runs `op` until it succeeds, fails terminally, or `max_attempts` is reached
///
/// # Arguments
/// * `max_attempts` - Upper bound on invocations of `op` (at least one is made)
/// * `target` - Label used in log lines, typically the URL
/// * `op` - The operation; receives the zero-based attempt number
/// * `classify` - Maps an error to terminal or retryable-with-backoff
///
/// No wait is inserted after the final attempt.
pub async fn run_with_retry<T, E, Op, Fut, Classify>(
    max_attempts: u32,
    target: &str,
    mut op: Op,
    classify: Classify,
) -> RetryOutcome<T, E>
where
    E: Display,
    Op: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    Classify: Fn(&E) -> ErrorClass,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 0;

    loop {
        let error = match op(attempt).await {
            Ok(value) => {
                return RetryOutcome::Completed {
                    value,
                    attempts: attempt + 1,
                };
            }
            Err(error) => error,
        };

        let backoff = match classify(&error) {
            ErrorClass::Terminal => {
                error!("{} for {}, not retrying", error, target);
                return RetryOutcome::Terminal {
                    error,
                    attempts: attempt + 1,
                };
            }
            ErrorClass::Retryable(backoff) => backoff,
        };

        if attempt + 1 >= max_attempts {
            warn!(
                "{} for {}, attempt {}/{}",
                error,
                target,
                attempt + 1,
                max_attempts
            );
            error!("Failed {} after {} attempts", target, max_attempts);
            return RetryOutcome::Exhausted {
                error,
                attempts: max_attempts,
            };
        }

        let wait = backoff.delay(attempt);
        warn!(
            "{} for {}, attempt {}/{}, waiting {:?}",
            error,
            target,
            attempt + 1,
            max_attempts,
            wait
        );
        tokio::time::sleep(wait).await;
        attempt += 1;
    }
}
