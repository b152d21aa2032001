//! Retrying execution of remote calls.
//!
//! One `execute` call owns one [`RetryState`]; nothing here is shared, so
//! concurrent calls never interfere and tests can run in parallel.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::sleep;

use crate::backend::BackendError;

use super::error::EngineError;

/// Longest delay a `Retry-After` header may impose.
pub const RETRY_AFTER_CAP: Duration = Duration::from_secs(60);

/// Retry and backoff settings for one remote call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Additional attempts allowed after the first failure.
    pub max_retries: u32,
    /// Backoff delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound of the exponential backoff schedule.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10_000),
        }
    }
}

impl RetryPolicy {
    /// Exponential backoff delay for the given zero-based attempt.
    fn backoff(&self, attempt: u32) -> Duration {
        self.initial_delay
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.max_delay)
    }
}

/// Book-keeping for a single `execute` call; never persisted across calls.
#[derive(Debug, Default)]
struct RetryState {
    attempt: u32,
    last_trace: Option<String>,
}

impl RetryState {
    /// Remembers the correlation id of the most recent response that
    /// carried one, so even a final transport error can name it.
    fn observe(&mut self, error: &BackendError) {
        if let Some(id) = error.trace_id() {
            self.last_trace = Some(id.to_string());
        }
    }
}

/// Runs `call` until it succeeds, fails with a non-retryable status, or
/// exhausts the retry budget.
///
/// Client errors other than 429 fail immediately. A 429 honors its
/// `Retry-After` header (seconds or HTTP date, clamped to
/// [`RETRY_AFTER_CAP`]) in place of the exponential schedule; server and
/// transport errors back off exponentially.
pub async fn execute<T, F, Fut>(policy: &RetryPolicy, mut call: F) -> Result<T, EngineError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, BackendError>>,
{
    let mut state = RetryState::default();

    loop {
        match call().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                state.observe(&error);

                if !error.is_retryable() || state.attempt >= policy.max_retries {
                    return Err(classify(&error, state.last_trace.as_deref()));
                }

                let delay = error
                    .retry_after()
                    .and_then(parse_retry_after)
                    .unwrap_or_else(|| policy.backoff(state.attempt));

                sleep(delay).await;
                state.attempt += 1;
            }
        }
    }
}

/// Maps the final backend error onto the engine taxonomy.
fn classify(error: &BackendError, trace: Option<&str>) -> EngineError {
    let message = trace.map_or_else(
        || error.to_string(),
        |id| format!("{error} (request-id: {id})"),
    );

    match error.status() {
        Some(401 | 403) => EngineError::Auth(message),
        Some(456) => EngineError::Quota(message),
        Some(429) => EngineError::RateLimit(message),
        Some(status) if (400..500).contains(&status) => EngineError::Validation(message),
        _ => EngineError::Network(message),
    }
}

/// Parses a `Retry-After` header value into a bounded delay.
///
/// Accepts delay-seconds or an HTTP date; the result is clamped to
/// `[0, RETRY_AFTER_CAP]`. Returns `None` for values in neither form, so
/// the caller falls back to exponential backoff.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    parse_retry_after_at(value, Utc::now())
}

fn parse_retry_after_at(value: &str, now: DateTime<Utc>) -> Option<Duration> {
    let value = value.trim();

    if let Ok(seconds) = value.parse::<i64>() {
        return Some(clamp_seconds(seconds));
    }

    let date = DateTime::parse_from_rfc2822(value).ok()?;
    Some(clamp_seconds(date.signed_duration_since(now).num_seconds()))
}

fn clamp_seconds(seconds: i64) -> Duration {
    let bounded = seconds.clamp(0, RETRY_AFTER_CAP.as_secs() as i64);
    Duration::from_secs(bounded as u64)
}
