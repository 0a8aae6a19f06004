//! Retry policy for Airtable requests.
//!
//! Transient failures (network errors, 429, 5xx) are retried; everything
//! else is returned on the first attempt. A 429 waits at least as long as
//! the `Retry-After` header asked for.

use std::future::Future;
use std::time::Duration;

use crate::error::AirtableError;

/// Upper bound on any single wait, `Retry-After` included.
const MAX_DELAY_MS: u64 = 60_000;

/// Jitter is applied in thousandths: the exponential delay is scaled by a
/// factor drawn from `[0.750, 1.250)`.
const JITTER_PERMILLE: std::ops::Range<u64> = 750..1250;

/// Returns `true` for errors that are worth another attempt.
///
/// **Retriable:**
/// - [`AirtableError::Http`] timeouts and connection failures.
/// - [`AirtableError::RateLimited`]: Airtable allows five requests per second per base.
/// - [`AirtableError::Api`] with a 5xx status.
///
/// **Not retriable:** 4xx API errors (bad credential, unknown table, invalid
/// formula, expired offset), malformed bodies, the pagination guard, and
/// URL construction failures.
pub(crate) fn is_retriable(err: &AirtableError) -> bool {
    match err {
        AirtableError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        AirtableError::RateLimited { .. } => true,
        AirtableError::Api { status, .. } => *status >= 500,
        AirtableError::Deserialize { .. }
        | AirtableError::PaginationLimit { .. }
        | AirtableError::InvalidUrl { .. } => false,
    }
}

/// How many extra attempts a request gets and how long to wait between them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    pub(crate) max_retries: u32,
    pub(crate) base_delay_ms: u64,
}

impl RetryPolicy {
    pub(crate) fn new(max_retries: u32, base_delay_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay_ms,
        }
    }

    /// Wait before retry number `retry` (1-based) after `err`.
    ///
    /// The exponential part is `base_delay_ms * 2^(retry-1)` scaled by
    /// `jitter_permille / 1000`. A rate-limit error raises that to its
    /// `Retry-After` value. The result never exceeds [`MAX_DELAY_MS`].
    fn delay(self, err: &AirtableError, retry: u32, jitter_permille: u64) -> Duration {
        let doublings = retry.saturating_sub(1).min(16);
        let exponential = self
            .base_delay_ms
            .saturating_mul(1 << doublings)
            .saturating_mul(jitter_permille)
            / 1000;

        let floor = match err {
            AirtableError::RateLimited { retry_after_secs } => {
                retry_after_secs.saturating_mul(1000)
            }
            _ => 0,
        };

        Duration::from_millis(exponential.max(floor).min(MAX_DELAY_MS))
    }

    /// Runs `request` until it succeeds, fails permanently, or the retry
    /// budget is spent. The last error is returned as-is.
    pub(crate) async fn run<T, F, Fut>(self, mut request: F) -> Result<T, AirtableError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AirtableError>>,
    {
        let mut retry = 0u32;
        loop {
            let err = match request().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            if retry == self.max_retries || !is_retriable(&err) {
                return Err(err);
            }
            retry += 1;

            let wait = self.delay(&err, retry, rand::random_range(JITTER_PERMILLE));
            tracing::warn!(
                retry,
                max_retries = self.max_retries,
                wait_ms = u64::try_from(wait.as_millis()).unwrap_or(MAX_DELAY_MS),
                error = %err,
                "Airtable request failed, retrying"
            );
            tokio::time::sleep(wait).await;
        }
    }
}
