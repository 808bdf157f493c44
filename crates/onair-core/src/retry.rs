//! Bounded retry for outbound HTTP calls.
//!
//! Each client crate decides which of its errors are transient; this module
//! only owns the attempt counting and the delay schedule.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Longest single wait between attempts.
pub const MAX_DELAY_MS: u64 = 60_000;

/// Un-jittered delay before retry number `attempt` (1-based):
/// `backoff_base_secs * 2^(attempt-1)` seconds, capped at [`MAX_DELAY_MS`].
#[must_use]
pub fn backoff_delay_ms(backoff_base_secs: u64, attempt: u32) -> u64 {
    let factor = 1u64 << attempt.saturating_sub(1).min(10);
    backoff_base_secs
        .saturating_mul(1000)
        .saturating_mul(factor)
        .min(MAX_DELAY_MS)
}

/// Scales `delay_ms` into the range [75 %, 125 %).
fn jittered(delay_ms: u64) -> Duration {
    let scale = 0.75 + rand::random::<f64>() * 0.5;
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let millis = (delay_ms as f64 * scale) as u64;
    Duration::from_millis(millis)
}

/// Awaits `operation` until it succeeds, fails with an error that
/// `is_retriable` rejects, or has been retried `max_retries` times.
///
/// # Errors
///
/// Returns the last error produced by `operation`.
pub async fn retry_with_backoff<T, E, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    is_retriable: fn(&E) -> bool,
    mut operation: F,
) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut retries = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if retries == max_retries || !is_retriable(&err) {
            return Err(err);
        }
        retries += 1;

        let delay = jittered(backoff_delay_ms(backoff_base_secs, retries));
        tracing::warn!(
            retry = retries,
            max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "transient error, backing off"
        );
        tokio::time::sleep(delay).await;
    }
}
