//! Retry logic with quadratic backoff for upload batches.

use crate::cli::{RetryPolicy, RuntimeConfig};
use crate::error::{Result, UploadError};

/// Retry an async operation with quadratic backoff
///
/// - Recoverable errors: wait 1s, 4s, 9s, ... and try again
/// - Unrecoverable errors: return immediately without retry
///
/// After `policy.max_attempts()` failed attempts the last error is folded
/// into [`UploadError::RetriesExhausted`]. No wait follows the final attempt.
///
/// # Arguments
/// * `operation` - Async closure that returns Result<T>
/// * `policy` - Attempt limit and backoff schedule
/// * `operation_name` - Human-readable name for logging
/// * `config` - Runtime config for user messaging
pub async fn retry_with_backoff<F, T, Fut>(
    mut operation: F,
    policy: &RetryPolicy,
    operation_name: &str,
    config: &RuntimeConfig,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts().max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    let _ = config.success_println(&format!(
                        "{operation_name} succeeded on attempt {attempt}"
                    ));
                }
                return Ok(result);
            }
            Err(e) => {
                if !e.is_recoverable() {
                    config.error_println(&format!(
                        "{operation_name} failed with unrecoverable error"
                    ));
                    return Err(e);
                }

                if attempt >= max_attempts {
                    log::error!("{operation_name} failed after {attempt} attempt(s): {e}");
                    return Err(UploadError::RetriesExhausted {
                        attempts: attempt,
                        last: e.to_string(),
                    });
                }

                let wait = policy.delay_after(attempt);
                log::warn!(
                    "{operation_name} attempt {attempt}/{max_attempts} failed: {e}"
                );
                // Best effort: a broken stdout must not cut the backoff short
                let _ = config.warning_println(&format!(
                    "Failed to upload due to {e}.  Trying again in {} seconds",
                    wait.as_secs()
                ));

                tokio::time::sleep(wait).await;
            }
        }
    }
}
