/*!

Retry loops for external API calls that fail with errors classified as `Transient`. Retries sleep
the calling task between attempts and are bounded by a total time ceiling per operation.

!*/

use crate::clients::{ApiError, ApiResult};
use log::{debug, warn};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// The first wait between attempts.
const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(500);
/// The longest wait between attempts.
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(10);
/// How long a create call is retried while a dependency becomes consistent.
pub const DEFAULT_CREATE_TIMEOUT: Duration = Duration::from_secs(2 * 60);
/// How long a delete call is retried while it races with other changes.
pub const DEFAULT_DELETE_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// A doubling backoff, capped at `max_delay`, that gives up once `timeout` has elapsed.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct RetryPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub timeout: Duration,
}

impl RetryPolicy {
    pub fn new(timeout: Duration) -> Self {
        Self {
            initial_delay: DEFAULT_INITIAL_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            timeout,
        }
    }

    pub fn create_default() -> Self {
        Self::new(DEFAULT_CREATE_TIMEOUT)
    }

    pub fn delete_default() -> Self {
        Self::new(DEFAULT_DELETE_TIMEOUT)
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(Duration::ZERO)
    }

    fn next_delay(&self, delay: Duration) -> Duration {
        std::cmp::min(delay.saturating_mul(2), self.max_delay)
    }
}

/// The outcome of a retry loop.
#[derive(Debug)]
pub enum Retried<T> {
    /// The call succeeded or failed with an error that is not retried.
    Done(ApiResult<T>),

    /// The call was still failing with a transient error when the time ceiling was reached. This
    /// holds the last error.
    TimedOut(ApiError),
}

impl<T> Retried<T> {
    /// Collapse the outcome into a result, surfacing the last transient error on time out.
    pub fn into_result(self) -> ApiResult<T> {
        match self {
            Retried::Done(result) => result,
            Retried::TimedOut(e) => Err(e),
        }
    }
}

/// Call `op` until it returns something other than a transient error or until `policy.timeout`
/// has elapsed. `what` describes the call in log messages.
pub async fn retry_transient<T, F, Fut>(policy: &RetryPolicy, what: &str, mut op: F) -> Retried<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ApiResult<T>>,
{
    let start = Instant::now();
    let mut delay = policy.initial_delay;
    let mut attempt = 1u32;
    loop {
        match op().await {
            Err(e) if e.is_transient() => {
                let elapsed = start.elapsed();
                if elapsed >= policy.timeout {
                    warn!(
                        "{} still failing after {} attempt(s) in {:?}: {}",
                        what, attempt, elapsed, e
                    );
                    return Retried::TimedOut(e);
                }
                let wait = std::cmp::min(delay, policy.timeout - elapsed);
                warn!("{} failed with a transient error, retrying in {:?}: {}", what, wait, e);
                sleep(wait).await;
                delay = policy.next_delay(delay);
                attempt += 1;
            }
            result => {
                debug!("{} finished after {} attempt(s)", what, attempt);
                return Retried::Done(result);
            }
        }
    }
}
