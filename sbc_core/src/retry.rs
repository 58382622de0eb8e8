//! Bounded retries around a [`ScheduleSource`].

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{
    cache::CacheState,
    schedule::RawScheduleRecord,
    upstream_client::{FetchError, ScheduleSource},
};

pub const DEFAULT_ATTEMPTS: u32 = 3;
pub const DEFAULT_DELAY: Duration = Duration::from_secs(5);

/// A fixed number of attempts with a fixed pause between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            delay: DEFAULT_DELAY,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("all retry attempts failed ({attempts} attempts): {last}")]
    RetryExhausted {
        attempts: u32,
        #[source]
        last: FetchError,
    },
    #[error("refresh cancelled")]
    Cancelled,
}

/// Fetch from `source` until an attempt succeeds or the budget is spent.
///
/// The first record of a successful response replaces the cache contents before this returns.
/// A cancelled `cancel` token interrupts the pause between attempts.
/// The pause only separates attempts, a final failure returns without waiting.
///
/// # Errors
///
/// Returns [`RefreshError::RetryExhausted`] carrying the last failure when no attempt succeeded,
/// or [`RefreshError::Cancelled`] when cancelled while waiting for the next attempt.
pub async fn fetch_with_retry(
    source: &dyn ScheduleSource,
    cache: &CacheState,
    config: &RetryConfig,
    cancel: &CancellationToken,
) -> Result<(), RefreshError> {
    let attempts = config.attempts.max(1);
    let mut attempt = 1;
    loop {
        match source.fetch_once().await.and_then(first_record) {
            Ok(record) => {
                cache.replace(&record).await;
                debug!(attempt, "fetch attempt succeeded");
                return Ok(());
            }
            Err(err) => {
                warn!(attempt, error = %err, "fetch attempt failed");
                if attempt >= attempts {
                    return Err(RefreshError::RetryExhausted {
                        attempts,
                        last: err,
                    });
                }
            }
        }
        tokio::select! {
            () = cancel.cancelled() => return Err(RefreshError::Cancelled),
            () = tokio::time::sleep(config.delay) => {}
        }
        attempt += 1;
    }
}

fn first_record(records: Vec<RawScheduleRecord>) -> Result<RawScheduleRecord, FetchError> {
    records.into_iter().next().ok_or(FetchError::EmptyResult)
}
