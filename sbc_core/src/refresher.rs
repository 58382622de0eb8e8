//! Background task keeping the cache up to date.

use std::{sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::{
    cache::CacheState,
    retry::{fetch_with_retry, RefreshError, RetryConfig},
    upstream_client::ScheduleSource,
};

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(15 * 60);

pub struct Refresher {
    source: Arc<dyn ScheduleSource>,
    cache: Arc<CacheState>,
    retry: RetryConfig,
    interval: Duration,
    cancel: CancellationToken,
}

impl Refresher {
    pub fn new(
        source: Arc<dyn ScheduleSource>,
        cache: Arc<CacheState>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            source,
            cache,
            retry: RetryConfig::default(),
            interval: DEFAULT_REFRESH_INTERVAL,
            cancel,
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Run one fetch cycle with retries.
    ///
    /// # Errors
    ///
    /// See [`fetch_with_retry`].
    pub async fn refresh(&self) -> Result<(), RefreshError> {
        fetch_with_retry(
            self.source.as_ref(),
            &self.cache,
            &self.retry,
            &self.cancel,
        )
        .await
    }

    /// Run one fetch cycle and log its outcome.
    ///
    /// Returns whether the cache was updated.
    pub async fn refresh_and_log(&self) -> bool {
        match self.refresh().await {
            Ok(()) => {
                info!("schedule updated");
                true
            }
            Err(RefreshError::Cancelled) => {
                debug!("schedule update cancelled");
                false
            }
            Err(err) => {
                error!(error = %err, "failed to update schedule");
                false
            }
        }
    }

    /// Refresh every interval until cancelled.
    ///
    /// The first cycle starts after one interval, the startup fetch is expected to go through
    /// [`Refresher::refresh_and_log`] before the server starts.
    pub async fn run(self) {
        info!(
            interval_secs = self.interval.as_secs(),
            "schedule refresher started"
        );
        loop {
            tokio::select! {
                () = self.cancel.cancelled() => break,
                () = tokio::time::sleep(self.interval) => {}
            }
            self.refresh_and_log().await;
        }
        info!("schedule refresher stopped");
    }
}
