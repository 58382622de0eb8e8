//! This crate polls Simbio's waste collection service for one address and keeps the latest
//! collection dates in memory for the server and the CLI.
//!
//! The dates are read from <https://www.simbio.si/sl/moj-dan-odvoza-odpadkov>.

pub mod cache;
pub mod refresher;
pub mod retry;
pub mod schedule;
pub mod settings;
pub mod upstream_client;

pub use cache::{CacheEntry, CacheState};
pub use refresher::Refresher;
pub use retry::{fetch_with_retry, RefreshError, RetryConfig};
pub use schedule::{ApiProjection, DisplayProjection, RawScheduleRecord};
pub use settings::Settings;
pub use upstream_client::{FetchError, ScheduleSource, UpstreamClient};
