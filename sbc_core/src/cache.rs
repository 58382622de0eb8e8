//! In-memory cache holding the views of the latest successful fetch.

use tokio::sync::RwLock;

use crate::schedule::{ApiProjection, DisplayProjection, RawScheduleRecord};

/// Both views, always derived from the same record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheEntry {
    pub display: DisplayProjection,
    pub api: ApiProjection,
}

impl From<&RawScheduleRecord> for CacheEntry {
    fn from(value: &RawScheduleRecord) -> Self {
        CacheEntry {
            display: DisplayProjection::from(value),
            api: ApiProjection::from(value),
        }
    }
}

/// Shared cache state.
///
/// Starts out empty and is replaced as a whole on every successful fetch, so readers see either
/// the empty entry or both views of one record.
#[derive(Debug, Default)]
pub struct CacheState {
    entry: RwLock<CacheEntry>,
}

impl CacheState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install both views of `record`.
    ///
    /// The views are built before the write lock is taken; only the assignment happens under it.
    pub async fn replace(&self, record: &RawScheduleRecord) {
        let entry = CacheEntry::from(record);
        *self.entry.write().await = entry;
    }

    pub async fn read_display(&self) -> DisplayProjection {
        self.entry.read().await.display.clone()
    }

    pub async fn read_api(&self) -> ApiProjection {
        self.entry.read().await.api.clone()
    }

    /// Both views from a single read.
    pub async fn snapshot(&self) -> CacheEntry {
        self.entry.read().await.clone()
    }
}
