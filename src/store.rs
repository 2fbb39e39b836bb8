//! In-memory record list with last-known-good semantics

use crate::{error::FetchError, types::CoinRecord};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Immutable view of the record list at one point in time
#[derive(Debug, Clone, Default)]
pub struct RecordSnapshot {
    pub records: Arc<Vec<CoinRecord>>,
    /// When the list was last replaced; `None` before the first success
    pub last_updated: Option<DateTime<Utc>>,
    /// Error of the most recent fetch, cleared by the next success
    pub last_error: Option<FetchError>,
}

impl RecordSnapshot {
    /// True once at least one fetch has succeeded
    pub fn has_loaded(&self) -> bool {
        self.last_updated.is_some()
    }

    /// Age of the list in seconds, `None` before the first success
    pub fn age_secs(&self) -> Option<u64> {
        self.last_updated
            .map(|t| Utc::now().signed_duration_since(t).num_seconds().max(0) as u64)
    }
}

/// Store for the market record list
///
/// The list sits behind an `Arc` that is swapped as a whole on each
/// successful fetch, so readers holding a snapshot never see a partial list.
/// Failed fetches only record the error.
pub struct RecordStore {
    inner: RwLock<RecordSnapshot>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(RecordSnapshot::default()),
        }
    }

    /// Replaces the whole list and clears the last error
    pub async fn replace(&self, records: Vec<CoinRecord>) {
        let count = records.len();
        let mut inner = self.inner.write().await;
        inner.records = Arc::new(records);
        inner.last_updated = Some(Utc::now());
        inner.last_error = None;
        tracing::debug!(count = count, "Replaced record list");
    }

    /// Records a failed fetch, keeping the current list
    pub async fn record_failure(&self, error: FetchError) {
        let mut inner = self.inner.write().await;
        tracing::debug!(
            retained = inner.records.len(),
            error = %error,
            "Keeping last known good record list"
        );
        inner.last_error = Some(error);
    }

    /// Current snapshot
    pub async fn snapshot(&self) -> RecordSnapshot {
        self.inner.read().await.clone()
    }

    /// Current record list
    pub async fn records(&self) -> Arc<Vec<CoinRecord>> {
        self.inner.read().await.records.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}
