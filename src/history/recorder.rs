use std::sync::Arc;
use tokio::task::JoinError;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};
use crate::data::types::{HistoryEntry, HistoryRecord, PredictionRequest, PredictionResult};
use crate::history::store::{HistoryStore, StoreError};

/// Why a best-effort write did not land. Logged, never returned to callers.
#[derive(Debug, thiserror::Error)]
pub enum RecordingFailed {
    #[error("no history store available")]
    NoStore,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("writer task aborted: {0}")]
    Aborted(#[from] JoinError),
}

/// Fire-and-forget writer for completed predictions.
///
/// Each write runs as a detached task tracked by a [`TaskTracker`], so the
/// caller's response never waits on the store and shutdown can drain
/// whatever is still in flight.
pub struct HistoryRecorder {
    store: Option<Arc<dyn HistoryStore>>,
    tracker: TaskTracker,
}

impl HistoryRecorder {
    pub fn new(store: Option<Arc<dyn HistoryStore>>) -> Self {
        Self {
            store,
            tracker: TaskTracker::new(),
        }
    }

    /// Queue a write of `result`. Must only be called after a successful
    /// engine call.
    pub fn record(&self, request: &PredictionRequest, result: &PredictionResult) {
        let entry = HistoryEntry::new(request, result);
        let store = self.store.clone();

        self.tracker.spawn(async move {
            match write(store, entry).await {
                Ok(record) => debug!(id = record.id, "Prediction recorded"),
                Err(e) => warn!(error = %e, "Database save skipped"),
            }
        });
    }

    /// Wait for every write queued so far.
    pub async fn drain(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    pub fn pending(&self) -> usize {
        self.tracker.len()
    }
}

async fn write(
    store: Option<Arc<dyn HistoryStore>>,
    entry: HistoryEntry,
) -> Result<HistoryRecord, RecordingFailed> {
    let store = store.ok_or(RecordingFailed::NoStore)?;
    let record = tokio::task::spawn_blocking(move || store.insert(&entry)).await??;
    Ok(record)
}
