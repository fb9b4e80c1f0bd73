use std::sync::Arc;
use crate::data::types::HistoryRecord;
use crate::history::store::{HistoryStore, StoreError};

pub const HISTORY_LIMIT: usize = 10;

/// Read side of the prediction history.
pub struct HistoryReader {
    store: Option<Arc<dyn HistoryStore>>,
}

impl HistoryReader {
    pub fn new(store: Option<Arc<dyn HistoryStore>>) -> Self {
        Self { store }
    }

    /// The ten most recent records, newest first.
    pub async fn recent(&self) -> Result<Vec<HistoryRecord>, StoreError> {
        let store = self
            .store
            .clone()
            .ok_or_else(|| StoreError::Unavailable("no history store available".to_string()))?;

        tokio::task::spawn_blocking(move || store.recent(HISTORY_LIMIT))
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
    }
}
