use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};
use crate::config::Config;
use crate::data::engine::{GatewayError, PredictionGateway};
use crate::data::reference::ReferenceData;
use crate::data::types::{PredictionPayload, PredictionResult};
use crate::history::reader::HistoryReader;
use crate::history::recorder::HistoryRecorder;
use crate::history::store::{HistoryStore, SqliteHistoryStore};
use crate::validation::{validate, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Engine(#[from] GatewayError),
}

/// Request lifecycle for predictions plus the read-only lookups.
pub struct Orchestrator {
    gateway: PredictionGateway,
    recorder: HistoryRecorder,
    reader: HistoryReader,
    reference: ReferenceData,
}

impl Orchestrator {
    pub fn new(gateway: PredictionGateway, store: Option<Arc<dyn HistoryStore>>) -> Self {
        Self {
            gateway,
            recorder: HistoryRecorder::new(store.clone()),
            reader: HistoryReader::new(store),
            reference: ReferenceData::load(),
        }
    }

    /// Wire every component from `config`. An unreachable history store is
    /// tolerated; the service then runs without one.
    pub fn from_config(config: &Config) -> Result<Self> {
        let gateway = PredictionGateway::new(config.engine_url.clone(), config.engine.clone())?;

        let store: Option<Arc<dyn HistoryStore>> = match SqliteHistoryStore::open(&config.database_path) {
            Ok(store) => {
                info!("History database ready: {}", config.database_path);
                Some(Arc::new(store))
            }
            Err(e) => {
                warn!(error = %e, "History database unavailable, continuing without it");
                None
            }
        };

        Ok(Self::new(gateway, store))
    }

    /// Validate, score, then queue the history write. Terminal on the first
    /// failure; recording never affects the outcome.
    pub async fn predict(&self, payload: PredictionPayload) -> Result<PredictionResult, PredictError> {
        let request = validate(payload)?;
        let result = self.gateway.predict(&request).await?;
        self.recorder.record(&request, &result);
        Ok(result)
    }

    pub fn gateway(&self) -> &PredictionGateway {
        &self.gateway
    }

    pub fn recorder(&self) -> &HistoryRecorder {
        &self.recorder
    }

    pub fn reader(&self) -> &HistoryReader {
        &self.reader
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }
}
