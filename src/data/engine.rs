use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{error, warn};
use crate::config::EnginePolicy;
use crate::data::types::{PredictionRequest, PredictionResult};

/// Client for the external scoring engine.
pub struct PredictionGateway {
    client: Client,
    base_url: String,
    policy: EnginePolicy,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("{0}")]
    EngineUnavailable(String),
}

#[derive(Debug, Deserialize)]
struct EngineErrorBody {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineHealth {
    pub status: String,
    #[serde(default)]
    pub model_loaded: bool,
}

impl PredictionGateway {
    pub fn new(base_url: String, policy: EnginePolicy) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = policy.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build engine HTTP client")?;

        Ok(Self {
            client,
            base_url,
            policy,
        })
    }

    /// Score a validated request. Only transport failures are retried, and
    /// only as many times as the policy allows.
    pub async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, GatewayError> {
        let url = format!("{}/predict", self.base_url);
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            match self.client.post(&url).json(request).send().await {
                Ok(response) => return read_result(response).await,
                Err(e) if attempt <= self.policy.max_retries => {
                    warn!(attempt, error = %e, "Engine call failed, retrying");
                    tokio::time::sleep(self.policy.backoff()).await;
                }
                Err(e) => {
                    error!(attempt, error = %e, "Engine unreachable");
                    return Err(GatewayError::EngineUnavailable(e.to_string()));
                }
            }
        }
    }

    /// Probe the engine's own health endpoint.
    pub async fn health(&self) -> Result<EngineHealth, GatewayError> {
        let url = format!("{}/health", self.base_url);

        let response = self.client
            .get(&url)
            .send()
            .await
            .map_err(|e| GatewayError::EngineUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GatewayError::EngineUnavailable(format!(
                "engine responded with status {}",
                response.status().as_u16()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::EngineUnavailable(format!("invalid engine response: {}", e)))
    }
}

async fn read_result(response: Response) -> Result<PredictionResult, GatewayError> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| GatewayError::EngineUnavailable(e.to_string()))?;

    if !status.is_success() {
        let message = serde_json::from_slice::<EngineErrorBody>(&body)
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| format!("engine responded with status {}", status.as_u16()));
        error!(status = status.as_u16(), %message, "Engine rejected prediction");
        return Err(GatewayError::EngineUnavailable(message));
    }

    serde_json::from_slice(&body).map_err(|e| {
        error!(error = %e, "Engine returned an undecodable body");
        GatewayError::EngineUnavailable(format!("invalid engine response: {}", e))
    })
}
