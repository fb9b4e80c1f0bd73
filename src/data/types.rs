use serde::{Deserialize, Deserializer, Serialize};
use serde::de::Error as _;
use serde_json::Number;
use chrono::{DateTime, Utc};

/// Raw `/api/predict` body as sent by the client. Every field is optional
/// here so that absence can be told apart from zero.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionPayload {
    pub batting_team: Option<String>,
    pub bowling_team: Option<String>,
    pub city: Option<String>,
    pub target: Option<f64>,
    pub score: Option<f64>,
    pub overs: Option<f64>,
    #[serde(default, deserialize_with = "whole_number")]
    pub wickets: Option<i64>,
}

// Accepts `3` and `3.0` alike; `3.5` is an error.
fn whole_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<f64>::deserialize(deserializer)? {
        None => Ok(None),
        Some(v) if v.is_finite() && v.fract() == 0.0 && v.abs() <= i64::MAX as f64 => Ok(Some(v as i64)),
        Some(v) => Err(D::Error::custom(format!("expected a whole number, got {}", v))),
    }
}

/// Validated match state. Serializes to the engine's field names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    pub batting_team: String,
    pub bowling_team: String,
    pub city: String,
    pub target: f64,
    pub score: f64,
    pub overs: f64,
    pub wickets: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batting_team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bowling_team: Option<String>,
    pub win_probability: Number,
    pub loss_probability: Number,
    pub runs_left: Number,
    pub balls_left: Number,
    pub current_run_rate: Number,
    pub required_run_rate: Number,
}

/// A completed prediction waiting to be written to the history store.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub request: PredictionRequest,
    pub win_probability: f64,
    pub loss_probability: f64,
}

impl HistoryEntry {
    pub fn new(request: &PredictionRequest, result: &PredictionResult) -> Self {
        Self {
            request: request.clone(),
            win_probability: result.win_probability.as_f64().unwrap_or_default(),
            loss_probability: result.loss_probability.as_f64().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: i64,
    pub batting_team: String,
    pub bowling_team: String,
    pub city: String,
    pub target: f64,
    pub score: f64,
    pub overs: f64,
    pub wickets: i64,
    pub win_probability: f64,
    pub loss_probability: f64,
    pub created_at: DateTime<Utc>,
}
