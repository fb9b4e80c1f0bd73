use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};
use crate::api::error::ApiError;
use crate::api::AppState;
use crate::data::types::{PredictionPayload, PredictionResult};
use crate::validation::ValidationError;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "Backend server is running" }))
}

pub async fn engine_health(State(state): State<AppState>) -> impl IntoResponse {
    match state.gateway().health().await {
        Ok(health) => (
            StatusCode::OK,
            Json(json!({ "status": health.status, "model_loaded": health.model_loaded })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable", "message": e.to_string() })),
        ),
    }
}

pub async fn teams(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "teams": state.reference().teams() }))
}

pub async fn cities(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "cities": state.reference().cities() }))
}

pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictionPayload>, JsonRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    let Json(payload) = payload.map_err(|e| ValidationError::MalformedBody(e.body_text()))?;
    let result = state.predict(payload).await?;
    Ok(Json(result))
}

pub async fn history(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let predictions = state.reader().recent().await?;
    Ok(Json(json!({ "predictions": predictions })))
}
