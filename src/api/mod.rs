use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use crate::orchestrator::Orchestrator;

pub mod error;
pub mod routes;

pub type AppState = Arc<Orchestrator>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/health/engine", get(routes::engine_health))
        .route("/api/teams", get(routes::teams))
        .route("/api/cities", get(routes::cities))
        .route("/api/predict", post(routes::predict))
        .route("/api/history", get(routes::history))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
