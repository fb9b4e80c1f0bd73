//! Shared fixtures for the unit tests: a fake scoring engine served over
//! real HTTP, and a history store that always fails.

use std::net::TcpListener as StdListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use crate::data::types::{HistoryEntry, HistoryRecord, PredictionRequest};
use crate::history::store::{HistoryStore, StoreError};

pub fn sample_request() -> PredictionRequest {
    PredictionRequest {
        batting_team: "A".into(),
        bowling_team: "B".into(),
        city: "X".into(),
        target: 180.0,
        score: 90.0,
        overs: 10.0,
        wickets: 3,
    }
}

pub fn sample_engine_reply() -> Value {
    json!({
        "win_probability": 55,
        "loss_probability": 45,
        "runs_left": 90,
        "balls_left": 60,
        "current_run_rate": 9.0,
        "required_run_rate": 9.0
    })
}

/// A local port with nothing listening on it.
pub fn unreachable_url() -> String {
    let listener = StdListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

#[derive(Clone)]
struct EngineState {
    status: StatusCode,
    reply: Arc<String>,
    delay: Duration,
    hits: Arc<AtomicUsize>,
    bodies: Arc<Mutex<Vec<Value>>>,
}

pub struct FakeEngine {
    url: String,
    state: EngineState,
}

impl FakeEngine {
    pub async fn success() -> Self {
        Self::start(StatusCode::OK, sample_engine_reply().to_string()).await
    }

    pub async fn start(status: StatusCode, reply: String) -> Self {
        Self::spawn(status, reply, Duration::ZERO).await
    }

    /// An engine that accepts the request, then sits on it for `delay`
    /// before answering.
    pub async fn stalled(delay: Duration) -> Self {
        Self::spawn(StatusCode::OK, sample_engine_reply().to_string(), delay).await
    }

    async fn spawn(status: StatusCode, reply: String, delay: Duration) -> Self {
        let state = EngineState {
            status,
            reply: Arc::new(reply),
            delay,
            hits: Arc::new(AtomicUsize::new(0)),
            bodies: Arc::new(Mutex::new(Vec::new())),
        };

        let app = Router::new()
            .route("/predict", post(predict))
            .route("/health", get(health))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}", addr),
            state,
        }
    }

    pub fn url(&self) -> String {
        self.url.clone()
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn bodies(&self) -> Vec<Value> {
        self.state.bodies.lock().unwrap().clone()
    }
}

async fn predict(State(state): State<EngineState>, Json(body): Json<Value>) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.bodies.lock().unwrap().push(body);
    tokio::time::sleep(state.delay).await;
    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.reply.as_str().to_owned(),
    )
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "model_loaded": true }))
}

/// Store double whose every call fails.
pub struct BrokenStore;

impl HistoryStore for BrokenStore {
    fn insert(&self, _entry: &HistoryEntry) -> Result<HistoryRecord, StoreError> {
        Err(StoreError::Unavailable("disk on fire".into()))
    }

    fn recent(&self, _limit: usize) -> Result<Vec<HistoryRecord>, StoreError> {
        Err(StoreError::Unavailable("disk on fire".into()))
    }
}
