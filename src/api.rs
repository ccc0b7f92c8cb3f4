// src/api.rs
//! HTTP surface: `/health`, `/rank`, `/select`.
//!
//! Scoring is CPU-bound (TF-IDF or ONNX inference), so handlers move the work onto
//! the blocking pool and keep the async workers free.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shuttle_axum::axum::{
    extract::{rejection::JsonRejection, FromRequest, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::analyze::{
    BlendedCandidate, RankRequest, RankingEngine, ScoredCandidate, Strategy, DEFAULT_TOP_K,
};
use crate::candidate::Candidate;
use crate::error::RankError;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RankingEngine>,
    /// Used when a request omits `top_k`.
    pub default_top_k: usize,
}

impl AppState {
    pub fn new(engine: RankingEngine, default_top_k: usize) -> Self {
        Self {
            engine: Arc::new(engine),
            default_top_k: default_top_k.max(1),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(RankingEngine::lexical(), DEFAULT_TOP_K)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/rank", post(rank))
        .route("/select", post(select))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Serialize)]
struct RankResp {
    strategy: Strategy,
    results: Vec<ScoredCandidate>,
}

#[derive(Deserialize)]
struct SelectBody {
    keyword: String,
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Serialize)]
struct SelectResp {
    selected: Option<BlendedCandidate>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
    retryable: bool,
}

/// `Json` extractor whose rejections use the same error body as
/// every other failure.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
struct ApiJson<T>(T);

/// Error wrapper so handlers can `?` domain errors into HTTP responses.
pub struct ApiError(RankError);

impl From<RankError> for ApiError {
    fn from(e: RankError) -> Self {
        Self(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(RankError::InvalidInput(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            RankError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            RankError::BackendUnavailable(_) | RankError::ScoringFailure(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        };
        let body = ErrorBody {
            error: self.0.to_string(),
            kind: self.0.kind(),
            retryable: self.0.is_retryable(),
        };
        (status, Json(body)).into_response()
    }
}

fn join_failure(e: tokio::task::JoinError) -> ApiError {
    tracing::warn!(error = ?e, "ranking task did not complete");
    ApiError(RankError::ScoringFailure("ranking task did not complete".into()))
}

async fn rank(
    State(state): State<AppState>,
    ApiJson(mut req): ApiJson<RankRequest>,
) -> Result<Json<RankResp>, ApiError> {
    req.top_k.get_or_insert(state.default_top_k);
    let engine = state.engine.clone();
    let results = tokio::task::spawn_blocking(move || engine.rank_request(&req))
        .await
        .map_err(join_failure)??;

    Ok(Json(RankResp {
        strategy: state.engine.strategy(),
        results,
    }))
}

async fn select(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SelectBody>,
) -> Result<Json<SelectResp>, ApiError> {
    let engine = state.engine.clone();
    let selected =
        tokio::task::spawn_blocking(move || engine.select_best(&body.candidates, &body.keyword))
            .await
            .map_err(join_failure)??;

    Ok(Json(SelectResp { selected }))
}
