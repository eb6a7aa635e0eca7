//! Router construction and the request handlers.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use negaposi_core::{Classify, Verdict};

use crate::ApiError;

/// Read-only request context, built once at startup.
#[derive(Clone)]
pub struct AppState {
    service: Arc<dyn Classify>,
    model: String,
    dim: usize,
}

impl AppState {
    pub fn new(service: Arc<dyn Classify>, model: impl Into<String>, dim: usize) -> Self {
        Self {
            service,
            model: model.into(),
            dim,
        }
    }
}

#[derive(Debug, Deserialize)]
struct JobDetailRequest {
    text: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    model: String,
    dim: usize,
}

/// Build the application router.
///
/// CORS is wide open (all origins, methods, headers): the portal frontend
/// calls this service cross-origin. Flagged in DESIGN.md as a deployment
/// decision rather than silently tightened.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/jobdetail", post(jobdetail_handler))
        .route("/health", get(health_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Bind and serve until the listener fails.
pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "verdict service listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// `POST /jobdetail` — classify one text.
///
/// Responds 200 with a bare JSON string, `"合格"` or `"不合格"`. A body
/// that is not JSON or lacks `text` is rejected by the extractor with a
/// 4xx before this handler runs.
async fn jobdetail_handler(
    State(state): State<AppState>,
    Json(request): Json<JobDetailRequest>,
) -> Result<Json<Verdict>, ApiError> {
    // Embedding and prediction are blocking CPU work; keep them off the
    // async worker threads.
    let service = state.service.clone();
    let verdict = tokio::task::spawn_blocking(move || service.classify(&request.text))
        .await
        .map_err(|e| ApiError::Inference(e.to_string()))?
        .map_err(|e| ApiError::Inference(e.to_string()))?;
    Ok(Json(verdict))
}

/// `GET /health` — liveness plus the loaded model's identity.
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model: state.model.clone(),
        dim: state.dim,
    })
}
