//! Errors surfaced to HTTP callers as structured JSON bodies.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Embedding or prediction failed mid-request.
    #[error("inference failed: {0}")]
    Inference(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error_type: &'static str,
    message: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            Self::Inference(_) => "inference_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        let body = ErrorBody {
            error_type: self.error_type(),
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
