//! HTTP Error Mapping

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use inference_engine::PredictionError;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to HTTP callers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Assets have not been installed yet
    #[error("Model/Scaler not loaded")]
    NotReady,
    /// Malformed timestamp or out-of-contract field
    #[error("{0}")]
    InvalidInput(String),
    /// Body is not a well-formed AIS record
    #[error("{}", .0.body_text())]
    MalformedBody(#[from] JsonRejection),
    /// Scaling or model evaluation failed
    #[error("{0}")]
    InferenceFailure(String),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::MalformedBody(rejection) => rejection.status(),
            ApiError::InferenceFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Label used for the error counter
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::NotReady => "not_ready",
            ApiError::InvalidInput(_) | ApiError::MalformedBody(_) => "invalid_input",
            ApiError::InferenceFailure(_) => "inference",
        }
    }
}

impl From<PredictionError> for ApiError {
    fn from(err: PredictionError) -> Self {
        if err.is_invalid_input() {
            ApiError::InvalidInput(err.to_string())
        } else {
            ApiError::InferenceFailure(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            ApiError::InferenceFailure(msg) => tracing::error!("Inference failure: {}", msg),
            ApiError::NotReady => tracing::warn!("Prediction requested before assets loaded"),
            ApiError::InvalidInput(msg) => tracing::debug!("Rejected input: {}", msg),
            ApiError::MalformedBody(rejection) => {
                tracing::debug!("Rejected body: {}", rejection.body_text())
            }
        }

        let body = Json(json!({ "detail": self.to_string() }));
        (status, body).into_response()
    }
}
