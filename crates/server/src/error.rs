use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub type ApiResult<T> = Result<T, ApiError>;

/// Server error types.
///
/// The wire shape is contractual and deliberately flat: every error serializes
/// as `{"error": "<message>"}`. Validated user errors map to 400, everything
/// else to 500 — the error taxonomy of this service has exactly those two
/// buckets.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No review provided")]
    NoReview,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Model(#[from] models::ModelError),

    #[error("{0}")]
    Pipeline(#[from] sentihotel::PipelineError),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found")]
    NotFound,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NoReview | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Model(_)
            | ApiError::Pipeline(_)
            | ApiError::Internal(_)
            | ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(%status, error = %message, "request failed");
        }

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

impl From<std::net::AddrParseError> for ApiError {
    fn from(err: std::net::AddrParseError) -> Self {
        ApiError::Config(format!("Invalid address: {err}"))
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Internal(format!("IO error: {err}"))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::BadRequest(format!("JSON parse error: {err}"))
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}
