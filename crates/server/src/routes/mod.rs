//! HTTP route handlers
//!
//! - `health`: liveness and model-readiness probes
//! - `predict`: the JSON prediction API (tri-state policy)
//! - `dashboard`: the browser surface (binary policy)

pub mod dashboard;
pub mod health;
pub mod predict;

use crate::error::{ApiError, ApiResult};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// API version and base info (GET /api).
pub async fn api_info() -> ApiResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "Senti Hotel",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/predict",
            "/analyze",
            "/health",
            "/ready"
        ]
    })))
}

/// 404 handler for undefined routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
