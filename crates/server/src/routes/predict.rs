use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use sentihotel::{Sentiment, ThresholdPolicy};
use serde::{Deserialize, Serialize};

/// Request body for `POST /predict`.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// The review text. Missing and empty are treated identically.
    #[serde(default)]
    pub review: String,
}

/// Response body for `POST /predict`.
///
/// `confidence` is a distance-from-threshold display value, not a calibrated
/// probability.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub sentiment: Sentiment,
    pub confidence: f32,
}

/// Classify one review with the tri-state policy.
///
/// - 200 with `{"sentiment", "confidence"}` on success
/// - 400 `{"error": "No review provided"}` for a missing/blank review,
///   without touching the models
/// - 500 `{"error": ...}` for malformed bodies and model failures
pub async fn predict(
    State(state): State<AppState>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    // An unreadable body is an internal failure (500), not a validation error.
    let Json(request) = body.map_err(|e| ApiError::Internal(e.body_text()))?;

    if request.review.trim().is_empty() {
        return Err(ApiError::NoReview);
    }

    let models = state.registry.get_or_load().await.map_err(ApiError::Model)?;
    let prediction = sentihotel::predict_review(&models, &request.review, ThresholdPolicy::TriState)?
        .ok_or(ApiError::NoReview)?;

    tracing::debug!(
        sentiment = %prediction.sentiment,
        score = prediction.score,
        "review classified"
    );

    Ok(Json(PredictResponse {
        sentiment: prediction.sentiment,
        confidence: prediction.confidence,
    }))
}
