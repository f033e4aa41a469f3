use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use sentihotel::Readiness;
use serde_json::json;
use std::time::SystemTime;

/// Global server start time for uptime calculation
static SERVER_START_TIME: once_cell::sync::Lazy<SystemTime> =
    once_cell::sync::Lazy::new(SystemTime::now);

/// Pin the start time. Called once during startup so uptime counts from
/// process start, not from whenever the first probe happens to arrive.
pub fn mark_started() {
    once_cell::sync::Lazy::force(&SERVER_START_TIME);
}

fn uptime_seconds() -> u64 {
    SERVER_START_TIME
        .elapsed()
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Liveness probe: 200 whenever the process is running.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "senti-server",
        "uptime_seconds": uptime_seconds(),
    }))
}

/// Readiness probe: reflects the model registry state instead of import-time
/// side effects. 200 only once both models are resident; 503 while loading or
/// after a failed load (a failed load never recovers within this process).
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let readiness = state.readiness();
    let status = match readiness {
        Readiness::Ready => StatusCode::OK,
        Readiness::NotLoaded | Readiness::Failed => StatusCode::SERVICE_UNAVAILABLE,
    };

    let body = Json(json!({
        "status": if readiness == Readiness::Ready { "ready" } else { "not_ready" },
        "service": "senti-server",
        "uptime_seconds": uptime_seconds(),
        "components": {
            "api": "ready",
            "models": readiness.as_str(),
            "encoder": state.config.models.encoder_name,
        }
    }));

    (status, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_time_is_pinned_once() {
        mark_started();
        let pinned = *SERVER_START_TIME;

        // Later calls (and later probes) keep the original instant; uptime
        // never resets within the process.
        mark_started();
        assert_eq!(*SERVER_START_TIME, pinned);
        assert!(pinned <= SystemTime::now());
    }
}
