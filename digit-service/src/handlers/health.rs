use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

/// Health check endpoint for liveness probes. The model is loaded before the
/// listener binds, so a responding process is a healthy one.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "digit-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness check endpoint.
pub async fn readiness_check() -> impl IntoResponse {
    StatusCode::OK
}
