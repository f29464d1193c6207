use crate::AppState;
use crate::models::{ImageGrid, PredictError, PredictResponse};
use crate::services::argmax;
use axum::{Json, extract::State, extract::rejection::JsonRejection};
use service_core::error::AppError;

/// `POST /` — classify one 28×28 grayscale image.
///
/// Success is `{"result": <class index>}`; every failure renders as
/// `{"error": <message>}` with 400 for validation problems and 500 for
/// anything that goes wrong past the shape check. The extractor result is
/// taken by hand so unparseable bodies land in the same envelope instead of
/// axum's plain-text rejection.
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<PredictResponse>, AppError> {
    let Json(body) = payload.map_err(|e| PredictError::Payload(e.body_text()))?;

    // `get` yields None for non-object bodies too, which is the same
    // missing-key answer the client gets for `{}`.
    let image = body.get("image").ok_or(PredictError::MissingImage)?;
    let grid = ImageGrid::parse(image)?;

    let scores = state
        .classifier
        .scores(&grid)
        .map_err(PredictError::Inference)?;

    let result = argmax(&scores).ok_or_else(|| {
        PredictError::Inference(anyhow::anyhow!("model produced an empty score vector"))
    })?;

    tracing::debug!(result, "Prediction served");
    Ok(Json(PredictResponse { result }))
}
