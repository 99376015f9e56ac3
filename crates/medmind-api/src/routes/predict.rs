use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Serialize;

use medmind_core::{Confidence, FieldError, FieldErrorKind, PatientFeatures, ValidationError};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    predicted_adherence_rate: f64,
    confidence: Confidence,
    message: &'static str,
}

/// `POST /predict`: one patient's features in, adherence estimate out.
///
/// The body is checked against the feature schema before the model is
/// consulted, so a malformed request gets 422 even on a degraded service.
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let Json(body) = payload.map_err(body_error)?;
    let features = PatientFeatures::from_json(&body)?;

    let pipeline = state.pipeline.as_ref().ok_or(ApiError::ModelNotLoaded)?;
    let result = pipeline.predict_adherence(&features)?;

    tracing::info!(
        rate = result.predicted_adherence_rate,
        confidence = %result.confidence,
        "prediction served"
    );
    Ok(Json(PredictionResponse {
        predicted_adherence_rate: result.predicted_adherence_rate,
        confidence: result.confidence,
        message: "Prediction successful",
    }))
}

fn body_error(rejection: JsonRejection) -> ApiError {
    ApiError::Validation(ValidationError::single(FieldError {
        field: "body".to_string(),
        kind: FieldErrorKind::WrongType,
        message: rejection.body_text(),
    }))
}
