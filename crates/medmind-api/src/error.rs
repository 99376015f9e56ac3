use std::any::Any;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use uuid::Uuid;

use medmind_core::{FieldError, ValidationError};
use medmind_model::PipelineError;

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub enum ApiError {
    /// The request does not satisfy the feature schema.
    Validation(ValidationError),
    ModelNotLoaded,
    Internal(String),
}

#[derive(Serialize)]
struct ValidationBody {
    error: &'static str,
    detail: Vec<FieldError>,
}

#[derive(Serialize)]
struct InternalBody {
    error: &'static str,
    error_id: Uuid,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(e) => {
                tracing::info!(fields = ?e.fields(), "request rejected");
                let body = ValidationBody {
                    error: "validation failed",
                    detail: e.errors,
                };
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
            ApiError::ModelNotLoaded => {
                let error_id = Uuid::new_v4();
                tracing::error!(%error_id, "model or scaler not loaded");
                internal("Model not loaded. Please contact support.", error_id)
            }
            ApiError::Internal(msg) => {
                let error_id = Uuid::new_v4();
                tracing::error!(%error_id, "internal error: {msg}");
                internal("Prediction failed", error_id)
            }
        }
    }
}

fn internal(error: &'static str, error_id: Uuid) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(InternalBody { error, error_id }),
    )
        .into_response()
}

/// Response for a handler that panicked.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    let error_id = Uuid::new_v4();
    tracing::error!(%error_id, "handler panicked: {detail}");
    internal("internal server error", error_id)
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::Validation(e)
    }
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::Validation(e) => ApiError::Validation(e),
            other => ApiError::Internal(other.to_string()),
        }
    }
}
