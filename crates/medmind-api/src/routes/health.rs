use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct Health {
    status: &'static str,
    model_loaded: bool,
    scaler_loaded: bool,
}

pub async fn health_check(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: if state.is_healthy() {
            "healthy"
        } else {
            "unhealthy"
        },
        model_loaded: state.model_loaded,
        scaler_loaded: state.scaler_loaded,
    })
}
