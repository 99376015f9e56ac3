use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct ServiceInfo {
    message: &'static str,
    version: &'static str,
    health: &'static str,
}

pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "MedMind Adherence Prediction API",
        version: env!("CARGO_PKG_VERSION"),
        health: "/health",
    })
}
