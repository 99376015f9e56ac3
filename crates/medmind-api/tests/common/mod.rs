#![allow(dead_code)]

use std::path::Path;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use medmind_core::N_FEATURES;
use medmind_model::model::LinearModel;
use medmind_model::{AdherencePipeline, ScalerState, artifact};

/// A deterministic spread of patients, all inside the serving ranges.
pub fn rows(n: usize) -> Vec<[f64; N_FEATURES]> {
    (0..n)
        .map(|i| {
            [
                18.0 + ((i * 7) % 103) as f64,
                1.0 + ((i * 3) % 20) as f64,
                1.0 + ((i * 13) % 41) as f64 / 10.0,
                ((i * 37) % 3651) as f64,
                ((i * 11) % 51) as f64,
                ((i * 17) % 101) as f64 / 100.0,
                ((i * 5) % 11) as f64,
                ((i * 29) % 1001) as f64 / 10.0,
            ]
        })
        .collect()
}

pub fn linear_rule(r: &[f64; N_FEATURES]) -> f64 {
    75.0 + 0.15 * (r[0] - 18.0) - 1.5 * (r[1] - 1.0) - 5.0 * (r[2] - 1.0) - 0.002 * r[3]
        - 2.0 * r[4]
        - 15.0 * r[5]
        + r[6]
        + 0.4 * (r[7] - 75.0)
}

pub fn fitted() -> (ScalerState, LinearModel) {
    let raw = rows(300);
    let scaler = ScalerState::fit_rows(&raw).unwrap();
    let x = scaler.transform_rows(&raw);
    let y: Vec<f64> = raw.iter().map(linear_rule).collect();
    (scaler, LinearModel::fit(&x, &y).unwrap())
}

pub fn pipeline() -> AdherencePipeline {
    let (scaler, model) = fitted();
    AdherencePipeline::new(scaler, Box::new(model))
}

/// Write a matching model/scaler pair into `dir`.
pub fn write_artifacts(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let (scaler, model) = fitted();
    let run = Uuid::new_v4();
    let model_path = dir.join("model.json");
    let scaler_path = dir.join("scaler.json");
    artifact::save_model(&model_path, &model.into(), run).unwrap();
    artifact::save_scaler(&scaler_path, &scaler, run).unwrap();
    (model_path, scaler_path)
}

pub fn example_body() -> Value {
    json!({
        "age": 45,
        "num_medications": 3,
        "medication_complexity": 2.5,
        "days_since_start": 120,
        "missed_doses_last_week": 1,
        "snooze_frequency": 0.2,
        "chronic_conditions": 2,
        "previous_adherence_rate": 85.5
    })
}

pub async fn send(app: axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    post_raw(uri, body.to_string())
}

pub fn post_raw(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}
