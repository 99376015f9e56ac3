//! medmind-api
//!
//! HTTP serving interface for the adherence pipeline: `/`, `/health` and
//! `/predict`. The pipeline is loaded once at startup into [`AppState`] and
//! shared read-only by every request.

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

pub use crate::config::ServiceConfig;
pub use crate::state::AppState;

/// Build the service router with its middleware stack.
///
/// Layers run outermost first: CORS, then request logging, then panic
/// recovery, so a panicked request is still logged and carries CORS headers.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(routes::root::root))
        .route("/health", get(routes::health::health_check))
        .route("/predict", post(routes::predict::predict))
        .layer(
            ServiceBuilder::new()
                .layer(cors)
                .layer(axum_mw::from_fn(middleware::audit::request_log))
                .layer(CatchPanicLayer::custom(error::panic_response)),
        )
        .with_state(state)
}
