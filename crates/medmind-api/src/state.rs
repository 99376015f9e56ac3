use std::sync::Arc;

use medmind_model::artifact;
use medmind_model::{AdherencePipeline, ArtifactError};

use crate::config::ServiceConfig;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    /// `None` when the service started degraded.
    pub pipeline: Option<Arc<AdherencePipeline>>,
    pub model_loaded: bool,
    pub scaler_loaded: bool,
}

impl AppState {
    pub fn ready(pipeline: AdherencePipeline) -> Self {
        Self {
            pipeline: Some(Arc::new(pipeline)),
            model_loaded: true,
            scaler_loaded: true,
        }
    }

    pub fn degraded(model_loaded: bool, scaler_loaded: bool) -> Self {
        Self {
            pipeline: None,
            model_loaded,
            scaler_loaded,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.pipeline.is_some()
    }

    /// Load both artifacts once. On failure, return the error unless the
    /// config allows a degraded start, in which case the failure is logged
    /// and the state reports which artifact is missing. A model and scaler
    /// from different training runs are both reported as not loaded.
    pub fn load(config: &ServiceConfig) -> Result<Self, ArtifactError> {
        let model = artifact::load_model(&config.model_path);
        let scaler = artifact::load_scaler(&config.scaler_path);
        let (model_loaded, scaler_loaded) = (model.is_ok(), scaler.is_ok());

        let loaded = model
            .and_then(|model| scaler.map(|scaler| (model, scaler)))
            .and_then(|(model, scaler)| AdherencePipeline::from_artifacts(model, scaler));

        match loaded {
            Ok(pipeline) => {
                tracing::info!(
                    model = %pipeline.model_kind(),
                    run = ?pipeline.training_run(),
                    "pipeline ready"
                );
                Ok(Self::ready(pipeline))
            }
            Err(e) if config.allow_degraded => {
                // Both files parsed but do not form a pipeline; neither is usable.
                let (model_loaded, scaler_loaded) = if model_loaded && scaler_loaded {
                    (false, false)
                } else {
                    (model_loaded, scaler_loaded)
                };
                tracing::error!(error = %e, model_loaded, scaler_loaded, "starting degraded");
                Ok(Self::degraded(model_loaded, scaler_loaded))
            }
            Err(e) => Err(e),
        }
    }
}
