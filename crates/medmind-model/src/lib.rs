//! medmind-model
//!
//! Feature scaling, the three regression model variants, artifact
//! persistence and the prediction pipeline shared by the HTTP service and
//! the batch CLI.
//!
//! Public API:
//! - `ScalerState::fit` / `transform`: z-score standardization
//! - `Regressor`: the one prediction interface every model variant implements
//! - `artifact::{save_*, load_*}`: versioned, feature-stamped JSON artifacts
//! - `AdherencePipeline`: validate → scale → predict → clip → round → band

pub mod artifact;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod scaler;

pub use crate::error::{ArtifactError, ModelError, PipelineError};
pub use crate::model::{ModelKind, Regressor, TrainedModel};
pub use crate::pipeline::AdherencePipeline;
pub use crate::scaler::ScalerState;
