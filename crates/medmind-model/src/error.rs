use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

use medmind_core::ValidationError;

use crate::artifact::ArtifactKind;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("cannot fit on an empty sample set")]
    EmptyInput,

    #[error("length mismatch: {features} feature rows, {targets} targets")]
    LengthMismatch { features: usize, targets: usize },

    #[error("too few rows to fit: {rows} given, at least {needed} required")]
    TooFewRows { rows: usize, needed: usize },

    #[error("fit failed: {0}")]
    Fit(String),

    #[error("predict failed: {0}")]
    Predict(String),

    #[error("model returned {got} predictions for {expected} rows")]
    OutputShape { expected: usize, got: usize },
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt artifact {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("artifact {} holds a {found} artifact, expected {expected}", path.display())]
    WrongKind {
        path: PathBuf,
        expected: ArtifactKind,
        found: ArtifactKind,
    },

    #[error("artifact {} has format version {found}, this build reads {supported}", path.display())]
    UnsupportedVersion {
        path: PathBuf,
        found: u32,
        supported: u32,
    },

    #[error("artifact {} was fit on features {found:?}, expected {expected:?}", path.display())]
    FeatureMismatch {
        path: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("model (run {model_run}) and scaler (run {scaler_run}) come from different training runs")]
    RunMismatch { model_run: Uuid, scaler_run: Uuid },

    #[error("invalid scaler in {}: {reason}", path.display())]
    InvalidScaler { path: PathBuf, reason: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("row {row}: expected {expected} features, got {got}")]
    Shape {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("row {row}: {source}")]
    InvalidRow {
        row: usize,
        #[source]
        source: ValidationError,
    },

    #[error("prediction failed: {0}")]
    Prediction(String),
}

impl From<ModelError> for PipelineError {
    fn from(e: ModelError) -> Self {
        PipelineError::Prediction(e.to_string())
    }
}
