use std::path::PathBuf;

use thiserror::Error;

use medmind_model::{ArtifactError, ModelError, PipelineError};

#[derive(Debug, Error)]
pub enum TrainError {
    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} has no `{column}` column", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("{}:{line}: `{column}` is not a number: {value:?}", path.display())]
    InvalidValue {
        path: PathBuf,
        line: u64,
        column: String,
        value: String,
    },

    #[error("{}:{line}: `{column}` is empty", path.display())]
    MissingValue {
        path: PathBuf,
        line: u64,
        column: String,
    },

    #[error("{} has no complete rows", path.display())]
    EmptyDataset { path: PathBuf },

    #[error("invalid train/test split: {0}")]
    InvalidSplit(String),

    #[error("no candidate produced a finite test error")]
    NoSelectableCandidate,

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}
