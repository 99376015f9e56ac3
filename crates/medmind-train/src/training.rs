//! The end-to-end training job.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use medmind_model::ScalerState;
use medmind_model::artifact::{self, write_bytes_atomic, write_json_atomic};

use crate::candidates::{CandidateSet, Partition, fit_candidates};
use crate::dataset::Dataset;
use crate::error::TrainError;
use crate::selection::{self, SelectionReport};
use crate::split::{take, train_test_split};

pub const MODEL_FILE: &str = "model.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const REPORT_FILE: &str = "selection_report.json";
pub const RATIONALE_FILE: &str = "model_selection_rationale.txt";

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub data: PathBuf,
    pub out_dir: PathBuf,
    /// Seeds both the train/test shuffle and the forest.
    pub seed: u64,
    pub test_fraction: f64,
    pub candidates: CandidateSet,
}

impl TrainingConfig {
    pub fn new(data: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            data: data.into(),
            out_dir: out_dir.into(),
            seed: DEFAULT_SEED,
            test_fraction: DEFAULT_TEST_FRACTION,
            candidates: CandidateSet::default(),
        }
    }
}

#[derive(Debug)]
pub struct TrainingOutcome {
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
    pub report_path: PathBuf,
    pub rationale_path: PathBuf,
    pub report: SelectionReport,
}

/// Load, scale, split, fit all candidates, select, and persist the winner.
///
/// The scaler is fit once on every complete row before splitting, and
/// every artifact written carries the same training run id.
pub fn run_training(config: &TrainingConfig) -> Result<TrainingOutcome, TrainError> {
    let training_run = Uuid::new_v4();
    tracing::info!(
        run = %training_run,
        data = %config.data.display(),
        seed = config.seed,
        test_fraction = config.test_fraction,
        "training started"
    );

    let dataset = Dataset::load(&config.data)?;
    let scaler = ScalerState::fit_rows(&dataset.features)?;
    let scaled = scaler.transform_rows(&dataset.features);

    let split = train_test_split(dataset.len(), config.test_fraction, config.seed)?;
    let (x_train, y_train) = (take(&scaled, &split.train), take(&dataset.targets, &split.train));
    let (x_test, y_test) = (take(&scaled, &split.test), take(&dataset.targets, &split.test));
    tracing::info!(train = x_train.len(), test = x_test.len(), "dataset split");

    let candidates = fit_candidates(
        &Partition {
            x: &x_train,
            y: &y_train,
        },
        &Partition {
            x: &x_test,
            y: &y_test,
        },
        &config.candidates.with_seed(config.seed),
    )?;
    let selected = selection::select(candidates, dataset.summary(), training_run)?;

    let out = &config.out_dir;
    let outcome = TrainingOutcome {
        model_path: out.join(MODEL_FILE),
        scaler_path: out.join(SCALER_FILE),
        report_path: out.join(REPORT_FILE),
        rationale_path: out.join(RATIONALE_FILE),
        report: selected.report,
    };

    artifact::save_model(&outcome.model_path, &selected.model, training_run)?;
    artifact::save_scaler(&outcome.scaler_path, &scaler, training_run)?;
    write_json_atomic(&outcome.report_path, &outcome.report)?;
    write_bytes_atomic(&outcome.rationale_path, outcome.report.rationale().as_bytes())?;

    tracing::info!(
        run = %training_run,
        selected = %outcome.report.selected,
        out_dir = %out.display(),
        "training finished"
    );
    Ok(outcome)
}

/// Read a report written by [`run_training`].
pub fn load_report(path: &Path) -> Result<SelectionReport, TrainError> {
    let bytes = std::fs::read(path).map_err(|source| {
        TrainError::Artifact(medmind_model::ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })
    })?;
    serde_json::from_slice(&bytes).map_err(|source| {
        TrainError::Artifact(medmind_model::ArtifactError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
    })
}
