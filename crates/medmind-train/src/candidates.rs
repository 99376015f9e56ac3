//! Fitting and scoring the three candidate model families.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use medmind_core::N_FEATURES;
use medmind_model::model::{ForestModel, ForestParams, LinearModel, TreeModel, TreeParams};
use medmind_model::{ModelKind, Regressor, TrainedModel};

use crate::error::TrainError;
use crate::metrics::Metrics;

/// Hyperparameters of the non-linear candidates. Linear regression has none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateSet {
    pub tree: TreeParams,
    pub forest: ForestParams,
}

impl CandidateSet {
    /// Same hyperparameters, forest reseeded.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.forest.seed = seed;
        self
    }
}

/// Hyperparameters as recorded in the selection report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Hyperparameters {
    LinearRegression,
    DecisionTree(TreeParams),
    RandomForest(ForestParams),
}

/// How one fitted candidate did on both partitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub kind: ModelKind,
    pub hyperparameters: Hyperparameters,
    pub train: Metrics,
    pub test: Metrics,
    pub fit_seconds: f64,
}

/// A fitted candidate awaiting selection.
#[derive(Debug)]
pub struct Candidate {
    pub score: CandidateScore,
    pub model: TrainedModel,
}

/// Standardized rows and targets of one partition.
pub struct Partition<'a> {
    pub x: &'a [[f64; N_FEATURES]],
    pub y: &'a [f64],
}

/// Fit linear regression, a decision tree and a random forest on `train`
/// and score each on both partitions. Order is fixed: linear, tree, forest.
pub fn fit_candidates(
    train: &Partition<'_>,
    test: &Partition<'_>,
    set: &CandidateSet,
) -> Result<Vec<Candidate>, TrainError> {
    let mut out = Vec::with_capacity(3);

    let started = Instant::now();
    let linear = LinearModel::fit(train.x, train.y)?;
    out.push(score(
        linear.into(),
        Hyperparameters::LinearRegression,
        started,
        train,
        test,
    )?);

    let started = Instant::now();
    let tree = TreeModel::fit(train.x, train.y, set.tree)?;
    out.push(score(
        tree.into(),
        Hyperparameters::DecisionTree(set.tree),
        started,
        train,
        test,
    )?);

    let started = Instant::now();
    let forest = ForestModel::fit(train.x, train.y, set.forest)?;
    out.push(score(
        forest.into(),
        Hyperparameters::RandomForest(set.forest),
        started,
        train,
        test,
    )?);

    Ok(out)
}

fn score(
    model: TrainedModel,
    hyperparameters: Hyperparameters,
    started: Instant,
    train: &Partition<'_>,
    test: &Partition<'_>,
) -> Result<Candidate, TrainError> {
    let fit_seconds = started.elapsed().as_secs_f64();
    let regressor = model.as_regressor();
    let train_metrics = Metrics::compute(train.y, &regressor.predict_rows(train.x)?);
    let test_metrics = Metrics::compute(test.y, &regressor.predict_rows(test.x)?);

    tracing::info!(
        model = %model.kind(),
        train_mse = train_metrics.mse,
        test_mse = test_metrics.mse,
        test_r2 = test_metrics.r2,
        fit_seconds,
        "candidate evaluated"
    );

    Ok(Candidate {
        score: CandidateScore {
            kind: model.kind(),
            hyperparameters,
            train: train_metrics,
            test: test_metrics,
            fit_seconds,
        },
        model,
    })
}
