//! Regression model variants behind one prediction interface.
//!
//! Fitting and inference are delegated to `smartcore`; the wrappers here
//! only adapt shapes, carry hyperparameters, and map library failures into
//! [`ModelError`].

use std::fmt;

use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::linear_regression::{LinearRegression, LinearRegressionParameters};
use smartcore::tree::decision_tree_regressor::{
    DecisionTreeRegressor, DecisionTreeRegressorParameters,
};

use medmind_core::N_FEATURES;

use crate::error::ModelError;

type Matrix = DenseMatrix<f64>;
type SmartLinear = LinearRegression<f64, f64, Matrix, Vec<f64>>;
type SmartTree = DecisionTreeRegressor<f64, f64, Matrix, Vec<f64>>;
type SmartForest = RandomForestRegressor<f64, f64, Matrix, Vec<f64>>;

/// Which model family a predictor belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    LinearRegression,
    DecisionTree,
    RandomForest,
}

impl ModelKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            ModelKind::LinearRegression => "Linear Regression",
            ModelKind::DecisionTree => "Decision Tree",
            ModelKind::RandomForest => "Random Forest",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A fitted model mapping standardized feature rows to a raw adherence
/// estimate. The output is not range-limited.
///
/// Prediction takes `&self` and never mutates; implementations are shared
/// across request handlers without locking.
pub trait Regressor: Send + Sync {
    fn kind(&self) -> ModelKind;

    /// Predict one value per row, in row order.
    fn predict_rows(&self, rows: &[[f64; N_FEATURES]]) -> Result<Vec<f64>, ModelError>;

    fn predict_one(&self, row: &[f64; N_FEATURES]) -> Result<f64, ModelError> {
        let out = self.predict_rows(std::slice::from_ref(row))?;
        match out.as_slice() {
            [value] => Ok(*value),
            other => Err(ModelError::OutputShape {
                expected: 1,
                got: other.len(),
            }),
        }
    }
}

fn to_matrix(rows: &[[f64; N_FEATURES]]) -> Matrix {
    let values: Vec<Vec<f64>> = rows.iter().map(|row| row.to_vec()).collect();
    DenseMatrix::from_2d_vec(&values)
}

fn check_training_set(x: &[[f64; N_FEATURES]], y: &[f64]) -> Result<(), ModelError> {
    if x.is_empty() {
        return Err(ModelError::EmptyInput);
    }
    if x.len() != y.len() {
        return Err(ModelError::LengthMismatch {
            features: x.len(),
            targets: y.len(),
        });
    }
    Ok(())
}

fn checked_output(expected: usize, out: Vec<f64>) -> Result<Vec<f64>, ModelError> {
    if out.len() != expected {
        return Err(ModelError::OutputShape {
            expected,
            got: out.len(),
        });
    }
    Ok(out)
}

/// Ordinary least squares needs one row per coefficient plus the intercept.
pub const MIN_LINEAR_ROWS: usize = N_FEATURES + 1;

/// Ordinary least squares over the 8 standardized features.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinearModel {
    inner: SmartLinear,
}

impl LinearModel {
    pub fn fit(x: &[[f64; N_FEATURES]], y: &[f64]) -> Result<Self, ModelError> {
        check_training_set(x, y)?;
        if x.len() < MIN_LINEAR_ROWS {
            return Err(ModelError::TooFewRows {
                rows: x.len(),
                needed: MIN_LINEAR_ROWS,
            });
        }
        let inner = LinearRegression::fit(
            &to_matrix(x),
            &y.to_vec(),
            LinearRegressionParameters::default(),
        )
        .map_err(|e| ModelError::Fit(e.to_string()))?;
        Ok(Self { inner })
    }

    /// One coefficient per feature, in feature order.
    pub fn coefficients(&self) -> Vec<f64> {
        let coef = self.inner.coefficients();
        let (rows, cols) = coef.shape();
        if cols == 1 {
            (0..rows).map(|i| *coef.get((i, 0))).collect()
        } else {
            (0..cols).map(|j| *coef.get((0, j))).collect()
        }
    }

    pub fn intercept(&self) -> f64 {
        *self.inner.intercept()
    }
}

impl Regressor for LinearModel {
    fn kind(&self) -> ModelKind {
        ModelKind::LinearRegression
    }

    fn predict_rows(&self, rows: &[[f64; N_FEATURES]]) -> Result<Vec<f64>, ModelError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let out = self
            .inner
            .predict(&to_matrix(rows))
            .map_err(|e| ModelError::Predict(e.to_string()))?;
        checked_output(rows.len(), out)
    }
}

/// Hyperparameters for a single regression tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    pub max_depth: Option<u16>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: Some(10),
            min_samples_split: 10,
            min_samples_leaf: 4,
        }
    }
}

impl TreeParams {
    fn to_smartcore(self) -> DecisionTreeRegressorParameters {
        let mut params = DecisionTreeRegressorParameters::default()
            .with_min_samples_split(self.min_samples_split as _)
            .with_min_samples_leaf(self.min_samples_leaf as _);
        if let Some(depth) = self.max_depth {
            params = params.with_max_depth(depth as _);
        }
        params
    }
}

/// CART regression tree.
#[derive(Debug, Serialize, Deserialize)]
pub struct TreeModel {
    params: TreeParams,
    inner: SmartTree,
}

impl TreeModel {
    pub fn fit(x: &[[f64; N_FEATURES]], y: &[f64], params: TreeParams) -> Result<Self, ModelError> {
        check_training_set(x, y)?;
        let inner = DecisionTreeRegressor::fit(&to_matrix(x), &y.to_vec(), params.to_smartcore())
            .map_err(|e| ModelError::Fit(e.to_string()))?;
        Ok(Self { params, inner })
    }

    pub fn params(&self) -> &TreeParams {
        &self.params
    }
}

impl Regressor for TreeModel {
    fn kind(&self) -> ModelKind {
        ModelKind::DecisionTree
    }

    fn predict_rows(&self, rows: &[[f64; N_FEATURES]]) -> Result<Vec<f64>, ModelError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let out = self
            .inner
            .predict(&to_matrix(rows))
            .map_err(|e| ModelError::Predict(e.to_string()))?;
        checked_output(rows.len(), out)
    }
}

/// Hyperparameters for a bagged forest of regression trees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: Option<u16>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features drawn as split candidates at each node; `None` leaves the
    /// choice to smartcore, which uses the square root of the feature count.
    pub max_features: Option<usize>,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: Some(15),
            min_samples_split: 5,
            min_samples_leaf: 2,
            max_features: Some(N_FEATURES),
            seed: 42,
        }
    }
}

impl ForestParams {
    fn to_smartcore(self) -> RandomForestRegressorParameters {
        let mut params = RandomForestRegressorParameters::default()
            .with_n_trees(self.n_trees as _)
            .with_min_samples_split(self.min_samples_split as _)
            .with_min_samples_leaf(self.min_samples_leaf as _)
            .with_seed(self.seed);
        if let Some(depth) = self.max_depth {
            params = params.with_max_depth(depth as _);
        }
        if let Some(m) = self.max_features {
            params = params.with_m(m);
        }
        params
    }
}

/// Random forest: the prediction is the mean of its trees.
#[derive(Debug, Serialize, Deserialize)]
pub struct ForestModel {
    params: ForestParams,
    inner: SmartForest,
}

impl ForestModel {
    pub fn fit(
        x: &[[f64; N_FEATURES]],
        y: &[f64],
        params: ForestParams,
    ) -> Result<Self, ModelError> {
        check_training_set(x, y)?;
        let inner = RandomForestRegressor::fit(&to_matrix(x), &y.to_vec(), params.to_smartcore())
            .map_err(|e| ModelError::Fit(e.to_string()))?;
        Ok(Self { params, inner })
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    pub fn n_trees(&self) -> usize {
        self.params.n_trees
    }
}

impl Regressor for ForestModel {
    fn kind(&self) -> ModelKind {
        ModelKind::RandomForest
    }

    fn predict_rows(&self, rows: &[[f64; N_FEATURES]]) -> Result<Vec<f64>, ModelError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let out = self
            .inner
            .predict(&to_matrix(rows))
            .map_err(|e| ModelError::Predict(e.to_string()))?;
        checked_output(rows.len(), out)
    }
}

/// The persisted form of whichever variant won selection.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", content = "model", rename_all = "snake_case")]
pub enum TrainedModel {
    LinearRegression(LinearModel),
    DecisionTree(TreeModel),
    RandomForest(ForestModel),
}

impl TrainedModel {
    pub fn kind(&self) -> ModelKind {
        self.as_regressor().kind()
    }

    pub fn as_regressor(&self) -> &dyn Regressor {
        match self {
            TrainedModel::LinearRegression(m) => m,
            TrainedModel::DecisionTree(m) => m,
            TrainedModel::RandomForest(m) => m,
        }
    }

    /// Erase the variant; serving code depends only on [`Regressor`].
    pub fn into_regressor(self) -> Box<dyn Regressor> {
        match self {
            TrainedModel::LinearRegression(m) => Box::new(m),
            TrainedModel::DecisionTree(m) => Box::new(m),
            TrainedModel::RandomForest(m) => Box::new(m),
        }
    }
}

impl From<LinearModel> for TrainedModel {
    fn from(m: LinearModel) -> Self {
        TrainedModel::LinearRegression(m)
    }
}

impl From<TreeModel> for TrainedModel {
    fn from(m: TreeModel) -> Self {
        TrainedModel::DecisionTree(m)
    }
}

impl From<ForestModel> for TrainedModel {
    fn from(m: ForestModel) -> Self {
        TrainedModel::RandomForest(m)
    }
}
