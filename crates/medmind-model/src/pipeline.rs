//! The prediction pipeline: validate → scale → predict → clip → round → band.
//!
//! Both the HTTP service and the batch CLI go through [`AdherencePipeline`],
//! so preprocessing and output handling cannot drift between them.

use std::path::Path;

use uuid::Uuid;

use medmind_core::prediction::clip_rate;
use medmind_core::{N_FEATURES, PatientFeatures, PredictionResult};

use crate::artifact::{self, ModelArtifact, ScalerArtifact};
use crate::error::{ArtifactError, PipelineError};
use crate::model::{ModelKind, Regressor};
use crate::scaler::ScalerState;

/// A loaded scaler/model pair. Immutable once built; share it behind an
/// `Arc` and call it from any number of threads.
pub struct AdherencePipeline {
    scaler: ScalerState,
    model: Box<dyn Regressor>,
    training_run: Option<Uuid>,
}

impl AdherencePipeline {
    pub fn new(scaler: ScalerState, model: Box<dyn Regressor>) -> Self {
        Self {
            scaler,
            model,
            training_run: None,
        }
    }

    /// Combine already-loaded artifacts, refusing a pair from different
    /// training runs.
    pub fn from_artifacts(
        model: ModelArtifact,
        scaler: ScalerArtifact,
    ) -> Result<Self, ArtifactError> {
        let model_run = model.header.training_run;
        let scaler_run = scaler.header.training_run;
        if model_run != scaler_run {
            return Err(ArtifactError::RunMismatch {
                model_run,
                scaler_run,
            });
        }

        Ok(Self {
            scaler: scaler.payload,
            model: model.payload.into_regressor(),
            training_run: Some(model_run),
        })
    }

    /// Read both artifacts once. Fails fast on a missing, corrupt or
    /// mismatched file.
    pub fn load(model_path: &Path, scaler_path: &Path) -> Result<Self, ArtifactError> {
        let model = artifact::load_model(model_path)?;
        let scaler = artifact::load_scaler(scaler_path)?;
        Self::from_artifacts(model, scaler)
    }

    pub fn model_kind(&self) -> ModelKind {
        self.model.kind()
    }

    pub fn scaler(&self) -> &ScalerState {
        &self.scaler
    }

    pub fn training_run(&self) -> Option<Uuid> {
        self.training_run
    }

    /// Predict one patient's adherence.
    ///
    /// Inputs outside their declared ranges are rejected, never clamped.
    /// The model output is clipped to [0, 100], banded into a confidence
    /// label on the clipped value, and rounded to 2 decimals.
    pub fn predict_adherence(
        &self,
        raw: &PatientFeatures,
    ) -> Result<PredictionResult, PipelineError> {
        raw.validate()?;

        let value = self.raw_prediction(&raw.to_array())?;
        let result = PredictionResult::from_raw(value);

        tracing::debug!(
            raw = value,
            rate = result.predicted_adherence_rate,
            confidence = %result.confidence,
            "prediction"
        );
        Ok(result)
    }

    /// Scale and predict one row without validation or clipping.
    pub fn raw_prediction(&self, row: &[f64; N_FEATURES]) -> Result<f64, PipelineError> {
        let scaled = self.scaler.transform_row(row);
        let value = self.model.predict_one(&scaled)?;
        if !value.is_finite() {
            return Err(PipelineError::Prediction(format!(
                "model produced a non-finite value ({value})"
            )));
        }
        Ok(value)
    }

    /// Predict many positional rows with the already-loaded scaler and model.
    ///
    /// The whole batch fails if any row does not hold exactly
    /// [`N_FEATURES`] values. Rows are **not** range-validated and results
    /// are clipped but not rounded; run [`validate_rows`] first for the
    /// same input checks as [`Self::predict_adherence`].
    pub fn predict_adherence_batch(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, PipelineError> {
        let fixed = rows
            .iter()
            .enumerate()
            .map(|(i, row)| fixed_row(i, row))
            .collect::<Result<Vec<_>, _>>()?;

        let scaled = self.scaler.transform_rows(&fixed);
        let raw = self.model.predict_rows(&scaled)?;

        raw.into_iter()
            .enumerate()
            .map(|(i, value)| {
                if value.is_finite() {
                    Ok(clip_rate(value))
                } else {
                    Err(PipelineError::Prediction(format!(
                        "row {i}: model produced a non-finite value ({value})"
                    )))
                }
            })
            .collect()
    }
}

/// Apply the serving-boundary checks to positional rows: shape, integer
/// fields, and declared ranges. Stops at the first bad row.
pub fn validate_rows(rows: &[Vec<f64>]) -> Result<(), PipelineError> {
    for (i, row) in rows.iter().enumerate() {
        let fixed = fixed_row(i, row)?;
        PatientFeatures::from_array(&fixed)
            .and_then(|patient| patient.validate())
            .map_err(|source| PipelineError::InvalidRow { row: i, source })?;
    }
    Ok(())
}

fn fixed_row(index: usize, row: &[f64]) -> Result<[f64; N_FEATURES], PipelineError> {
    <[f64; N_FEATURES]>::try_from(row).map_err(|_| PipelineError::Shape {
        row: index,
        expected: N_FEATURES,
        got: row.len(),
    })
}
