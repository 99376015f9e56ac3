use serde::{Deserialize, Serialize};

use medmind_core::{N_FEATURES, PatientFeatures};

use crate::error::ModelError;

/// Standard deviations below this are treated as a constant feature.
pub const MIN_STD: f64 = 1e-10;

/// Per-feature z-score statistics captured once over a training corpus.
///
/// `std` is the population standard deviation (divide by n). A feature
/// whose `std` is below [`MIN_STD`] is only centred: the transform divides
/// by 1.0 instead of a near-zero value.
///
/// Immutable after fitting; the service loads it read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerState {
    mean: [f64; N_FEATURES],
    std: [f64; N_FEATURES],
}

impl ScalerState {
    /// Fit on a set of patient records.
    pub fn fit(samples: &[PatientFeatures]) -> Result<Self, ModelError> {
        let rows: Vec<[f64; N_FEATURES]> = samples.iter().map(PatientFeatures::to_array).collect();
        Self::fit_rows(&rows)
    }

    /// Fit on positional rows ordered as `FEATURE_NAMES`.
    pub fn fit_rows(rows: &[[f64; N_FEATURES]]) -> Result<Self, ModelError> {
        if rows.is_empty() {
            return Err(ModelError::EmptyInput);
        }
        let n = rows.len() as f64;

        let mut mean = [0.0; N_FEATURES];
        for row in rows {
            for (m, x) in mean.iter_mut().zip(row) {
                *m += x;
            }
        }
        for m in &mut mean {
            *m /= n;
        }

        let mut std = [0.0; N_FEATURES];
        for row in rows {
            for ((s, x), m) in std.iter_mut().zip(row).zip(&mean) {
                let diff = x - m;
                *s += diff * diff;
            }
        }
        for s in &mut std {
            *s = (*s / n).sqrt();
        }

        Ok(Self { mean, std })
    }

    pub fn mean(&self) -> &[f64; N_FEATURES] {
        &self.mean
    }

    pub fn std(&self) -> &[f64; N_FEATURES] {
        &self.std
    }

    /// Reject statistics no fit could have produced (non-finite values or a
    /// negative deviation). Called on every loaded artifact.
    pub fn check(&self) -> Result<(), String> {
        for (i, (m, s)) in self.mean.iter().zip(&self.std).enumerate() {
            if !m.is_finite() {
                return Err(format!("mean[{i}] is not finite"));
            }
            if !s.is_finite() || *s < 0.0 {
                return Err(format!("std[{i}] must be finite and non-negative, got {s}"));
            }
        }
        Ok(())
    }

    /// Standardize one patient.
    pub fn transform(&self, features: &PatientFeatures) -> [f64; N_FEATURES] {
        self.transform_row(&features.to_array())
    }

    /// Standardize one positional row: `(x_i - mean_i) / std_i`.
    pub fn transform_row(&self, row: &[f64; N_FEATURES]) -> [f64; N_FEATURES] {
        let mut out = [0.0; N_FEATURES];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = (row[i] - self.mean[i]) / self.divisor(i);
        }
        out
    }

    pub fn transform_rows(&self, rows: &[[f64; N_FEATURES]]) -> Vec<[f64; N_FEATURES]> {
        rows.iter().map(|row| self.transform_row(row)).collect()
    }

    /// Map a standardized row back to raw feature units.
    pub fn inverse_transform_row(&self, row: &[f64; N_FEATURES]) -> [f64; N_FEATURES] {
        let mut out = [0.0; N_FEATURES];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = row[i] * self.divisor(i) + self.mean[i];
        }
        out
    }

    fn divisor(&self, i: usize) -> f64 {
        if self.std[i] < MIN_STD { 1.0 } else { self.std[i] }
    }
}
