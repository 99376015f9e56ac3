//! The patient feature record and its single conversion boundary to the
//! positional model input.
//!
//! Models and scalers consume `[f64; N_FEATURES]` where list position is
//! meaning. Everything above that layer works with [`PatientFeatures`] by
//! name; [`PatientFeatures::to_array`] and [`PatientFeatures::from_array`]
//! are the only places the ordering is spelled out.

use serde::{Deserialize, Serialize};

use crate::fields::{self, FIELD_SPECS, FieldKind, MAX_EXACT_INTEGER};
use crate::validation::{FieldError, FieldErrorKind, ValidationError};

/// Number of model input features.
pub const N_FEATURES: usize = 8;

/// Feature names in model-input order. Persisted alongside every artifact.
pub const FEATURE_NAMES: [&str; N_FEATURES] = [
    "age",
    "num_medications",
    "medication_complexity",
    "days_since_start",
    "missed_doses_last_week",
    "snooze_frequency",
    "chronic_conditions",
    "previous_adherence_rate",
];

/// One patient's features, as received at the serving boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatientFeatures {
    pub age: i64,
    pub num_medications: i64,
    pub medication_complexity: f64,
    pub days_since_start: i64,
    pub missed_doses_last_week: i64,
    pub snooze_frequency: f64,
    pub chronic_conditions: i64,
    pub previous_adherence_rate: f64,
}

impl PatientFeatures {
    /// Positional model input, ordered as [`FEATURE_NAMES`].
    pub fn to_array(&self) -> [f64; N_FEATURES] {
        [
            self.age as f64,
            self.num_medications as f64,
            self.medication_complexity,
            self.days_since_start as f64,
            self.missed_doses_last_week as f64,
            self.snooze_frequency,
            self.chronic_conditions as f64,
            self.previous_adherence_rate,
        ]
    }

    /// Rebuild a record from a positional row. Integer fields must hold
    /// whole numbers; ranges are not checked here.
    pub fn from_array(values: &[f64; N_FEATURES]) -> Result<Self, ValidationError> {
        let errors: Vec<FieldError> = FIELD_SPECS
            .iter()
            .zip(values)
            .filter_map(|(spec, &value)| check_kind(spec.name, spec.kind, value))
            .collect();
        if !errors.is_empty() {
            return Err(ValidationError { errors });
        }

        Ok(Self {
            age: values[0] as i64,
            num_medications: values[1] as i64,
            medication_complexity: values[2],
            days_since_start: values[3] as i64,
            missed_doses_last_week: values[4] as i64,
            snooze_frequency: values[5],
            chronic_conditions: values[6] as i64,
            previous_adherence_rate: values[7],
        })
    }

    /// Check every field against its declared serving range.
    ///
    /// Values are never clamped; all offending fields are reported.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let errors: Vec<FieldError> = FIELD_SPECS
            .iter()
            .zip(self.to_array())
            .filter_map(|(spec, value)| spec.check(value))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { errors })
        }
    }

    /// Parse a JSON request body, reporting missing, mistyped and
    /// out-of-range fields together. Unknown keys are ignored.
    pub fn from_json(body: &serde_json::Value) -> Result<Self, ValidationError> {
        let Some(object) = body.as_object() else {
            return Err(ValidationError::single(FieldError {
                field: "body".to_string(),
                kind: FieldErrorKind::WrongType,
                message: "request body must be a JSON object".to_string(),
            }));
        };

        let mut values = [0.0; N_FEATURES];
        let mut errors = Vec::new();

        for (slot, spec) in values.iter_mut().zip(FIELD_SPECS.iter()) {
            let number = match object.get(spec.name) {
                None | Some(serde_json::Value::Null) => {
                    errors.push(FieldError {
                        field: spec.name.to_string(),
                        kind: FieldErrorKind::Missing,
                        message: format!("{}: field required", spec.name),
                    });
                    continue;
                }
                Some(serde_json::Value::Number(n)) => n.as_f64(),
                Some(_) => None,
            };

            let Some(value) = number else {
                errors.push(FieldError {
                    field: spec.name.to_string(),
                    kind: FieldErrorKind::WrongType,
                    message: format!("{}: expected a number", spec.name),
                });
                continue;
            };

            match spec.check(value) {
                Some(err) => errors.push(err),
                None => *slot = value,
            }
        }

        if !errors.is_empty() {
            return Err(ValidationError { errors });
        }
        Self::from_array(&values)
    }
}

fn check_kind(name: &str, kind: FieldKind, value: f64) -> Option<FieldError> {
    if kind != FieldKind::Integer {
        return None;
    }
    if !value.is_finite() || value.fract() != 0.0 {
        return Some(FieldError {
            field: name.to_string(),
            kind: FieldErrorKind::WrongType,
            message: format!("{name}: expected an integer, got {value}"),
        });
    }
    if value.abs() > MAX_EXACT_INTEGER {
        return Some(fields::too_large(name, value));
    }
    None
}
