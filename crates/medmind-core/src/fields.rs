use serde::{Deserialize, Serialize};

use crate::validation::{FieldError, FieldErrorKind};

/// Numeric kind a feature field accepts at the serving boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Whole numbers only (counts, days, years).
    Integer,
    /// Any finite number.
    Float,
}

/// Largest magnitude at which every whole `f64` is exact (2^53). Integer
/// fields beyond it are rejected rather than rounded into an `i64`.
pub const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Inclusive valid range for a field. `max: None` means unbounded above.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FieldRange {
    pub min: f64,
    pub max: Option<f64>,
}

impl FieldRange {
    pub fn contains(&self, value: f64) -> bool {
        if !value.is_finite() || value < self.min {
            return false;
        }
        self.max.is_none_or(|max| value <= max)
    }
}

/// Declaration of one feature field: its wire name, kind and serving range.
///
/// These ranges are the serving contract and are looser than the ranges the
/// training data was drawn from (e.g. ages start at 0, not 18).
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub range: FieldRange,
    pub description: &'static str,
}

impl FieldSpec {
    /// Check a value against this field's kind and range.
    pub fn check(&self, value: f64) -> Option<FieldError> {
        if self.kind == FieldKind::Integer && value.is_finite() && value.fract() != 0.0 {
            return Some(FieldError {
                field: self.name.to_string(),
                kind: FieldErrorKind::WrongType,
                message: format!("{}: expected an integer, got {value}", self.name),
            });
        }

        if self.kind == FieldKind::Integer && value.abs() > MAX_EXACT_INTEGER {
            return Some(too_large(self.name, value));
        }

        if !self.range.contains(value) {
            let message = match self.range.max {
                Some(max) => format!(
                    "{}: {value} is outside range [{}, {}]",
                    self.name, self.range.min, max
                ),
                None => format!(
                    "{}: {value} must be greater than or equal to {}",
                    self.name, self.range.min
                ),
            };
            return Some(FieldError {
                field: self.name.to_string(),
                kind: FieldErrorKind::OutOfRange,
                message,
            });
        }

        None
    }
}

pub(crate) fn too_large(name: &str, value: f64) -> FieldError {
    FieldError {
        field: name.to_string(),
        kind: FieldErrorKind::OutOfRange,
        message: format!("{name}: {value} exceeds the largest exact integer {MAX_EXACT_INTEGER}"),
    }
}

/// Field declarations in model-input order.
pub const FIELD_SPECS: [FieldSpec; 8] = [
    FieldSpec {
        name: "age",
        kind: FieldKind::Integer,
        range: FieldRange { min: 0.0, max: Some(120.0) },
        description: "Patient age in years",
    },
    FieldSpec {
        name: "num_medications",
        kind: FieldKind::Integer,
        range: FieldRange { min: 1.0, max: Some(20.0) },
        description: "Number of active medications",
    },
    FieldSpec {
        name: "medication_complexity",
        kind: FieldKind::Float,
        range: FieldRange { min: 1.0, max: Some(5.0) },
        description: "Regimen complexity score (1 = simple, 5 = complex)",
    },
    FieldSpec {
        name: "days_since_start",
        kind: FieldKind::Integer,
        range: FieldRange { min: 0.0, max: None },
        description: "Days since starting the medication regimen",
    },
    FieldSpec {
        name: "missed_doses_last_week",
        kind: FieldKind::Integer,
        range: FieldRange { min: 0.0, max: Some(50.0) },
        description: "Missed doses in the past 7 days",
    },
    FieldSpec {
        name: "snooze_frequency",
        kind: FieldKind::Float,
        range: FieldRange { min: 0.0, max: Some(1.0) },
        description: "Proportion of reminders snoozed",
    },
    FieldSpec {
        name: "chronic_conditions",
        kind: FieldKind::Integer,
        range: FieldRange { min: 0.0, max: Some(10.0) },
        description: "Number of chronic health conditions",
    },
    FieldSpec {
        name: "previous_adherence_rate",
        kind: FieldKind::Float,
        range: FieldRange { min: 0.0, max: Some(100.0) },
        description: "Historical adherence rate percentage",
    },
];

/// Look up a field declaration by wire name.
pub fn get_field(name: &str) -> Option<&'static FieldSpec> {
    FIELD_SPECS.iter().find(|f| f.name == name)
}
