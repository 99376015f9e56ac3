use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowest clipped rate labelled [`Confidence::High`].
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 80.0;
/// Lowest clipped rate labelled [`Confidence::Medium`].
pub const MEDIUM_CONFIDENCE_THRESHOLD: f64 = 60.0;

/// Presentation label derived from the predicted rate.
///
/// This is a banding of the predicted magnitude, not a statistical
/// confidence interval: a model that is very unsure but predicts 95% is
/// still labelled `high`. Clients rely on the banding as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Band a clipped prediction: `>= 80` high, `>= 60` medium, else low.
    pub fn from_rate(rate: f64) -> Self {
        if rate >= HIGH_CONFIDENCE_THRESHOLD {
            Confidence::High
        } else if rate >= MEDIUM_CONFIDENCE_THRESHOLD {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A served prediction. Derived per request, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_adherence_rate: f64,
    pub confidence: Confidence,
}

impl PredictionResult {
    /// Build a result from a finite raw model output: clip to [0, 100],
    /// band confidence on the clipped value, then round for presentation.
    pub fn from_raw(raw: f64) -> Self {
        let clipped = clip_rate(raw);
        Self {
            predicted_adherence_rate: round_to_cents(clipped),
            confidence: Confidence::from_rate(clipped),
        }
    }
}

/// Clamp a model output to the physically valid percentage range.
pub fn clip_rate(raw: f64) -> f64 {
    raw.clamp(0.0, 100.0)
}

/// Round to 2 decimal places.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
