//! medmind-core
//!
//! Pure domain types for adherence prediction: the patient feature record,
//! its declared field ranges, validation errors and the prediction result.
//! No ML dependency; every other MedMind crate builds on these types.

pub mod features;
pub mod fields;
pub mod prediction;
pub mod validation;

pub use features::{FEATURE_NAMES, N_FEATURES, PatientFeatures};
pub use prediction::{Confidence, PredictionResult};
pub use validation::{FieldError, FieldErrorKind, ValidationError};
