//! medmind-train
//!
//! Offline jobs around the adherence models: CSV dataset loading, the
//! seeded train/test split, regression metrics, fitting the three candidate
//! models, the selection policy, and batch prediction over a CSV file.
//! The `medmind` binary is a thin clap front end over this library.

pub mod batch;
pub mod candidates;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod selection;
pub mod split;
pub mod training;

pub use crate::error::TrainError;
pub use crate::training::{TrainingConfig, TrainingOutcome, run_training};
