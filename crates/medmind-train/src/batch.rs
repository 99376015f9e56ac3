//! Batch prediction over a CSV file with already-trained artifacts.

use std::path::Path;

use medmind_model::AdherencePipeline;
use medmind_model::pipeline::validate_rows;

use crate::dataset::read_feature_rows;
use crate::error::TrainError;

/// Predict every row of `input`. The pipeline is loaded once and reused for
/// all rows. With `strict`, rows are first checked against the serving
/// ranges; without it, out-of-range rows are predicted as-is.
pub fn predict_file(
    model: &Path,
    scaler: &Path,
    input: &Path,
    strict: bool,
) -> Result<Vec<f64>, TrainError> {
    let pipeline = AdherencePipeline::load(model, scaler)?;
    let rows = read_feature_rows(input)?;
    if strict {
        validate_rows(&rows)?;
    }

    let predictions = pipeline.predict_adherence_batch(&rows)?;
    tracing::info!(
        input = %input.display(),
        rows = predictions.len(),
        model = %pipeline.model_kind(),
        strict,
        "batch prediction finished"
    );
    Ok(predictions)
}
