//! Model selection: lowest held-out MSE wins.
//!
//! Only the winner leaves this module with its fitted model. Losers are
//! kept in the report as metrics and dropped.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use medmind_model::{ModelKind, TrainedModel};

use crate::candidates::{Candidate, CandidateScore, Hyperparameters};
use crate::dataset::DatasetSummary;
use crate::error::TrainError;

/// Metric the policy minimizes, as written to the report.
pub const SELECTION_CRITERION: &str = "test_mse";

/// Index of the candidate with the lowest finite test MSE. Ties keep the
/// first one; `None` if no candidate has a finite test MSE.
pub fn select_best(scores: &[CandidateScore]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, score) in scores.iter().enumerate() {
        let mse = score.test.mse;
        if !mse.is_finite() {
            continue;
        }
        if best.is_none_or(|(_, best_mse)| mse < best_mse) {
            best = Some((i, mse));
        }
    }
    best.map(|(i, _)| i)
}

/// How much lower the winner's test MSE is than one loser's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Improvement {
    pub versus: ModelKind,
    /// `(loser_mse - best_mse) / loser_mse * 100`; `None` when undefined.
    pub mse_reduction_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionReport {
    pub training_run: Uuid,
    pub created_at: jiff::Timestamp,
    pub criterion: String,
    pub dataset: DatasetSummary,
    pub candidates: Vec<CandidateScore>,
    pub selected_index: usize,
    pub selected: ModelKind,
    pub improvements: Vec<Improvement>,
}

/// The outcome of selection: the winning model and the record of why.
#[derive(Debug)]
pub struct Selection {
    pub model: TrainedModel,
    pub report: SelectionReport,
}

/// Apply the policy to fitted candidates, consuming them.
pub fn select(
    candidates: Vec<Candidate>,
    dataset: DatasetSummary,
    training_run: Uuid,
) -> Result<Selection, TrainError> {
    let scores: Vec<CandidateScore> = candidates.iter().map(|c| c.score.clone()).collect();
    let selected_index = select_best(&scores).ok_or(TrainError::NoSelectableCandidate)?;
    let best_mse = scores[selected_index].test.mse;

    let improvements = scores
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != selected_index)
        .map(|(_, loser)| Improvement {
            versus: loser.kind,
            mse_reduction_pct: mse_reduction_pct(loser.test.mse, best_mse),
        })
        .collect();

    let model = candidates
        .into_iter()
        .nth(selected_index)
        .map(|c| c.model)
        .ok_or(TrainError::NoSelectableCandidate)?;

    let report = SelectionReport {
        training_run,
        created_at: jiff::Timestamp::now(),
        criterion: SELECTION_CRITERION.to_string(),
        dataset,
        selected: scores[selected_index].kind,
        candidates: scores,
        selected_index,
        improvements,
    };

    tracing::info!(
        selected = %report.selected,
        test_mse = best_mse,
        run = %training_run,
        "model selected"
    );
    Ok(Selection { model, report })
}

fn mse_reduction_pct(loser_mse: f64, best_mse: f64) -> Option<f64> {
    if !loser_mse.is_finite() || loser_mse <= 0.0 {
        return None;
    }
    Some((loser_mse - best_mse) / loser_mse * 100.0)
}

const RULE: &str = "--------------------------------------------------------------------------------";
const DOUBLE_RULE: &str = "================================================================================";

impl SelectionReport {
    pub fn winner(&self) -> &CandidateScore {
        &self.candidates[self.selected_index]
    }

    /// Human-readable account of the comparison, written next to the model.
    pub fn rationale(&self) -> String {
        let mut out = String::new();
        // fmt::Write into a String cannot fail.
        let _ = self.write_rationale(&mut out);
        out
    }

    fn write_rationale(&self, out: &mut String) -> std::fmt::Result {
        let best = self.winner();

        writeln!(out, "MODEL SELECTION RATIONALE")?;
        writeln!(out, "{DOUBLE_RULE}")?;
        writeln!(out)?;
        writeln!(out, "Training run: {}", self.training_run)?;
        writeln!(out, "Created at:   {}", self.created_at)?;
        writeln!(
            out,
            "Dataset:      {} rows read, {} used, {} dropped for missing values",
            self.dataset.rows_read, self.dataset.rows_used, self.dataset.rows_dropped
        )?;
        writeln!(out)?;

        writeln!(out, "SELECTION CRITERIA")?;
        writeln!(out, "{RULE}")?;
        writeln!(out, "Primary metric: test set mean squared error (MSE).")?;
        writeln!(out, "The candidate with the lowest held-out MSE is deployed.")?;
        writeln!(out)?;

        writeln!(out, "COMPARISON RESULTS")?;
        writeln!(out, "{RULE}")?;
        writeln!(
            out,
            "{:<20} {:>11} {:>11} {:>10} {:>10} {:>9} {:>9} {:>10}",
            "Model", "Train MSE", "Test MSE", "Train RMSE", "Test RMSE", "Train R2", "Test R2", "Fit (s)"
        )?;
        for c in &self.candidates {
            writeln!(
                out,
                "{:<20} {:>11.4} {:>11.4} {:>10.4} {:>10.4} {:>9.4} {:>9.4} {:>10.3}",
                c.kind.display_name(),
                c.train.mse,
                c.test.mse,
                c.train.rmse,
                c.test.rmse,
                c.train.r2,
                c.test.r2,
                c.fit_seconds
            )?;
        }
        writeln!(out)?;

        writeln!(out, "SELECTED MODEL")?;
        writeln!(out, "{RULE}")?;
        writeln!(out, "Model: {}", best.kind)?;
        writeln!(out, "Test MSE: {:.4}", best.test.mse)?;
        writeln!(out, "Test R2: {:.4}", best.test.r2)?;
        writeln!(out, "Test RMSE: {:.4}", best.test.rmse)?;
        writeln!(out)?;

        writeln!(out, "PERFORMANCE IMPROVEMENTS")?;
        writeln!(out, "{RULE}")?;
        for imp in &self.improvements {
            match imp.mse_reduction_pct {
                Some(pct) => writeln!(out, "vs {}: {pct:.2}% MSE reduction", imp.versus)?,
                None => writeln!(out, "vs {}: not comparable", imp.versus)?,
            }
        }
        writeln!(out)?;

        writeln!(out, "RATIONALE FOR SELECTION")?;
        writeln!(out, "{RULE}")?;
        writeln!(
            out,
            "{} achieved the lowest test MSE ({:.4}), explaining {:.1}% of the",
            best.kind,
            best.test.mse,
            best.test.r2 * 100.0
        )?;
        writeln!(out, "variance in held-out adherence.")?;
        match best.hyperparameters {
            Hyperparameters::LinearRegression => {
                writeln!(out, "A linear fit is the simplest candidate and its coefficients")?;
                writeln!(out, "are directly interpretable per feature.")?;
            }
            Hyperparameters::DecisionTree(p) => {
                writeln!(
                    out,
                    "Single tree: max depth {}, min samples split {}, min samples leaf {}.",
                    depth(p.max_depth),
                    p.min_samples_split,
                    p.min_samples_leaf
                )?;
                writeln!(out, "Its splits capture non-linear thresholds in the features.")?;
            }
            Hyperparameters::RandomForest(p) => {
                writeln!(
                    out,
                    "Ensemble of {} trees (max depth {}, {} features per split, seed {}), averaged per prediction.",
                    p.n_trees,
                    depth(p.max_depth),
                    p.max_features
                        .map_or_else(|| "sqrt".to_string(), |m| m.to_string()),
                    p.seed
                )?;
                writeln!(out, "Averaging reduces the variance of individual trees.")?;
            }
        }

        let gap = best.train.r2 - best.test.r2;
        writeln!(out, "Train-test R2 gap: {gap:.4}")?;
        if gap < 0.10 {
            writeln!(out, "The small gap indicates the model generalizes to unseen patients.")?;
        } else {
            writeln!(out, "The gap shows some overfitting; monitor on fresh data.")?;
        }
        Ok(())
    }
}

fn depth(max_depth: Option<u16>) -> String {
    max_depth.map_or_else(|| "unlimited".to_string(), |d| d.to_string())
}
