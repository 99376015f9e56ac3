//! CSV datasets: named feature columns plus an optional target column.
//!
//! Columns are located by header name, so extra columns and any column
//! order are accepted. Values are always returned in `FEATURE_NAMES` order.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use medmind_core::{FEATURE_NAMES, N_FEATURES};

use crate::error::TrainError;

/// Name of the observed adherence column in training data.
pub const TARGET_COLUMN: &str = "adherence_rate";

/// Row counts recorded in the selection report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub rows_read: usize,
    pub rows_used: usize,
    pub rows_dropped: usize,
}

/// Complete training rows: features in model order and the target.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub features: Vec<[f64; N_FEATURES]>,
    pub targets: Vec<f64>,
    rows_read: usize,
}

impl Dataset {
    /// Load a training CSV. Rows with any empty or `NaN` feature or target
    /// cell are dropped; any other unparseable cell fails the load.
    pub fn load(path: &Path) -> Result<Self, TrainError> {
        let mut table = Table::open(path, true)?;
        let mut features = Vec::new();
        let mut targets = Vec::new();
        let mut rows_read = 0;

        while let Some(row) = table.next_row()? {
            rows_read += 1;
            let (Some(values), Some(target)) = (row.features, row.target) else {
                continue;
            };
            features.push(values);
            targets.push(target);
        }

        if features.is_empty() {
            return Err(TrainError::EmptyDataset {
                path: path.to_path_buf(),
            });
        }

        let dataset = Self {
            features,
            targets,
            rows_read,
        };
        tracing::info!(
            path = %path.display(),
            rows_read = dataset.rows_read,
            rows_dropped = dataset.summary().rows_dropped,
            "dataset loaded"
        );
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            rows_read: self.rows_read,
            rows_used: self.len(),
            rows_dropped: self.rows_read - self.len(),
        }
    }
}

/// Read the feature columns of a prediction input file. A target column,
/// if present, is ignored. Empty cells are an error here, not a dropped row.
pub fn read_feature_rows(path: &Path) -> Result<Vec<Vec<f64>>, TrainError> {
    let mut table = Table::open(path, false)?;
    let mut rows = Vec::new();

    while let Some(row) = table.next_row()? {
        match row.features {
            Some(values) => rows.push(values.to_vec()),
            None => {
                let column = row.first_missing.unwrap_or_default();
                return Err(TrainError::MissingValue {
                    path: path.to_path_buf(),
                    line: row.line,
                    column,
                });
            }
        }
    }
    Ok(rows)
}

struct Table {
    path: PathBuf,
    reader: csv::Reader<std::fs::File>,
    feature_idx: [usize; N_FEATURES],
    target_idx: Option<usize>,
    record: csv::StringRecord,
}

struct Row {
    line: u64,
    /// `None` when any feature cell is missing.
    features: Option<[f64; N_FEATURES]>,
    first_missing: Option<String>,
    /// `None` when the cell is missing or the target is not read.
    target: Option<f64>,
}

impl Table {
    fn open(path: &Path, require_target: bool) -> Result<Self, TrainError> {
        let csv_err = |source| TrainError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(csv_err)?;
        let headers = reader.headers().map_err(csv_err)?.clone();

        let find = |name: &str| headers.iter().position(|h| h == name);
        let missing = |name: &str| TrainError::MissingColumn {
            path: path.to_path_buf(),
            column: name.to_string(),
        };

        let mut feature_idx = [0; N_FEATURES];
        for (slot, name) in feature_idx.iter_mut().zip(FEATURE_NAMES) {
            *slot = find(name).ok_or_else(|| missing(name))?;
        }
        let target_idx = if require_target {
            Some(find(TARGET_COLUMN).ok_or_else(|| missing(TARGET_COLUMN))?)
        } else {
            None
        };

        Ok(Self {
            path: path.to_path_buf(),
            reader,
            feature_idx,
            target_idx,
            record: csv::StringRecord::new(),
        })
    }

    fn next_row(&mut self) -> Result<Option<Row>, TrainError> {
        let more = self
            .reader
            .read_record(&mut self.record)
            .map_err(|source| TrainError::Csv {
                path: self.path.clone(),
                source,
            })?;
        if !more {
            return Ok(None);
        }
        let line = self.record.position().map(|p| p.line()).unwrap_or(0);

        let mut values = [0.0; N_FEATURES];
        let mut first_missing = None;
        for ((slot, &idx), name) in values.iter_mut().zip(&self.feature_idx).zip(FEATURE_NAMES) {
            match self.cell(line, idx, name)? {
                Some(v) => *slot = v,
                None => {
                    first_missing.get_or_insert_with(|| name.to_string());
                }
            }
        }

        let target = match self.target_idx {
            Some(idx) => self.cell(line, idx, TARGET_COLUMN)?,
            None => None,
        };

        Ok(Some(Row {
            line,
            features: first_missing.is_none().then_some(values),
            first_missing,
            target,
        }))
    }

    fn cell(&self, line: u64, idx: usize, column: &str) -> Result<Option<f64>, TrainError> {
        let raw = self.record.get(idx).unwrap_or("");
        if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
            return Ok(None);
        }
        raw.parse::<f64>()
            .map(Some)
            .map_err(|_| TrainError::InvalidValue {
                path: self.path.clone(),
                line,
                column: column.to_string(),
                value: raw.to_string(),
            })
    }
}
