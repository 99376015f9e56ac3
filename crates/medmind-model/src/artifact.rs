//! On-disk model and scaler artifacts.
//!
//! Each artifact is a JSON envelope: an [`ArtifactHeader`] plus the payload.
//! The header records the ordered feature names and the training run, so a
//! scaler/model pair fit on a different feature layout, or on different
//! runs, is rejected at load time instead of producing silent garbage.

use std::fmt;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use medmind_core::FEATURE_NAMES;

use crate::error::ArtifactError;
use crate::model::TrainedModel;
use crate::scaler::ScalerState;

/// Bump when the envelope or payload shape changes incompatibly.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Scaler,
    Model,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Scaler => f.write_str("scaler"),
            ArtifactKind::Model => f.write_str("model"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactHeader {
    pub format_version: u32,
    pub kind: ArtifactKind,
    /// Feature names in the order the payload was fit on.
    pub feature_names: Vec<String>,
    /// Shared by every artifact written by one training job.
    pub training_run: Uuid,
    pub created_at: jiff::Timestamp,
}

impl ArtifactHeader {
    pub fn new(kind: ArtifactKind, training_run: Uuid) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            kind,
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            training_run,
            created_at: jiff::Timestamp::now(),
        }
    }

    fn verify(&self, path: &Path, expected: ArtifactKind) -> Result<(), ArtifactError> {
        if self.format_version != FORMAT_VERSION {
            return Err(ArtifactError::UnsupportedVersion {
                path: path.to_path_buf(),
                found: self.format_version,
                supported: FORMAT_VERSION,
            });
        }
        if self.kind != expected {
            return Err(ArtifactError::WrongKind {
                path: path.to_path_buf(),
                expected,
                found: self.kind,
            });
        }
        if self.feature_names.iter().map(String::as_str).ne(FEATURE_NAMES) {
            return Err(ArtifactError::FeatureMismatch {
                path: path.to_path_buf(),
                expected: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
                found: self.feature_names.clone(),
            });
        }
        Ok(())
    }
}

/// Header + payload envelope as written to disk.
#[derive(Debug, Serialize, Deserialize)]
pub struct Artifact<T> {
    pub header: ArtifactHeader,
    pub payload: T,
}

pub type ScalerArtifact = Artifact<ScalerState>;
pub type ModelArtifact = Artifact<TrainedModel>;

/// Write a fitted scaler. Returns the header that was stamped on it.
pub fn save_scaler(
    path: &Path,
    scaler: &ScalerState,
    training_run: Uuid,
) -> Result<ArtifactHeader, ArtifactError> {
    let header = ArtifactHeader::new(ArtifactKind::Scaler, training_run);
    write_json_atomic(
        path,
        &Artifact {
            header: header.clone(),
            payload: scaler,
        },
    )?;
    tracing::info!(path = %path.display(), run = %training_run, "scaler artifact saved");
    Ok(header)
}

/// Write a fitted model. Returns the header that was stamped on it.
pub fn save_model(
    path: &Path,
    model: &TrainedModel,
    training_run: Uuid,
) -> Result<ArtifactHeader, ArtifactError> {
    let header = ArtifactHeader::new(ArtifactKind::Model, training_run);
    write_json_atomic(
        path,
        &Artifact {
            header: header.clone(),
            payload: model,
        },
    )?;
    tracing::info!(
        path = %path.display(),
        run = %training_run,
        kind = %model.kind(),
        "model artifact saved"
    );
    Ok(header)
}

pub fn load_scaler(path: &Path) -> Result<ScalerArtifact, ArtifactError> {
    let artifact: ScalerArtifact = read_artifact(path, ArtifactKind::Scaler)?;
    artifact
        .payload
        .check()
        .map_err(|reason| ArtifactError::InvalidScaler {
            path: path.to_path_buf(),
            reason,
        })?;
    tracing::info!(path = %path.display(), run = %artifact.header.training_run, "scaler loaded");
    Ok(artifact)
}

pub fn load_model(path: &Path) -> Result<ModelArtifact, ArtifactError> {
    let artifact: ModelArtifact = read_artifact(path, ArtifactKind::Model)?;
    tracing::info!(
        path = %path.display(),
        run = %artifact.header.training_run,
        kind = %artifact.payload.kind(),
        "model loaded"
    );
    Ok(artifact)
}

/// Serialize `value` as pretty JSON to `path`, via a temp file and rename
/// so readers never observe a half-written artifact.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ArtifactError> {
    let json = serde_json::to_vec_pretty(value)?;
    write_bytes_atomic(path, &json)
}

/// Write raw bytes to `path` via a temp file and rename.
pub fn write_bytes_atomic(path: &Path, bytes: &[u8]) -> Result<(), ArtifactError> {
    let io_err = |source: std::io::Error| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);

    std::fs::write(tmp_path, bytes).map_err(io_err)?;
    std::fs::rename(tmp_path, path).map_err(io_err)?;
    Ok(())
}

/// Parse the envelope, check the header, then decode the payload. Header
/// problems are reported before payload shape problems.
fn read_artifact<T: DeserializeOwned>(
    path: &Path,
    expected: ArtifactKind,
) -> Result<Artifact<T>, ArtifactError> {
    let raw: Artifact<serde_json::Value> = read_json(path)?;
    raw.header.verify(path, expected)?;
    let payload = serde_json::from_value(raw.payload).map_err(|source| ArtifactError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Artifact {
        header: raw.header,
        payload,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let bytes = std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ArtifactError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ArtifactError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}
