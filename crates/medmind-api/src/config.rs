use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_MODEL_PATH: &str = "models/model.json";
pub const DEFAULT_SCALER_PATH: &str = "models/scaler.json";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name}={value:?} is not a socket address: {source}")]
    InvalidAddr {
        name: &'static str,
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("{name}={value:?} is not a boolean (use true/false/1/0)")]
    InvalidFlag { name: &'static str, value: String },
}

/// Service settings, read from `MEDMIND_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
    pub bind_addr: SocketAddr,
    /// Start and report unhealthy instead of exiting when artifacts fail
    /// to load.
    pub allow_degraded: bool,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; unset variables take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let model_path = lookup("MEDMIND_MODEL_PATH").unwrap_or_else(|| DEFAULT_MODEL_PATH.into());
        let scaler_path =
            lookup("MEDMIND_SCALER_PATH").unwrap_or_else(|| DEFAULT_SCALER_PATH.into());

        let addr = lookup("MEDMIND_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr = addr.parse().map_err(|source| ConfigError::InvalidAddr {
            name: "MEDMIND_BIND_ADDR",
            value: addr.clone(),
            source,
        })?;

        let allow_degraded = match lookup("MEDMIND_ALLOW_DEGRADED") {
            None => false,
            Some(value) => parse_flag("MEDMIND_ALLOW_DEGRADED", value)?,
        };

        Ok(Self {
            model_path: model_path.into(),
            scaler_path: scaler_path.into(),
            bind_addr,
            allow_degraded,
        })
    }
}

fn parse_flag(name: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { name, value }),
    }
}
