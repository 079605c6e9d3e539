//! Error types

use thiserror::Error;

/// Reasons a position update is rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FixError {
    #[error("longitude {0} is not within [-180, 180]")]
    InvalidLongitude(f64),
    #[error("latitude {0} is not within [-90, 90]")]
    InvalidLatitude(f64),
    #[error("accuracy {0} m is not a non-negative finite value")]
    InvalidAccuracy(f64),
    #[error("speed {0} kn is not a non-negative finite value")]
    InvalidSpeed(f64),
}

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {parameter} = {value}: {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
    #[error("config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("config serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn invalid(parameter: &str, value: impl ToString, reason: &str) -> Self {
        ConfigError::InvalidParameter {
            parameter: parameter.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
