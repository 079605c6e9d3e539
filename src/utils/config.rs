use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::validation::error::{ConfigError, ConfigResult};

/// Anchor watch tuning parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorWatchConfig {
    /// Radius of the first estimate before any fit (meters)
    pub chain_length_m: f64,
    /// Outer Levenberg-Marquardt iterations per fit
    pub fit_max_iterations: usize,
    /// Damping retries per outer iteration
    pub fit_inner_iterations: usize,
    /// Relative cost improvement that ends a fit
    pub fit_tolerance: f64,
    /// Upper bound for the suggested update interval (seconds)
    pub max_suggested_interval_s: f64,
}

impl Default for AnchorWatchConfig {
    fn default() -> Self {
        Self {
            chain_length_m: 60.0,
            fit_max_iterations: 25,
            fit_inner_iterations: 5,
            fit_tolerance: 1e-8,
            max_suggested_interval_s: 60.0,
        }
    }
}

impl AnchorWatchConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.chain_length_m.is_finite() || self.chain_length_m <= 0.0 {
            return Err(ConfigError::invalid(
                "chain_length_m",
                self.chain_length_m,
                "must be a positive number of meters",
            ));
        }
        if self.fit_max_iterations == 0 {
            return Err(ConfigError::invalid("fit_max_iterations", 0, "must be at least 1"));
        }
        if self.fit_inner_iterations == 0 {
            return Err(ConfigError::invalid("fit_inner_iterations", 0, "must be at least 1"));
        }
        if !self.fit_tolerance.is_finite() || self.fit_tolerance < 0.0 {
            return Err(ConfigError::invalid(
                "fit_tolerance",
                self.fit_tolerance,
                "must be non-negative",
            ));
        }
        if !self.max_suggested_interval_s.is_finite() || self.max_suggested_interval_s <= 0.0 {
            return Err(ConfigError::invalid(
                "max_suggested_interval_s",
                self.max_suggested_interval_s,
                "must be a positive number of seconds",
            ));
        }
        Ok(())
    }

    /// Parses and validates; missing fields take their defaults
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: AnchorWatchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path_str.clone(),
            source,
        })?;
        let config = Self::from_json(&content)?;
        log::info!("Loaded configuration from {}", path_str);
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let content = self.to_json()?;
        fs::write(&path, content).map_err(|source| ConfigError::Io {
            path: path_str.clone(),
            source,
        })?;
        log::info!("Saved configuration to {}", path_str);
        Ok(())
    }
}
