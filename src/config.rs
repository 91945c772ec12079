use chrono::Duration;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::predict::{ConfigurationError, Observer, PassSearch};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid duration '{value}': {message}")]
    Duration { value: String, message: String },
    #[error(transparent)]
    Invalid(#[from] ConfigurationError),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub station: Option<StationConfig>,
    #[serde(default)]
    pub predict: PredictConfig,
    #[serde(default)]
    pub tle: Option<TleConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationConfig {
    pub coordinates: String,
    #[serde(default)]
    pub altitude_km: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictConfig {
    /// humantime span, e.g. `24h` or `90m`.
    pub window: Option<String>,
    pub min_elevation_deg: Option<f64>,
    pub step_seconds: Option<u32>,
    pub tolerance_seconds: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TleConfig {
    pub path: PathBuf,
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn observer(&self) -> Result<Option<Observer>, ConfigError> {
        self.station
            .as_ref()
            .map(|s| Observer::from_coordinates(&s.coordinates, s.altitude_km))
            .transpose()
            .map_err(ConfigError::from)
    }

    /// Search parameters with unset fields left at their defaults.
    pub fn pass_search(&self) -> Result<PassSearch, ConfigError> {
        let mut search = PassSearch::default();
        if let Some(window) = &self.predict.window {
            search.window = parse_duration(window)?;
        }
        if let Some(min_el) = self.predict.min_elevation_deg {
            search.min_elevation_deg = min_el;
        }
        if let Some(step) = self.predict.step_seconds {
            search.step = Duration::seconds(step.into());
        }
        if let Some(tolerance) = self.predict.tolerance_seconds {
            search.tolerance = Duration::seconds(tolerance.into());
        }
        Ok(search)
    }
}

pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    let err = |message: String| ConfigError::Duration {
        value: s.to_string(),
        message,
    };
    humantime::parse_duration(s.trim())
        .map_err(|e| err(e.to_string()))
        .and_then(|d| Duration::from_std(d).map_err(|e| err(e.to_string())))
}
