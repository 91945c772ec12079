use chrono::{DateTime, Utc};
use thiserror::Error;

/// The propagator could not produce a state for the requested instant.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("propagation failed at {at}: {message}")]
pub struct PropagationError {
    pub at: DateTime<Utc>,
    pub message: String,
}

impl PropagationError {
    pub fn new(at: DateTime<Utc>, message: impl Into<String>) -> Self {
        Self {
            at,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("latitude {0} out of range [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} out of range [-180, 180]")]
    Longitude(f64),
    #[error("altitude {0} km below the supported minimum")]
    Altitude(f64),
    #[error("invalid coordinates '{0}', expected \"lat, lon\"")]
    Coordinates(String),
    #[error("minimum elevation {0} out of range [-90, 90]")]
    MinElevation(f64),
    #[error("search window must not be negative (got {0} s)")]
    NegativeWindow(i64),
    #[error("search window of {0} days runs past the supported date range")]
    WindowTooLarge(i64),
    #[error("{name} must be positive")]
    NonPositive { name: &'static str },
}

#[derive(Debug, Error)]
pub enum PredictError {
    #[error(transparent)]
    Propagation(#[from] PropagationError),
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("orbital period unavailable: {0}")]
    PeriodUnavailable(String),
    #[error("TLE file read error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Invalid TLE format in {file}: {message}")]
    InvalidTle { file: String, message: String },
    #[error("satellite '{0}' not found")]
    SatelliteNotFound(String),
    #[error("No satellites loaded")]
    NoSatellites,
}
