mod error;
mod geometry;
mod observer;
mod pass_finder;
mod period;
mod propagation;
mod tle_loader;
mod track;
mod types;
mod visibility;

#[cfg(test)]
mod testing;

pub use error::{ConfigurationError, PredictError};
pub use geometry::Wgs84Geometry;
pub use observer::Observer;
pub use pass_finder::{predict_passes, PassSearch};
pub use period::estimate_period_minutes;
pub use propagation::{Propagator, Sgp4Propagator};
pub use tle_loader::TleLoader;
pub use track::{ground_track, track_span, TRACK_STEP};
pub use types::{Pass, PredictionResult, SatelliteState, Visibility};
pub use visibility::{check_visibility, Viewpoint, HORIZON_ELEVATION};
