use chrono::{DateTime, Utc};

use crate::predict::error::{ConfigurationError, PredictError};
use crate::predict::geometry::Geometry;
use crate::predict::observer::Observer;
use crate::predict::propagation::Propagator;
use crate::predict::types::{LookAngles, Visibility};

pub const HORIZON_ELEVATION: f64 = 0.0;

/// An observer paired with the collaborators needed to look at the sky.
pub struct Viewpoint<P, G> {
    pub observer: Observer,
    pub propagator: P,
    pub geometry: G,
}

impl<P: Propagator, G: Geometry> Viewpoint<P, G> {
    pub fn new(observer: Observer, propagator: P, geometry: G) -> Self {
        Self {
            observer,
            propagator,
            geometry,
        }
    }

    pub fn look(&self, at: DateTime<Utc>) -> Result<LookAngles, PredictError> {
        let state = self.propagator.state_at(at)?;
        Ok(self.geometry.look_angles(&self.observer, &state))
    }

    pub fn elevation(&self, at: DateTime<Utc>) -> Result<f64, PredictError> {
        Ok(self.look(at)?.elevation_deg)
    }
}

pub(crate) fn validate_min_elevation(min_elevation_deg: f64) -> Result<(), ConfigurationError> {
    if !min_elevation_deg.is_finite() || !(-90.0..=90.0).contains(&min_elevation_deg) {
        return Err(ConfigurationError::MinElevation(min_elevation_deg));
    }
    Ok(())
}

/// Look angles at `at`, visible when elevation reaches `min_elevation_deg`.
pub fn check_visibility<P: Propagator, G: Geometry>(
    viewpoint: &Viewpoint<P, G>,
    at: DateTime<Utc>,
    min_elevation_deg: Option<f64>,
) -> Result<Visibility, PredictError> {
    let threshold = min_elevation_deg.unwrap_or(HORIZON_ELEVATION);
    validate_min_elevation(threshold)?;
    viewpoint.observer.validate()?;

    let look = viewpoint.look(at)?;
    Ok(Visibility {
        is_visible: look.elevation_deg >= threshold,
        look,
    })
}
