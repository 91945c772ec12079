use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

use crate::predict::error::{PredictError, PropagationError};
use crate::predict::geometry::{ecef_to_geodetic, norm, teme_to_ecef_position};
use crate::predict::types::SatelliteState;

/// Source of satellite states as a pure function of time.
pub trait Propagator {
    fn state_at(&self, at: DateTime<Utc>) -> Result<SatelliteState, PropagationError>;

    /// Mean motion in revolutions per day, when the model knows it directly.
    fn mean_motion_rev_per_day(&self) -> Option<f64> {
        None
    }
}

/// SGP4 over a single element set.
pub struct Sgp4Propagator {
    elements: Elements,
    constants: Constants,
}

impl Sgp4Propagator {
    pub fn new(elements: Elements) -> Result<Self, PredictError> {
        let constants = Constants::from_elements(&elements).map_err(|e| PredictError::InvalidTle {
            file: elements
                .object_name
                .clone()
                .unwrap_or_else(|| format!("NORAD {}", elements.norad_id)),
            message: e.to_string(),
        })?;
        Ok(Self {
            elements,
            constants,
        })
    }

    pub fn epoch(&self) -> DateTime<Utc> {
        self.elements.datetime.and_utc()
    }
}

impl Propagator for Sgp4Propagator {
    fn state_at(&self, at: DateTime<Utc>) -> Result<SatelliteState, PropagationError> {
        let minutes = self
            .elements
            .datetime_to_minutes_since_epoch(&at.naive_utc())
            .map_err(|e| PropagationError::new(at, e.to_string()))?;

        let prediction = self
            .constants
            .propagate(minutes)
            .map_err(|e| PropagationError::new(at, e.to_string()))?;

        let sidereal =
            sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&at.naive_utc()));
        let sat_ecef = teme_to_ecef_position(prediction.position, sidereal);
        let (latitude_deg, longitude_deg, altitude_km) = ecef_to_geodetic(sat_ecef);

        if !altitude_km.is_finite() {
            return Err(PropagationError::new(at, "non-finite position"));
        }

        Ok(SatelliteState {
            timestamp: at,
            latitude_deg,
            longitude_deg,
            altitude_km,
            velocity_km_s: norm(prediction.velocity),
        })
    }

    fn mean_motion_rev_per_day(&self) -> Option<f64> {
        Some(self.elements.mean_motion)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use sgp4::Elements;

    use super::Sgp4Propagator;
    use crate::predict::error::PredictError;

    impl Sgp4Propagator {
        pub fn from_tle(
            name: Option<String>,
            line1: &str,
            line2: &str,
        ) -> Result<Self, PredictError> {
            let label = name.clone().unwrap_or_else(|| "TLE".to_string());
            let elements = Elements::from_tle(name, line1.as_bytes(), line2.as_bytes())
                .map_err(|e| PredictError::InvalidTle {
                    file: label,
                    message: e.to_string(),
                })?;
            Self::new(elements)
        }
    }

    pub const ISS_NAME: &str = "ISS (ZARYA)";
    pub const ISS_LINE1: &str =
        "1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992";
    pub const ISS_LINE2: &str =
        "2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008";
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use chrono::Duration;

    fn iss() -> Sgp4Propagator {
        Sgp4Propagator::from_tle(Some(ISS_NAME.to_string()), ISS_LINE1, ISS_LINE2).unwrap()
    }

    #[test]
    fn propagates_leo_state_near_epoch() {
        let sat = iss();
        let state = sat.state_at(sat.epoch() + Duration::minutes(30)).unwrap();
        assert!(state.altitude_km > 380.0 && state.altitude_km < 460.0, "{state:?}");
        assert!(state.latitude_deg.abs() <= 52.0);
        assert!((-180.0..=180.0).contains(&state.longitude_deg));
        assert!((state.velocity_km_s - 7.66).abs() < 0.1);
    }

    #[test]
    fn is_a_pure_function_of_time() {
        let sat = iss();
        let at = sat.epoch() + Duration::hours(3);
        assert_eq!(sat.state_at(at).unwrap(), sat.state_at(at).unwrap());
    }

    #[test]
    fn exposes_mean_motion() {
        let n = iss().mean_motion_rev_per_day().unwrap();
        assert!((n - 15.495).abs() < 0.01);
    }

    #[test]
    fn rejects_corrupt_tle() {
        let err = Sgp4Propagator::from_tle(None, "1 garbage", ISS_LINE2);
        assert!(matches!(err, Err(PredictError::InvalidTle { .. })));
    }
}
