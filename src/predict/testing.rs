//! Deterministic stand-ins for the propagator and geometry collaborators.

use chrono::{DateTime, TimeZone, Utc};
use std::f64::consts::PI;

use crate::predict::error::PropagationError;
use crate::predict::geometry::{
    ecef_to_geodetic, teme_to_ecef_position, Geometry, EARTH_ROTATION_RAD_S,
};
use crate::predict::observer::Observer;
use crate::predict::propagation::Propagator;
use crate::predict::types::{seconds, LookAngles, SatelliteState};

pub const MU_EARTH_KM3_S2: f64 = 398_600.4418;

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap()
}

/// Circular Keplerian orbit with the Earth rotating underneath. Sidereal
/// angle is zero at `epoch`.
#[derive(Debug, Clone)]
pub struct CircularOrbit {
    pub epoch: DateTime<Utc>,
    pub radius_km: f64,
    pub inclination_rad: f64,
    pub raan_rad: f64,
    pub arg_latitude_rad: f64,
    pub valid_until: Option<DateTime<Utc>>,
}

impl CircularOrbit {
    pub fn with_period(period_minutes: f64, inclination_deg: f64) -> Self {
        let t = period_minutes * 60.0 / (2.0 * PI);
        Self {
            epoch: epoch(),
            radius_km: (MU_EARTH_KM3_S2 * t * t).cbrt(),
            inclination_rad: inclination_deg.to_radians(),
            raan_rad: 0.0,
            arg_latitude_rad: 0.0,
            valid_until: None,
        }
    }

    /// The ISS-like orbit used across the engine tests.
    pub fn leo() -> Self {
        Self::with_period(92.9, 51.6)
    }

    pub fn expiring_at(mut self, at: DateTime<Utc>) -> Self {
        self.valid_until = Some(at);
        self
    }

    pub fn mean_motion_rad_s(&self) -> f64 {
        (MU_EARTH_KM3_S2 / self.radius_km.powi(3)).sqrt()
    }
}

impl Propagator for CircularOrbit {
    fn state_at(&self, at: DateTime<Utc>) -> Result<SatelliteState, PropagationError> {
        if self.valid_until.is_some_and(|limit| at > limit) {
            return Err(PropagationError::new(at, "element set expired"));
        }

        let dt = seconds(at - self.epoch);
        let u = self.arg_latitude_rad + self.mean_motion_rad_s() * dt;
        let (sin_u, cos_u) = u.sin_cos();
        let (sin_o, cos_o) = self.raan_rad.sin_cos();
        let (sin_i, cos_i) = self.inclination_rad.sin_cos();
        let r = self.radius_km;
        let inertial = [
            r * (cos_u * cos_o - sin_u * cos_i * sin_o),
            r * (cos_u * sin_o + sin_u * cos_i * cos_o),
            r * sin_u * sin_i,
        ];

        let ecef = teme_to_ecef_position(inertial, EARTH_ROTATION_RAD_S * dt);
        let (latitude_deg, longitude_deg, altitude_km) = ecef_to_geodetic(ecef);

        Ok(SatelliteState {
            timestamp: at,
            latitude_deg,
            longitude_deg,
            altitude_km,
            velocity_km_s: self.mean_motion_rad_s() * r,
        })
    }
}

/// Elevation as an explicit function of seconds since [`epoch`]. The
/// propagator smuggles the value through `latitude_deg` and
/// [`ScriptedGeometry`] reads it back.
pub struct ScriptedSky<F> {
    pub profile: F,
}

impl<F: Fn(f64) -> f64> Propagator for ScriptedSky<F> {
    fn state_at(&self, at: DateTime<Utc>) -> Result<SatelliteState, PropagationError> {
        Ok(SatelliteState {
            timestamp: at,
            latitude_deg: (self.profile)(seconds(at - epoch())),
            longitude_deg: 0.0,
            altitude_km: 500.0,
            velocity_km_s: 7.6,
        })
    }
}

pub struct ScriptedGeometry;

impl Geometry for ScriptedGeometry {
    fn look_angles(&self, _observer: &Observer, state: &SatelliteState) -> LookAngles {
        LookAngles {
            timestamp: state.timestamp,
            azimuth_deg: 0.0,
            elevation_deg: state.latitude_deg,
            range_km: 1000.0,
        }
    }
}

/// 60° sine with a 600 s period, rising through 0° at [`epoch`].
pub fn sine_sky() -> ScriptedSky<impl Fn(f64) -> f64> {
    ScriptedSky {
        profile: |t: f64| 60.0 * (2.0 * PI * t / 600.0).sin(),
    }
}
