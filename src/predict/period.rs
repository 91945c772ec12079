use chrono::{DateTime, Duration, Utc};
use std::f64::consts::TAU;

use crate::predict::error::PredictError;
use crate::predict::geometry::{ecef_to_inertial, geodetic_to_ecef_km, norm, EARTH_ROTATION_RAD_S};
use crate::predict::propagation::Propagator;
use crate::predict::types::{seconds, SatelliteState};

const MINUTES_PER_DAY: f64 = 1440.0;
const SAMPLE_SPACING: Duration = Duration::seconds(60);

/// Orbital period in minutes. Uses the propagator's mean motion when it has
/// one, otherwise measures the inertial angular rate between two samples.
pub fn estimate_period_minutes<P: Propagator>(
    propagator: &P,
    at: DateTime<Utc>,
) -> Result<f64, PredictError> {
    if let Some(mean_motion) = propagator.mean_motion_rev_per_day() {
        return finite_period(MINUTES_PER_DAY / mean_motion);
    }

    let first = propagator.state_at(at)?;
    let second = propagator.state_at(at + SAMPLE_SPACING)?;
    finite_period(empirical_period_minutes(&first, &second))
}

fn empirical_period_minutes(first: &SatelliteState, second: &SatelliteState) -> f64 {
    let dt = seconds(second.timestamp - first.timestamp);
    let r1 = geodetic_to_ecef_km(first.latitude_deg, first.longitude_deg, first.altitude_km);
    let r2_fixed =
        geodetic_to_ecef_km(second.latitude_deg, second.longitude_deg, second.altitude_km);
    // Undo the Earth's rotation so both vectors share the frame of `first`.
    let r2 = ecef_to_inertial(r2_fixed, EARTH_ROTATION_RAD_S * dt);

    let dot = r1[0] * r2[0] + r1[1] * r2[1] + r1[2] * r2[2];
    let cos_angle = (dot / (norm(r1) * norm(r2))).clamp(-1.0, 1.0);
    let rate = cos_angle.acos() / dt;

    TAU / rate / 60.0
}

fn finite_period(minutes: f64) -> Result<f64, PredictError> {
    if minutes.is_finite() && minutes > 0.0 {
        Ok(minutes)
    } else {
        Err(PredictError::PeriodUnavailable(format!(
            "degenerate orbit (computed {minutes} min)"
        )))
    }
}
