use chrono::{DateTime, Duration, Utc};

use crate::predict::error::{ConfigurationError, PredictError};
use crate::predict::propagation::Propagator;
use crate::predict::types::{scale, SatelliteState};

/// Span drawn when the orbital period is unknown.
pub const DEFAULT_TRACK_SPAN: Duration = Duration::minutes(90);
pub const TRACK_STEP: Duration = Duration::seconds(60);

/// Span covering one revolution, or [`DEFAULT_TRACK_SPAN`] without a period.
pub fn track_span(period_minutes: Option<f64>) -> Duration {
    period_minutes
        .map(|minutes| scale(Duration::minutes(1), minutes))
        .unwrap_or(DEFAULT_TRACK_SPAN)
}

/// Sample the sub-satellite point from `start` to `start + span` inclusive.
pub fn ground_track<P: Propagator>(
    propagator: &P,
    start: DateTime<Utc>,
    span: Duration,
    step: Duration,
) -> Result<Vec<SatelliteState>, PredictError> {
    if step <= Duration::zero() {
        return Err(ConfigurationError::NonPositive { name: "track step" }.into());
    }

    let end = start + span;
    let mut cursor = start;
    let mut points = Vec::new();

    while cursor <= end {
        points.push(propagator.state_at(cursor)?);
        cursor += step;
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::testing::{epoch, CircularOrbit};

    #[test]
    fn span_follows_period() {
        assert_eq!(track_span(Some(92.5)), Duration::seconds(5550));
        assert_eq!(track_span(None), Duration::minutes(90));
    }

    #[test]
    fn samples_whole_span_inclusive() {
        let orbit = CircularOrbit::leo();
        let points = ground_track(&orbit, epoch(), Duration::minutes(10), TRACK_STEP).unwrap();
        assert_eq!(points.len(), 11);
        assert_eq!(points[0].timestamp, epoch());
        assert_eq!(points[10].timestamp, epoch() + Duration::minutes(10));
        assert!(points.iter().all(|p| p.latitude_deg.abs() <= 52.0));
    }

    #[test]
    fn one_revolution_returns_to_the_same_latitude() {
        let orbit = CircularOrbit::leo();
        let points = ground_track(&orbit, epoch(), track_span(Some(92.9)), TRACK_STEP).unwrap();
        let first = points[0].latitude_deg;
        let last = orbit.state_at(epoch() + track_span(Some(92.9))).unwrap().latitude_deg;
        assert!((first - last).abs() < 0.1);
    }

    #[test]
    fn rejects_zero_step() {
        let result = ground_track(
            &CircularOrbit::leo(),
            epoch(),
            Duration::minutes(1),
            Duration::zero(),
        );
        assert!(result.is_err());
    }
}
