use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Geodetic snapshot of the satellite at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SatelliteState {
    pub timestamp: DateTime<Utc>,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_km: f64,
    pub velocity_km_s: f64,
}

/// Topocentric direction from the observer to the satellite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LookAngles {
    pub timestamp: DateTime<Utc>,
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    pub range_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Visibility {
    pub look: LookAngles,
    pub is_visible: bool,
}

/// A contiguous interval with elevation at or above the search threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pass {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub max_elevation_deg: f64,
    pub max_elevation_time: DateTime<Utc>,
    /// The satellite was already above the threshold at the reference instant.
    pub started_before_window: bool,
    /// The pass was still in progress when the search window closed.
    pub ends_after_window: bool,
}

impl Pass {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_minutes(&self) -> f64 {
        seconds(self.duration()) / 60.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextPass {
    pub minutes_until: f64,
    pub pass: Pass,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub reference: DateTime<Utc>,
    pub window_hours: f64,
    pub min_elevation_deg: f64,
    pub passes: Vec<Pass>,
}

impl PredictionResult {
    /// First pass that begins at or after the reference instant. A pass
    /// already in progress is reported by [`current_pass`](Self::current_pass)
    /// instead.
    pub fn next_pass(&self) -> Option<NextPass> {
        self.passes
            .iter()
            .find(|p| !p.started_before_window && p.start >= self.reference)
            .map(|p| NextPass {
                minutes_until: seconds(p.start - self.reference) / 60.0,
                pass: p.clone(),
            })
    }

    pub fn current_pass(&self) -> Option<&Pass> {
        self.passes.iter().find(|p| p.started_before_window)
    }
}

pub(crate) fn seconds(d: Duration) -> f64 {
    match d.num_microseconds() {
        Some(us) => us as f64 / 1e6,
        None => d.num_milliseconds() as f64 / 1e3,
    }
}

/// Scale a span by a real factor, at microsecond resolution.
pub(crate) fn scale(d: Duration, factor: f64) -> Duration {
    Duration::microseconds((seconds(d) * factor * 1e6).round() as i64)
}
