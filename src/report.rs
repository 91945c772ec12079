use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::predict::{Observer, Pass, PredictionResult, SatelliteState, Visibility};

const PASSES_SHOWN: usize = 5;

#[derive(Debug, Serialize)]
pub struct Report {
    pub timestamp: DateTime<Utc>,
    pub satellite: SatelliteReport,
    pub ground_station: Observer,
    pub visibility: VisibilityReport,
    pub predictions: PredictionsReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ground_track: Option<Vec<TrackPoint>>,
}

#[derive(Debug, Serialize)]
pub struct SatelliteReport {
    pub name: String,
    pub norad_id: u64,
    pub tle_source: String,
    pub position: PositionReport,
    pub orbital_period_minutes: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct PositionReport {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_km: f64,
    pub velocity_kms: f64,
}

#[derive(Debug, Serialize)]
pub struct VisibilityReport {
    pub azimuth_degrees: f64,
    pub elevation_degrees: f64,
    pub range_km: f64,
    pub is_visible: bool,
}

#[derive(Debug, Serialize)]
pub struct PredictionsReport {
    pub prediction_period_hours: f64,
    pub minimum_elevation_degrees: f64,
    pub total_passes: usize,
    pub passes: Vec<PassReport>,
    pub current_pass: Option<PassReport>,
    pub next_pass: Option<NextPassReport>,
}

#[derive(Debug, Serialize)]
pub struct PassReport {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub max_elevation: f64,
    pub max_elevation_time: DateTime<Utc>,
    pub duration_minutes: f64,
    pub started_before_window: bool,
    pub ends_after_window: bool,
}

#[derive(Debug, Serialize)]
pub struct NextPassReport {
    pub time_to_next_pass_minutes: f64,
    pub next_pass: PassReport,
}

#[derive(Debug, Serialize)]
pub struct TrackPoint {
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&Pass> for PassReport {
    fn from(p: &Pass) -> Self {
        Self {
            start_time: p.start,
            end_time: p.end,
            max_elevation: round2(p.max_elevation_deg),
            max_elevation_time: p.max_elevation_time,
            duration_minutes: round1(p.duration_minutes()),
            started_before_window: p.started_before_window,
            ends_after_window: p.ends_after_window,
        }
    }
}

impl From<&SatelliteState> for PositionReport {
    fn from(s: &SatelliteState) -> Self {
        Self {
            latitude: round6(s.latitude_deg),
            longitude: round6(s.longitude_deg),
            altitude_km: round2(s.altitude_km),
            velocity_kms: round2(s.velocity_km_s),
        }
    }
}

impl From<&Visibility> for VisibilityReport {
    fn from(v: &Visibility) -> Self {
        Self {
            azimuth_degrees: round2(v.look.azimuth_deg),
            elevation_degrees: round2(v.look.elevation_deg),
            range_km: round2(v.look.range_km),
            is_visible: v.is_visible,
        }
    }
}

impl From<&PredictionResult> for PredictionsReport {
    fn from(r: &PredictionResult) -> Self {
        Self {
            prediction_period_hours: r.window_hours,
            minimum_elevation_degrees: r.min_elevation_deg,
            total_passes: r.passes.len(),
            passes: r.passes.iter().map(PassReport::from).collect(),
            current_pass: r.current_pass().map(PassReport::from),
            next_pass: r.next_pass().map(|n| NextPassReport {
                time_to_next_pass_minutes: round1(n.minutes_until),
                next_pass: PassReport::from(&n.pass),
            }),
        }
    }
}

impl From<&SatelliteState> for TrackPoint {
    fn from(s: &SatelliteState) -> Self {
        Self {
            timestamp: s.timestamp,
            latitude: round6(s.latitude_deg),
            longitude: round6(s.longitude_deg),
        }
    }
}

impl Report {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn print_human(&self) {
        let sat = &self.satellite;
        let pos = &sat.position;
        println!("Satellite: {} (NORAD {})", sat.name, sat.norad_id);
        println!("Latitude:  {:.4}°", pos.latitude);
        println!("Longitude: {:.4}°", pos.longitude);
        println!("Altitude:  {:.2} km", pos.altitude_km);
        println!("Velocity:  {:.2} km/s", pos.velocity_kms);
        match sat.orbital_period_minutes {
            Some(period) => println!("Orbital Period: {:.1} minutes", period),
            None => println!("Orbital Period: unavailable"),
        }

        let vis = &self.visibility;
        println!();
        println!("Azimuth:   {:.2}°", vis.azimuth_degrees);
        println!("Elevation: {:.2}°", vis.elevation_degrees);
        println!("Range:     {:.2} km", vis.range_km);
        if vis.is_visible {
            println!("Satellite is currently visible from your ground station.");
        } else {
            println!("Satellite is NOT currently visible from your ground station.");
        }

        let pred = &self.predictions;
        println!();
        println!(
            "Pass Predictions (next {} hours, min elevation {}°):",
            pred.prediction_period_hours, pred.minimum_elevation_degrees
        );
        println!("Total passes: {}", pred.total_passes);

        if pred.passes.is_empty() {
            println!("No passes found in the prediction window.");
            return;
        }

        for (i, p) in pred.passes.iter().take(PASSES_SHOWN).enumerate() {
            println!();
            println!("Pass {}:", i + 1);
            println!("  Start:    {}", p.start_time.format("%Y-%m-%d %H:%M:%S UTC"));
            println!("  End:      {}", p.end_time.format("%Y-%m-%d %H:%M:%S UTC"));
            println!("  Duration: {} minutes", p.duration_minutes);
            println!(
                "  Max elevation: {}° at {}",
                p.max_elevation,
                p.max_elevation_time.format("%H:%M:%S UTC")
            );
        }

        println!();
        if pred.current_pass.is_some() {
            println!("Pass is happening now!");
        }
        if let Some(next) = &pred.next_pass {
            println!("Next pass in {:.1} minutes.", next.time_to_next_pass_minutes);
        }
    }
}

pub fn error_json(error: &str, timestamp: DateTime<Utc>) -> String {
    serde_json::json!({
        "error": error,
        "timestamp": timestamp,
    })
    .to_string()
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn round6(v: f64) -> f64 {
    (v * 1e6).round() / 1e6
}
