mod config;
mod predict;
mod report;

use chrono::{DateTime, Utc};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

use crate::config::{parse_duration, Config, ConfigError};
use crate::predict::{
    check_visibility, estimate_period_minutes, ground_track, predict_passes, track_span,
    Observer, PredictError, Propagator, Sgp4Propagator, TleLoader, Viewpoint, Wgs84Geometry,
    HORIZON_ELEVATION, TRACK_STEP,
};
use crate::report::{
    error_json, PositionReport, PredictionsReport, Report, SatelliteReport, TrackPoint,
    VisibilityReport,
};

#[derive(Parser)]
#[command(name = "sat-tracker")]
#[command(about = "Track a satellite by name and predict its passes over a ground station")]
struct Cli {
    /// Satellite name (partial, case-insensitive) or NORAD catalog number
    name: String,
    /// TLE file, or a directory of .tle/.txt files
    #[arg(long)]
    tle: Option<PathBuf>,
    /// YAML configuration file
    #[arg(long)]
    config: Option<String>,
    /// Ground station latitude (degrees)
    #[arg(long, allow_hyphen_values = true)]
    gs_lat: Option<f64>,
    /// Ground station longitude (degrees)
    #[arg(long, allow_hyphen_values = true)]
    gs_lon: Option<f64>,
    /// Ground station altitude (km)
    #[arg(long, allow_hyphen_values = true)]
    gs_alt: Option<f64>,
    /// How far ahead to predict passes, e.g. 24h or 90m
    #[arg(long)]
    window: Option<String>,
    /// Minimum elevation for pass prediction (degrees)
    #[arg(long, allow_hyphen_values = true)]
    min_elevation: Option<f64>,
    /// Reference instant (RFC 3339); defaults to now
    #[arg(long)]
    at: Option<DateTime<Utc>>,
    /// Output results as JSON
    #[arg(long)]
    json: bool,
    /// Include one orbit of ground track in the JSON output
    #[arg(long)]
    ground_track: bool,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Predict(#[from] PredictError),
    #[error("no TLE source given (use --tle or tle.path in the config file)")]
    NoTleSource,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    let now = cli.at.unwrap_or_else(Utc::now);

    match run(&cli, now) {
        Ok(report) => {
            if cli.json {
                match report.to_json() {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error serializing report: {}", e);
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                report.print_human();
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            if cli.json {
                println!("{}", error_json(&e.to_string(), Utc::now()));
            } else {
                eprintln!("Error: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, now: DateTime<Utc>) -> Result<Report, AppError> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let observer = resolve_observer(cli, &config)?;
    let mut search = config.pass_search()?;
    if let Some(window) = &cli.window {
        search.window = parse_duration(window)?;
    }
    if let Some(min_el) = cli.min_elevation {
        search.min_elevation_deg = min_el;
    }
    search.validate().map_err(PredictError::from)?;
    search.window_end(now).map_err(PredictError::from)?;

    let tle_path = cli
        .tle
        .clone()
        .or_else(|| config.tle.as_ref().map(|t| t.path.clone()))
        .ok_or(AppError::NoTleSource)?;
    let mut loader = TleLoader::new(tle_path);
    loader.load_all()?;
    let entry = loader.find(&cli.name)?;
    log::info!("Tracking {} (NORAD {})", entry.name, entry.norad_id);

    let propagator = Sgp4Propagator::new(entry.elements.clone())?;
    log::debug!("Element set epoch {}", propagator.epoch());
    let position = propagator.state_at(now).map_err(PredictError::from)?;

    let orbital_period = match estimate_period_minutes(&propagator, now) {
        Ok(minutes) => Some(minutes),
        Err(e) => {
            log::warn!("{}", e);
            None
        }
    };

    let track = if cli.ground_track {
        let points = ground_track(&propagator, now, track_span(orbital_period), TRACK_STEP)?;
        Some(points.iter().map(TrackPoint::from).collect())
    } else {
        None
    };

    let viewpoint = Viewpoint::new(observer, propagator, Wgs84Geometry);
    let visibility = check_visibility(&viewpoint, now, Some(HORIZON_ELEVATION))?;
    let prediction = predict_passes(&viewpoint, &search, now)?;
    log::info!(
        "Found {} passes above {}° in the next {:.1} h",
        prediction.passes.len(),
        prediction.min_elevation_deg,
        prediction.window_hours
    );

    Ok(Report {
        timestamp: now,
        satellite: SatelliteReport {
            name: entry.name.clone(),
            norad_id: entry.norad_id,
            tle_source: entry.source.clone(),
            position: PositionReport::from(&position),
            orbital_period_minutes: orbital_period.map(|p| (p * 100.0).round() / 100.0),
        },
        ground_station: observer,
        visibility: VisibilityReport::from(&visibility),
        predictions: PredictionsReport::from(&prediction),
        ground_track: track,
    })
}

/// CLI flags override the config file, which overrides the built-in station.
fn resolve_observer(cli: &Cli, config: &Config) -> Result<Observer, AppError> {
    let base = config.observer()?.unwrap_or_default();
    let observer = Observer::new(
        cli.gs_lat.unwrap_or(base.latitude_deg),
        cli.gs_lon.unwrap_or(base.longitude_deg),
        cli.gs_alt.unwrap_or(base.altitude_km),
    )
    .map_err(PredictError::from)?;
    Ok(observer)
}
