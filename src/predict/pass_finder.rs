use chrono::{DateTime, Duration, Utc};

use crate::predict::error::{ConfigurationError, PredictError};
use crate::predict::geometry::Geometry;
use crate::predict::propagation::Propagator;
use crate::predict::types::{scale, seconds, Pass, PredictionResult};
use crate::predict::visibility::{validate_min_elevation, Viewpoint};

const DEFAULT_MIN_ELEVATION: f64 = 10.0;
const DEFAULT_WINDOW: Duration = Duration::hours(24);
const COARSE_STEP: Duration = Duration::seconds(20); // short enough not to skip a low pass
const CROSSING_TOLERANCE: Duration = Duration::seconds(1);
const PEAK_STEP: Duration = Duration::seconds(5);
const INV_PHI: f64 = 0.618_033_988_749_895;

/// Parameters of a pass search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassSearch {
    pub min_elevation_deg: f64,
    /// How far past the reference instant to look.
    pub window: Duration,
    /// Coarse scan step.
    pub step: Duration,
    /// Accuracy of refined rise/set times and of the peak time.
    pub tolerance: Duration,
    /// Re-scan step used inside a pass to find its peak.
    pub peak_step: Duration,
}

impl Default for PassSearch {
    fn default() -> Self {
        Self {
            min_elevation_deg: DEFAULT_MIN_ELEVATION,
            window: DEFAULT_WINDOW,
            step: COARSE_STEP,
            tolerance: CROSSING_TOLERANCE,
            peak_step: PEAK_STEP,
        }
    }
}

impl PassSearch {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        validate_min_elevation(self.min_elevation_deg)?;
        if self.window < Duration::zero() {
            return Err(ConfigurationError::NegativeWindow(self.window.num_seconds()));
        }
        for (name, value) in [
            ("step", self.step),
            ("tolerance", self.tolerance),
            ("peak step", self.peak_step),
        ] {
            if value <= Duration::zero() {
                return Err(ConfigurationError::NonPositive { name });
            }
        }
        Ok(())
    }

    /// End of the search window starting at `now`.
    pub fn window_end(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, ConfigurationError> {
        now.checked_add_signed(self.window)
            .ok_or(ConfigurationError::WindowTooLarge(self.window.num_days()))
    }

    pub fn window_hours(&self) -> f64 {
        seconds(self.window) / 3600.0
    }
}

#[derive(Debug, Clone, Copy, strum_macros::Display)]
enum Crossing {
    Rise,
    Set,
}

struct OpenPass {
    start: DateTime<Utc>,
    started_before_window: bool,
    last_above: (DateTime<Utc>, f64),
    peak: (DateTime<Utc>, f64),
}

/// Find every pass above `search.min_elevation_deg` between `now` and
/// `now + search.window`, in chronological order.
///
/// The window is scanned at `search.step`; each threshold crossing is then
/// bisected down to `search.tolerance`. Peak elevation is the largest value
/// of a `search.peak_step` re-scan of the pass, polished by a golden-section
/// search around the best sample. Elevation is not assumed unimodal over the
/// whole pass, so a pass with two humps reports the higher one.
pub fn predict_passes<P: Propagator, G: Geometry>(
    viewpoint: &Viewpoint<P, G>,
    search: &PassSearch,
    now: DateTime<Utc>,
) -> Result<PredictionResult, PredictError> {
    search.validate()?;
    viewpoint.observer.validate()?;
    let end = search.window_end(now)?;

    let mut result = PredictionResult {
        reference: now,
        window_hours: search.window_hours(),
        min_elevation_deg: search.min_elevation_deg,
        passes: Vec::new(),
    };
    if search.window.is_zero() {
        return Ok(result);
    }

    let threshold = search.min_elevation_deg;
    let mut cursor = now;
    let mut prev: Option<(DateTime<Utc>, f64)> = None;
    let mut open: Option<OpenPass> = None;

    loop {
        let elevation = viewpoint.elevation(cursor)?;
        let above = elevation >= threshold;

        if let Some(mut pass) = open.take() {
            if above {
                pass.last_above = (cursor, elevation);
                if elevation > pass.peak.1 {
                    pass.peak = (cursor, elevation);
                }
                open = Some(pass);
            } else {
                let set = refine_crossing(
                    viewpoint,
                    threshold,
                    pass.last_above,
                    (cursor, elevation),
                    Crossing::Set,
                    search.tolerance,
                )?;
                result
                    .passes
                    .push(close_pass(viewpoint, search, pass, set, false)?);
            }
        } else if above {
            let (start, started_before_window) = match prev {
                Some(below) => (
                    refine_crossing(
                        viewpoint,
                        threshold,
                        below,
                        (cursor, elevation),
                        Crossing::Rise,
                        search.tolerance,
                    )?,
                    false,
                ),
                None => (cursor, true),
            };
            open = Some(OpenPass {
                start,
                started_before_window,
                last_above: (cursor, elevation),
                peak: (cursor, elevation),
            });
        }

        prev = Some((cursor, elevation));
        if cursor >= end {
            break;
        }
        cursor = (cursor + search.step).min(end);
    }

    if let Some(pass) = open {
        result
            .passes
            .push(close_pass(viewpoint, search, pass, end, true)?);
    }

    log::debug!(
        "{} passes above {:.1}° between {} and {}",
        result.passes.len(),
        threshold,
        now,
        end
    );
    Ok(result)
}

fn close_pass<P: Propagator, G: Geometry>(
    viewpoint: &Viewpoint<P, G>,
    search: &PassSearch,
    pass: OpenPass,
    end: DateTime<Utc>,
    ends_after_window: bool,
) -> Result<Pass, PredictError> {
    let (max_elevation_time, max_elevation_deg) =
        find_peak(viewpoint, search, pass.start, end, pass.peak)?;

    log::debug!(
        "pass {} -> {}, peak {:.2}° at {}",
        pass.start,
        end,
        max_elevation_deg,
        max_elevation_time
    );

    Ok(Pass {
        start: pass.start,
        end,
        max_elevation_deg,
        max_elevation_time,
        started_before_window: pass.started_before_window,
        ends_after_window,
    })
}

/// Bisect a bracket whose ends sit on opposite sides of `threshold`, then
/// interpolate linearly inside the final bracket.
fn refine_crossing<P: Propagator, G: Geometry>(
    viewpoint: &Viewpoint<P, G>,
    threshold: f64,
    before: (DateTime<Utc>, f64),
    after: (DateTime<Utc>, f64),
    crossing: Crossing,
    tolerance: Duration,
) -> Result<DateTime<Utc>, PredictError> {
    let (mut low, mut low_el) = before;
    let (mut high, mut high_el) = after;
    let low_above = matches!(crossing, Crossing::Set);

    while high - low > tolerance {
        let mid = low + (high - low) / 2;
        let mid_el = viewpoint.elevation(mid)?;
        if (mid_el >= threshold) == low_above {
            low = mid;
            low_el = mid_el;
        } else {
            high = mid;
            high_el = mid_el;
        }
    }

    let span = high_el - low_el;
    let fraction = if span.abs() > f64::EPSILON {
        ((threshold - low_el) / span).clamp(0.0, 1.0)
    } else {
        0.5
    };
    let at = low + scale(high - low, fraction);

    log::debug!("{} crossing at {}", crossing, at);
    Ok(at)
}

fn find_peak<P: Propagator, G: Geometry>(
    viewpoint: &Viewpoint<P, G>,
    search: &PassSearch,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    seed: (DateTime<Utc>, f64),
) -> Result<(DateTime<Utc>, f64), PredictError> {
    let mut best = seed;
    let mut cursor = start;
    loop {
        let elevation = viewpoint.elevation(cursor)?;
        if elevation > best.1 {
            best = (cursor, elevation);
        }
        if cursor >= end {
            break;
        }
        cursor = (cursor + search.peak_step).min(end);
    }

    let low = (best.0 - search.peak_step).max(start);
    let high = (best.0 + search.peak_step).min(end);
    if high - low > search.tolerance {
        let polished = golden_section_max(viewpoint, low, high, search.tolerance)?;
        if polished.1 > best.1 {
            best = polished;
        }
    }
    Ok(best)
}

fn golden_section_max<P: Propagator, G: Geometry>(
    viewpoint: &Viewpoint<P, G>,
    low: DateTime<Utc>,
    high: DateTime<Utc>,
    tolerance: Duration,
) -> Result<(DateTime<Utc>, f64), PredictError> {
    let at = |offset: f64| low + Duration::microseconds((offset * 1e6).round() as i64);
    let tolerance = seconds(tolerance);

    let (mut a, mut b) = (0.0, seconds(high - low));
    let mut c = b - INV_PHI * (b - a);
    let mut d = a + INV_PHI * (b - a);
    let mut fc = viewpoint.elevation(at(c))?;
    let mut fd = viewpoint.elevation(at(d))?;

    while b - a > tolerance {
        if fc > fd {
            b = d;
            d = c;
            fd = fc;
            c = b - INV_PHI * (b - a);
            fc = viewpoint.elevation(at(c))?;
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + INV_PHI * (b - a);
            fd = viewpoint.elevation(at(d))?;
        }
    }

    let mid = at((a + b) / 2.0);
    Ok((mid, viewpoint.elevation(mid)?))
}
