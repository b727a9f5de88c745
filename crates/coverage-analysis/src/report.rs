//! Per-observer coverage reports
//!
//! Windows from different satellites are neither merged nor deduplicated,
//! so simultaneous coverage counts once per satellite and the coverage
//! percentage can exceed 100.

use chrono::{DateTime, Utc};
use orbital_mechanics::position::round_to;
use orbital_mechanics::Satellite;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ScanConfig;
use crate::observer::Observer;
use crate::pass::{scan_windows, seconds_between, VisibilityWindow};
use crate::Result;

/// A pass in the context of constellation coverage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoverageWindow {
    pub satellite_name: String,
    pub norad_id: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub max_elevation_time: DateTime<Utc>,
    pub max_elevation_deg: f64,
    pub duration_seconds: f64,
}

impl CoverageWindow {
    fn from_window(satellite: &Satellite, window: &VisibilityWindow) -> Self {
        Self {
            satellite_name: satellite.name.clone(),
            norad_id: satellite.norad_id,
            start_time: window.rise_time,
            end_time: window.set_time,
            max_elevation_time: window.max_elevation_time,
            max_elevation_deg: window.max_elevation_deg,
            duration_seconds: window.duration_seconds(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CityCoverageReport {
    pub observer_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub analysis_hours: f64,
    pub start_time: DateTime<Utc>,
    pub total_coverage_seconds: f64,
    /// Sum of window durations over the horizon, 2 dp. Not clamped at 100.
    pub coverage_percentage: f64,
    pub num_passes: usize,
    /// 1 dp
    pub avg_gap_minutes: f64,
    /// 1 dp
    pub max_gap_minutes: f64,
    /// 1 dp
    pub avg_pass_duration_seconds: f64,
    /// Chronological by start time
    pub windows: Vec<CoverageWindow>,
}

/// Idle intervals (seconds) between `start`, the windows, and `end`.
///
/// `windows` must be sorted by start time. Only positive gaps are listed,
/// so adjacent or overlapping windows contribute nothing. With no windows
/// the single gap is the whole interval.
pub fn coverage_gaps_seconds(
    windows: &[CoverageWindow],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<f64> {
    let (first, last) = match (windows.first(), windows.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return vec![seconds_between(start, end)],
    };

    let leading = std::iter::once(seconds_between(start, first.start_time));
    let between = windows
        .windows(2)
        .map(|pair| seconds_between(pair[0].end_time, pair[1].start_time));
    let trailing = std::iter::once(seconds_between(last.end_time, end));

    leading
        .chain(between)
        .chain(trailing)
        .filter(|gap| *gap > 0.0)
        .collect()
}

/// Mean and longest gap in seconds between `start` and `end`.
///
/// With no windows both are the whole interval. Windows that leave no
/// positive gap (back to back or overlapping across the interval) give 0.
fn gap_statistics(
    windows: &[CoverageWindow],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> (f64, f64) {
    if windows.is_empty() {
        let horizon = seconds_between(start, end);
        return (horizon, horizon);
    }

    let gaps = coverage_gaps_seconds(windows, start, end);
    if gaps.is_empty() {
        return (0.0, 0.0);
    }

    let total = gaps.iter().fold(0.0, |acc, gap| acc + gap);
    let max = gaps.iter().copied().fold(f64::MIN, f64::max);
    (total / gaps.len() as f64, max)
}

/// Coverage of `observer` by every satellite over `[start, start + hours)`.
pub fn city_coverage(
    satellites: &[Satellite],
    observer_name: &str,
    observer: &Observer,
    start: DateTime<Utc>,
    config: &ScanConfig,
) -> Result<CityCoverageReport> {
    config.validate()?;

    let mut windows: Vec<CoverageWindow> = satellites
        .par_iter()
        .flat_map_iter(|sat| {
            scan_windows(sat, observer, start, config)
                .into_iter()
                .map(move |w| CoverageWindow::from_window(sat, &w))
        })
        .collect();

    windows.sort_by_key(|w| w.start_time);

    let horizon_seconds = config.horizon_seconds();
    // fold from +0.0: an empty f64 sum is -0.0
    let total_coverage_seconds = windows.iter().fold(0.0, |acc, w| acc + w.duration_seconds);
    let coverage_pct = total_coverage_seconds / horizon_seconds * 100.0;

    let (avg_gap, max_gap) = gap_statistics(&windows, start, config.horizon_end(start));

    let avg_pass = if windows.is_empty() {
        0.0
    } else {
        total_coverage_seconds / windows.len() as f64
    };

    info!(
        "{}: {} passes, {:.2}% coverage, max gap {:.1} min",
        observer_name,
        windows.len(),
        coverage_pct,
        max_gap / 60.0
    );

    Ok(CityCoverageReport {
        observer_name: observer_name.to_string(),
        latitude: observer.latitude_deg,
        longitude: observer.longitude_deg,
        analysis_hours: config.hours,
        start_time: start,
        total_coverage_seconds,
        coverage_percentage: round_to(coverage_pct, 2),
        num_passes: windows.len(),
        avg_gap_minutes: round_to(avg_gap / 60.0, 1),
        max_gap_minutes: round_to(max_gap / 60.0, 1),
        avg_pass_duration_seconds: round_to(avg_pass, 1),
        windows,
    })
}
