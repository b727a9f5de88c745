//! Pass Prediction
//!
//! A pass is a contiguous run of samples with elevation above 0°. The scan
//! drives a two-state machine one sample at a time:
//!
//! ```text
//! BelowHorizon --(e > 0)--> InPass --(e <= 0)--> BelowHorizon
//!                             |  ^
//!                             +--+ e > peak: move the peak
//! ```
//!
//! - The peak keeps its first occurrence; equal later values do not move it.
//! - A pass closes at the first sample at or below the horizon. It is
//!   reported only if its peak reached the minimum elevation.
//! - A pass still open when the horizon ends is dropped.
//! - Samples the model cannot propagate are skipped without touching state.

use chrono::{DateTime, Utc};
use orbital_mechanics::{Propagator, Satellite};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ScanConfig;
use crate::observer::Observer;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PassState {
    BelowHorizon,
    InPass {
        rise_time: DateTime<Utc>,
        max_elevation_deg: f64,
        max_elevation_time: DateTime<Utc>,
    },
}

/// A closed pass whose peak cleared the minimum elevation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityWindow {
    pub rise_time: DateTime<Utc>,
    pub set_time: DateTime<Utc>,
    pub max_elevation_time: DateTime<Utc>,
    pub max_elevation_deg: f64,
}

impl VisibilityWindow {
    pub fn duration_seconds(&self) -> f64 {
        seconds_between(self.rise_time, self.set_time)
    }
}

pub(crate) fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let elapsed = to.signed_duration_since(from);
    match elapsed.num_microseconds() {
        Some(us) => us as f64 / 1e6,
        None => elapsed.num_milliseconds() as f64 / 1e3,
    }
}

/// Visibility state machine for one satellite over one observer.
#[derive(Debug, Clone)]
pub struct PassTracker {
    state: PassState,
    min_elevation_deg: f64,
}

impl PassTracker {
    pub fn new(min_elevation_deg: f64) -> Self {
        Self {
            state: PassState::BelowHorizon,
            min_elevation_deg,
        }
    }

    pub fn state(&self) -> PassState {
        self.state
    }

    pub fn is_in_pass(&self) -> bool {
        matches!(self.state, PassState::InPass { .. })
    }

    /// Feed the elevation observed at `time`. Returns the window closed by
    /// this sample, if any, and only when its peak cleared the threshold.
    pub fn advance(&mut self, time: DateTime<Utc>, elevation_deg: f64) -> Option<VisibilityWindow> {
        match self.state {
            PassState::BelowHorizon => {
                if elevation_deg > 0.0 {
                    self.state = PassState::InPass {
                        rise_time: time,
                        max_elevation_deg: elevation_deg,
                        max_elevation_time: time,
                    };
                }
                None
            }
            PassState::InPass {
                rise_time,
                max_elevation_deg,
                max_elevation_time,
            } => {
                if elevation_deg <= 0.0 {
                    self.state = PassState::BelowHorizon;
                    if max_elevation_deg >= self.min_elevation_deg {
                        return Some(VisibilityWindow {
                            rise_time,
                            set_time: time,
                            max_elevation_time,
                            max_elevation_deg,
                        });
                    }
                    debug!(
                        "discarding low pass {} - {}: peak {:.1}° < {:.1}°",
                        rise_time, time, max_elevation_deg, self.min_elevation_deg
                    );
                } else if elevation_deg > max_elevation_deg {
                    self.state = PassState::InPass {
                        rise_time,
                        max_elevation_deg: elevation_deg,
                        max_elevation_time: time,
                    };
                }
                None
            }
        }
    }
}

/// One predicted pass of a satellite over an observer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PassPrediction {
    pub satellite_name: String,
    pub norad_id: u32,
    pub rise_time: DateTime<Utc>,
    pub set_time: DateTime<Utc>,
    pub max_elevation_time: DateTime<Utc>,
    pub max_elevation_deg: f64,
    pub duration_seconds: f64,
}

impl PassPrediction {
    fn from_window(satellite: &Satellite, window: &VisibilityWindow) -> Self {
        Self {
            satellite_name: satellite.name.clone(),
            norad_id: satellite.norad_id,
            rise_time: window.rise_time,
            set_time: window.set_time,
            max_elevation_time: window.max_elevation_time,
            max_elevation_deg: window.max_elevation_deg,
            duration_seconds: window.duration_seconds(),
        }
    }
}

/// Feed `(time, elevation)` samples to `tracker`. A `None` elevation marks a
/// sample that failed to propagate: it is counted and leaves the state alone.
/// Returns the closed windows and the number of skipped samples.
fn collect_windows<I>(tracker: &mut PassTracker, samples: I) -> (Vec<VisibilityWindow>, usize)
where
    I: IntoIterator<Item = (DateTime<Utc>, Option<f64>)>,
{
    let mut windows = Vec::new();
    let mut skipped = 0usize;

    for (t, elevation) in samples {
        match elevation {
            Some(e) => windows.extend(tracker.advance(t, e)),
            None => skipped += 1,
        }
    }

    (windows, skipped)
}

/// Run the state machine over the scan grid. The config must be validated.
pub(crate) fn scan_windows(
    satellite: &Satellite,
    observer: &Observer,
    start: DateTime<Utc>,
    config: &ScanConfig,
) -> Vec<VisibilityWindow> {
    let propagator = match Propagator::new(satellite) {
        Ok(p) => p,
        Err(e) => {
            warn!(
                satellite = %satellite.name,
                norad_id = satellite.norad_id,
                "cannot build propagation model: {}",
                e
            );
            return Vec::new();
        }
    };

    let mut tracker = PassTracker::new(config.min_elevation_deg);
    let samples = config.time_grid(start).map(|t| {
        let elevation = propagator
            .propagate(t)
            .ok()
            .map(|state| observer.elevation_of(&state.position));
        (t, elevation)
    });
    let (windows, skipped) = collect_windows(&mut tracker, samples);

    if skipped > 0 {
        debug!(
            satellite = %satellite.name,
            "skipped {} of {} samples that failed to propagate",
            skipped,
            config.num_steps()
        );
    }
    if let PassState::InPass { rise_time, .. } = tracker.state() {
        debug!(
            satellite = %satellite.name,
            "dropping pass that rose at {} and was still open at horizon end",
            rise_time
        );
    }

    windows
}

/// Passes of one satellite over `observer` in `[start, start + hours)`, in
/// the order they were found.
pub fn predict_passes(
    satellite: &Satellite,
    observer: &Observer,
    start: DateTime<Utc>,
    config: &ScanConfig,
) -> Result<Vec<PassPrediction>> {
    config.validate()?;

    let passes: Vec<PassPrediction> = scan_windows(satellite, observer, start, config)
        .iter()
        .map(|w| PassPrediction::from_window(satellite, w))
        .collect();

    debug!(
        satellite = %satellite.name,
        "{} passes above {:.1}° in {} h",
        passes.len(),
        config.min_elevation_deg,
        config.hours
    );

    Ok(passes)
}

/// Passes of every satellite over `observer`, sorted by rise time.
pub fn predict_constellation_passes(
    satellites: &[Satellite],
    observer: &Observer,
    start: DateTime<Utc>,
    config: &ScanConfig,
) -> Result<Vec<PassPrediction>> {
    config.validate()?;

    let mut passes: Vec<PassPrediction> = satellites
        .par_iter()
        .flat_map_iter(|sat| {
            scan_windows(sat, observer, start, config)
                .into_iter()
                .map(move |w| PassPrediction::from_window(sat, &w))
        })
        .collect();

    passes.sort_by_key(|p| p.rise_time);

    info!(
        "{} passes from {} satellites over ({:.4}, {:.4})",
        passes.len(),
        satellites.len(),
        observer.latitude_deg,
        observer.longitude_deg
    );

    Ok(passes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn t(step: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(step * 30)
    }

    fn run(tracker: &mut PassTracker, elevations: &[f64]) -> Vec<VisibilityWindow> {
        elevations
            .iter()
            .enumerate()
            .filter_map(|(i, &e)| tracker.advance(t(i as i64), e))
            .collect()
    }

    #[test]
    fn test_single_pass() {
        let mut tracker = PassTracker::new(10.0);
        let windows = run(&mut tracker, &[-5.0, 2.0, 20.0, 45.0, 30.0, 5.0, -1.0, -8.0]);

        assert_eq!(windows.len(), 1);
        let w = windows[0];
        assert_eq!(w.rise_time, t(1));
        assert_eq!(w.set_time, t(6));
        assert_eq!(w.max_elevation_time, t(3));
        assert_eq!(w.max_elevation_deg, 45.0);
        assert_eq!(w.duration_seconds(), 150.0);
        assert_eq!(tracker.state(), PassState::BelowHorizon);
    }

    #[test]
    fn test_low_pass_is_discarded() {
        let mut tracker = PassTracker::new(10.0);
        let windows = run(&mut tracker, &[-1.0, 3.0, 9.9, 4.0, 0.0, 12.0, 11.0, -2.0]);

        // First pass peaks at 9.9°, second at 12°
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].rise_time, t(5));
        assert_eq!(windows[0].max_elevation_deg, 12.0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut tracker = PassTracker::new(10.0);
        let windows = run(&mut tracker, &[1.0, 10.0, -1.0]);
        assert_eq!(windows.len(), 1);
    }

    #[test]
    fn test_zero_elevation_closes_pass() {
        let mut tracker = PassTracker::new(0.0);
        let windows = run(&mut tracker, &[0.0, 5.0, 0.0, 0.0]);

        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].rise_time, t(1));
        assert_eq!(windows[0].set_time, t(2));
    }

    #[test]
    fn test_peak_tie_keeps_first_occurrence() {
        let mut tracker = PassTracker::new(10.0);
        let windows = run(&mut tracker, &[5.0, 30.0, 30.0, 29.0, 30.0, -1.0]);

        assert_eq!(windows[0].max_elevation_time, t(1));
    }

    #[test]
    fn test_open_pass_at_horizon_end_is_dropped() {
        let mut tracker = PassTracker::new(10.0);
        let windows = run(&mut tracker, &[-3.0, 15.0, 60.0, 40.0]);

        assert!(windows.is_empty());
        assert!(tracker.is_in_pass());
        match tracker.state() {
            PassState::InPass {
                rise_time,
                max_elevation_deg,
                max_elevation_time,
            } => {
                assert_eq!(rise_time, t(1));
                assert_eq!(max_elevation_deg, 60.0);
                assert_eq!(max_elevation_time, t(2));
            }
            PassState::BelowHorizon => panic!("expected an open pass"),
        }
    }

    #[test]
    fn test_rising_at_first_sample() {
        let mut tracker = PassTracker::new(10.0);
        let windows = run(&mut tracker, &[50.0, 20.0, -1.0]);

        assert_eq!(windows[0].rise_time, t(0));
        assert_eq!(windows[0].max_elevation_time, t(0));
    }

    #[test]
    fn test_failed_samples_leave_state_untouched() {
        let mut tracker = PassTracker::new(10.0);
        let samples = vec![
            (t(0), Some(-5.0)),
            (t(1), None),
            (t(2), Some(3.0)),
            (t(3), None),
            (t(4), None),
            (t(5), Some(35.0)),
            (t(6), None),
            (t(7), Some(-1.0)),
        ];

        let (windows, skipped) = collect_windows(&mut tracker, samples);
        assert_eq!(skipped, 4);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].rise_time, t(2));
        assert_eq!(windows[0].max_elevation_time, t(5));
        assert_eq!(windows[0].set_time, t(7));
        assert_eq!(tracker.state(), PassState::BelowHorizon);
    }

    #[test]
    fn test_failures_below_horizon_do_not_open_a_pass() {
        let mut tracker = PassTracker::new(0.0);
        let samples = vec![(t(0), Some(-10.0)), (t(1), None), (t(2), None), (t(3), Some(-4.0))];

        let (windows, skipped) = collect_windows(&mut tracker, samples);
        assert!(windows.is_empty());
        assert_eq!(skipped, 2);
        assert!(!tracker.is_in_pass());
    }

    #[test]
    fn test_invalid_config_is_rejected_before_scanning() {
        let sat = Satellite::new("JUNK", 1, "", "");
        let obs = Observer::new(0.0, 0.0).unwrap();
        let config = ScanConfig::passes().with_step_seconds(0);

        assert!(predict_passes(&sat, &obs, t(0), &config).is_err());
        assert!(predict_constellation_passes(&[sat], &obs, t(0), &config).is_err());
    }

    #[test]
    fn test_unparseable_satellite_yields_no_passes() {
        let sat = Satellite::new("JUNK", 1, "garbage", "garbage");
        let obs = Observer::new(0.0, 0.0).unwrap();
        let config = ScanConfig::passes().with_hours(1.0);

        assert!(predict_passes(&sat, &obs, t(0), &config).unwrap().is_empty());
    }

    proptest! {
        #[test]
        fn prop_windows_are_well_formed(
            elevations in prop::collection::vec(-90.0f64..90.0, 1..200),
            min_elevation in 0.0f64..45.0,
        ) {
            let mut tracker = PassTracker::new(min_elevation);
            let windows = run(&mut tracker, &elevations);

            for w in &windows {
                prop_assert!(w.rise_time <= w.max_elevation_time);
                prop_assert!(w.max_elevation_time < w.set_time);
                prop_assert!(w.max_elevation_deg >= min_elevation);
                prop_assert!(w.duration_seconds() > 0.0);
            }
            for pair in windows.windows(2) {
                prop_assert!(pair[0].set_time <= pair[1].rise_time);
            }
        }
    }
}
