//! Scan configuration
//!
//! A scan samples `[start, start + hours)` every `step_seconds`. The number
//! of samples is `floor(hours * 3600 / step_seconds)`; the horizon end
//! itself is never sampled.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{CoverageError, Result};

pub const DEFAULT_HOURS: f64 = 24.0;
pub const DEFAULT_PASS_STEP_SECONDS: u32 = 30;
pub const DEFAULT_TRACK_STEP_SECONDS: u32 = 60;
pub const DEFAULT_MIN_ELEVATION_DEG: f64 = 10.0;

/// Longest accepted horizon (ten years).
pub const MAX_HORIZON_HOURS: f64 = 87_600.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScanConfig {
    /// Scan horizon in hours
    pub hours: f64,
    /// Sampling interval in seconds
    pub step_seconds: u32,
    /// Peak elevation a pass must reach to be reported, degrees
    pub min_elevation_deg: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::passes()
    }
}

impl ScanConfig {
    /// 24 h at 30 s steps, 10° minimum elevation.
    pub fn passes() -> Self {
        Self {
            hours: DEFAULT_HOURS,
            step_seconds: DEFAULT_PASS_STEP_SECONDS,
            min_elevation_deg: DEFAULT_MIN_ELEVATION_DEG,
        }
    }

    /// 24 h at 60 s steps.
    pub fn ground_track() -> Self {
        Self {
            step_seconds: DEFAULT_TRACK_STEP_SECONDS,
            ..Self::passes()
        }
    }

    pub fn with_hours(mut self, hours: f64) -> Self {
        self.hours = hours;
        self
    }

    pub fn with_step_seconds(mut self, step_seconds: u32) -> Self {
        self.step_seconds = step_seconds;
        self
    }

    pub fn with_min_elevation(mut self, min_elevation_deg: f64) -> Self {
        self.min_elevation_deg = min_elevation_deg;
        self
    }

    /// Reject configurations that would scan nothing or never terminate.
    pub fn validate(&self) -> Result<()> {
        if self.step_seconds == 0 {
            return Err(CoverageError::InvalidStep);
        }
        if !self.hours.is_finite() || self.hours <= 0.0 || self.hours > MAX_HORIZON_HOURS {
            return Err(CoverageError::InvalidHorizon(self.hours));
        }
        if self.num_steps() == 0 {
            return Err(CoverageError::EmptyScan {
                hours: self.hours,
                step_seconds: self.step_seconds,
            });
        }
        if !(-90.0..=90.0).contains(&self.min_elevation_deg) {
            return Err(CoverageError::InvalidElevation(self.min_elevation_deg));
        }
        Ok(())
    }

    pub fn horizon_seconds(&self) -> f64 {
        self.hours * 3600.0
    }

    pub fn num_steps(&self) -> usize {
        (self.horizon_seconds() / self.step_seconds as f64) as usize
    }

    /// End of the scanned interval (exclusive).
    pub fn horizon_end(&self, start: DateTime<Utc>) -> DateTime<Utc> {
        start + Duration::microseconds((self.horizon_seconds() * 1e6).round() as i64)
    }

    /// Sample instants `start + i * step` for `i` in `0..num_steps()`.
    ///
    /// Call [`validate`](Self::validate) first.
    pub fn time_grid(&self, start: DateTime<Utc>) -> impl Iterator<Item = DateTime<Utc>> {
        let step = self.step_seconds as i64;
        (0..self.num_steps() as i64).map(move |i| start + Duration::seconds(i * step))
    }
}
