//! Coverage Analysis Library
//!
//! Fixed-step scans of satellite visibility over ground observers:
//! - Pass prediction for one satellite or a whole constellation
//! - Ground tracks (sampled subsatellite paths)
//! - Per-observer coverage reports (coverage %, gaps, pass durations)
//!
//! Each satellite is scanned independently and in parallel; results are
//! re-sorted by time afterwards, never taken in completion order.

use thiserror::Error;

pub mod config;
pub mod ground_track;
pub mod observer;
pub mod pass;
pub mod report;

pub use config::ScanConfig;
pub use ground_track::{ground_track, ground_tracks, track_segments, GroundTrackPoint};
pub use observer::{Observer, CITIES};
pub use pass::{
    predict_constellation_passes, predict_passes, PassPrediction, PassState, PassTracker,
    VisibilityWindow,
};
pub use report::{city_coverage, coverage_gaps_seconds, CityCoverageReport, CoverageWindow};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoverageError {
    #[error("Scan step must be at least one second")]
    InvalidStep,
    #[error("Scan horizon must be positive and finite, up to {max} hours: got {0}", max = config::MAX_HORIZON_HOURS)]
    InvalidHorizon(f64),
    #[error("Scan horizon of {hours} h is shorter than one {step_seconds} s step")]
    EmptyScan { hours: f64, step_seconds: u32 },
    #[error("Minimum elevation must be within [-90, 90] degrees: got {0}")]
    InvalidElevation(f64),
    #[error("Invalid observer: {0}")]
    InvalidObserver(String),
    #[error("Unknown city: {0}")]
    UnknownCity(String),
}

pub type Result<T> = std::result::Result<T, CoverageError>;
