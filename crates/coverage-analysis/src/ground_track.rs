//! Ground tracks
//!
//! Pure sampling of the subsatellite point. Every successful step is kept
//! and failed steps leave gaps; nothing is filtered by elevation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use orbital_mechanics::position::rounded_geodetic;
use orbital_mechanics::{ecef_to_geodetic, GeodeticPosition, Propagator, Satellite};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ScanConfig;
use crate::Result;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GroundTrackPoint {
    #[serde(flatten)]
    pub position: GeodeticPosition,
    pub timestamp: DateTime<Utc>,
}

fn sample_track(
    satellite: &Satellite,
    start: DateTime<Utc>,
    config: &ScanConfig,
) -> Vec<GroundTrackPoint> {
    let propagator = match Propagator::new(satellite) {
        Ok(p) => p,
        Err(e) => {
            warn!(satellite = %satellite.name, "no ground track: {}", e);
            return Vec::new();
        }
    };

    let points: Vec<GroundTrackPoint> = config
        .time_grid(start)
        .filter_map(|t| {
            let state = propagator.propagate(t).ok()?;
            Some(GroundTrackPoint {
                position: rounded_geodetic(&ecef_to_geodetic(&state.position)),
                timestamp: t,
            })
        })
        .collect();

    if points.len() < config.num_steps() {
        debug!(
            satellite = %satellite.name,
            "ground track has {} of {} samples",
            points.len(),
            config.num_steps()
        );
    }

    points
}

/// Chronological ground track of one satellite.
pub fn ground_track(
    satellite: &Satellite,
    start: DateTime<Utc>,
    config: &ScanConfig,
) -> Result<Vec<GroundTrackPoint>> {
    config.validate()?;
    Ok(sample_track(satellite, start, config))
}

/// Ground tracks of a constellation keyed by satellite name. A later
/// satellite with a duplicate name replaces the earlier one.
pub fn ground_tracks(
    satellites: &[Satellite],
    start: DateTime<Utc>,
    config: &ScanConfig,
) -> Result<BTreeMap<String, Vec<GroundTrackPoint>>> {
    config.validate()?;

    let sampled: Vec<(String, Vec<GroundTrackPoint>)> = satellites
        .par_iter()
        .map(|sat| (sat.name.clone(), sample_track(sat, start, config)))
        .collect();

    let total: usize = sampled.iter().map(|(_, points)| points.len()).sum();
    info!(
        "sampled {} ground track points for {} satellites over {} h",
        total,
        satellites.len(),
        config.hours
    );

    Ok(sampled.into_iter().collect())
}

/// Split a track wherever consecutive longitudes jump by more than 180°,
/// i.e. where it crosses the antimeridian, so each piece draws as a line.
pub fn track_segments(points: &[GroundTrackPoint]) -> Vec<&[GroundTrackPoint]> {
    let mut segments = Vec::new();
    let mut begin = 0;

    for i in 1..points.len() {
        let jump = (points[i].position.longitude - points[i - 1].position.longitude).abs();
        if jump > 180.0 {
            segments.push(&points[begin..i]);
            begin = i;
        }
    }
    if begin < points.len() {
        segments.push(&points[begin..]);
    }

    segments
}
