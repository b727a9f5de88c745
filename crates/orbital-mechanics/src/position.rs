//! Point-in-time position fixes
//!
//! Fixes are rounded (lat/lon 4 dp, altitude 1 dp, speed 2 dp) so repeated
//! queries at nearly the same instant do not flicker in the last digit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::footprint::footprint_radius_km;
use crate::frames::ecef_to_geodetic;
use crate::{GeodeticPosition, Satellite};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SatPosition {
    pub name: String,
    pub norad_id: u32,
    #[serde(flatten)]
    pub position: GeodeticPosition,
    pub velocity_km_s: f64,
    pub timestamp: DateTime<Utc>,
}

impl SatPosition {
    /// Ground footprint radius for this fix at the given minimum elevation.
    pub fn footprint_radius_km(&self, min_elevation_deg: f64) -> f64 {
        footprint_radius_km(self.position.altitude_km, min_elevation_deg)
    }
}

/// Round `value` to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Geodetic position rounded for display: lat/lon 4 dp, altitude 1 dp.
pub fn rounded_geodetic(pos: &GeodeticPosition) -> GeodeticPosition {
    GeodeticPosition {
        latitude: round_to(pos.latitude, 4),
        longitude: round_to(pos.longitude, 4),
        altitude_km: round_to(pos.altitude_km, 1),
    }
}

/// Position fix at `time`, or `None` when the model has no solution there.
pub fn position_at(satellite: &Satellite, time: DateTime<Utc>) -> Option<SatPosition> {
    let state = match satellite.propagate(time) {
        Ok(state) => state,
        Err(e) => {
            debug!(
                satellite = %satellite.name,
                norad_id = satellite.norad_id,
                "no position at {}: {}",
                time,
                e
            );
            return None;
        }
    };

    let geodetic = ecef_to_geodetic(&state.position);

    Some(SatPosition {
        name: satellite.name.clone(),
        norad_id: satellite.norad_id,
        position: rounded_geodetic(&geodetic),
        velocity_km_s: round_to(state.speed_km_s, 2),
        timestamp: time,
    })
}

/// Position fix at the current wall-clock instant.
pub fn current_position(satellite: &Satellite) -> Option<SatPosition> {
    position_at(satellite, Utc::now())
}
