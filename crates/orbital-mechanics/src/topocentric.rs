//! Topocentric look angles
//!
//! Projects the observer-to-target vector onto the observer's local
//! South-East-Zenith basis.

use serde::{Deserialize, Serialize};

use crate::frames::geodetic_to_ecef;
use crate::{EcefVector, GeodeticPosition};

/// Ranges shorter than this are treated as coincident points.
const MIN_RANGE_KM: f64 = 1e-10;

/// Pointing from an observer to a target
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LookAngles {
    pub azimuth_deg: f64,   // 0-360° clockwise from North
    pub elevation_deg: f64, // -90..90° from the local horizon
    pub range_km: f64,
}

/// Look angles from a geodetic observer to an Earth-fixed target.
///
/// A target coincident with the observer is reported straight overhead.
pub fn look_angles(observer: &GeodeticPosition, target: &EcefVector) -> LookAngles {
    let d = target - geodetic_to_ecef(observer);

    let (sin_lat, cos_lat) = observer.latitude.to_radians().sin_cos();
    let (sin_lon, cos_lon) = observer.longitude.to_radians().sin_cos();

    let south = sin_lat * cos_lon * d.x + sin_lat * sin_lon * d.y - cos_lat * d.z;
    let east = -sin_lon * d.x + cos_lon * d.y;
    let zenith = cos_lat * cos_lon * d.x + cos_lat * sin_lon * d.y + sin_lat * d.z;

    let range_km = (south * south + east * east + zenith * zenith).sqrt();
    if range_km < MIN_RANGE_KM {
        return LookAngles {
            azimuth_deg: 0.0,
            elevation_deg: 90.0,
            range_km,
        };
    }

    // asin(zenith / range), in the form that stays accurate near the zenith
    let elevation_deg = zenith.atan2(south.hypot(east)).to_degrees();
    let azimuth_deg = east.atan2(-south).to_degrees().rem_euclid(360.0);

    LookAngles {
        azimuth_deg,
        elevation_deg,
        range_km,
    }
}

/// Elevation of an Earth-fixed target above the observer's horizon, degrees.
/// Zero or below means the target is not visible.
pub fn elevation_angle(observer: &GeodeticPosition, target: &EcefVector) -> f64 {
    look_angles(observer, target).elevation_deg
}
