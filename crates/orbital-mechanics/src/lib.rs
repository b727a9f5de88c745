//! Orbital Mechanics Library
//!
//! SGP4 propagation, WGS84 geodesy, and topocentric look angles for
//! tracking satellites from two-line element sets.
//!
//! Data flows one way:
//!
//! ```text
//! Satellite + instant -> SGP4 (TEME) -> GMST rotation (ECEF) -> WGS84 geodetic
//! ```
//!
//! Everything here is a pure function of its inputs. Propagation failures
//! are returned as values so scanning code can skip the sample and move on.

use chrono::{DateTime, Utc};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod constants;
pub mod footprint;
pub mod frames;
pub mod position;
pub mod propagation;
pub mod time;
pub mod topocentric;

pub use constants::{Ellipsoid, WGS84};
pub use footprint::footprint_radius_km;
pub use frames::{ecef_to_geodetic, geodetic_to_ecef, sidereal_angle_deg, teme_to_ecef};
pub use position::{current_position, position_at, SatPosition};
pub use propagation::{propagate, EarthFixedState, Propagator};
pub use time::{julian_date, JulianDate};
pub use topocentric::{elevation_angle, look_angles, LookAngles};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrbitalError {
    #[error("Invalid TLE format: {0}")]
    InvalidTle(String),
    #[error("Propagation failed: {0}")]
    PropagationFailed(String),
}

pub type Result<T> = std::result::Result<T, OrbitalError>;

/// Cartesian vector in an Earth-fixed (rotating) frame, km.
pub type EcefVector = Vector3<f64>;

/// Cartesian vector in the True Equator Mean Equinox frame SGP4 reports in, km.
pub type TemeVector = Vector3<f64>;

/// A tracked object: catalog identity plus its two-line element set.
///
/// The element lines are handed to the propagation model untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Satellite {
    pub name: String,
    pub norad_id: u32,
    pub tle_line1: String,
    pub tle_line2: String,
}

/// Latitude/longitude in degrees and height above the WGS84 ellipsoid in km.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeodeticPosition {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_km: f64,
}

impl Satellite {
    pub fn new(
        name: impl Into<String>,
        norad_id: u32,
        tle_line1: impl Into<String>,
        tle_line2: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            norad_id,
            tle_line1: tle_line1.into(),
            tle_line2: tle_line2.into(),
        }
    }

    pub fn propagate(&self, time: DateTime<Utc>) -> Result<EarthFixedState> {
        propagation::propagate(self, time)
    }

    pub fn position_at(&self, time: DateTime<Utc>) -> Option<SatPosition> {
        position::position_at(self, time)
    }
}

impl GeodeticPosition {
    pub fn new(latitude: f64, longitude: f64, altitude_km: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude_km,
        }
    }

    pub fn to_ecef(&self) -> EcefVector {
        frames::geodetic_to_ecef(self)
    }
}
