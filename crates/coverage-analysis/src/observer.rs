//! Ground observers and named city presets

use orbital_mechanics::frames::normalize_longitude;
use orbital_mechanics::{elevation_angle, EcefVector, GeodeticPosition};
use serde::{Deserialize, Serialize};

use crate::{CoverageError, Result};

/// Named observer locations: (name, latitude°, longitude°)
pub const CITIES: [(&str, f64, f64); 6] = [
    ("tel aviv", 32.0853, 34.7818),
    ("seattle", 47.6062, -122.3321),
    ("new york", 40.7128, -74.0060),
    ("london", 51.5074, -0.1278),
    ("tokyo", 35.6762, 139.6503),
    ("san francisco", 37.7749, -122.4194),
];

/// A fixed point on the ground, altitude in km above the WGS84 ellipsoid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Observer {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    #[serde(default)]
    pub altitude_km: f64,
}

impl Observer {
    /// Sea-level observer. Longitude is wrapped into (-180, 180].
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Result<Self> {
        if !latitude_deg.is_finite() || !(-90.0..=90.0).contains(&latitude_deg) {
            return Err(CoverageError::InvalidObserver(format!(
                "latitude {} outside [-90, 90]",
                latitude_deg
            )));
        }
        if !longitude_deg.is_finite() {
            return Err(CoverageError::InvalidObserver(format!(
                "longitude {} is not finite",
                longitude_deg
            )));
        }

        Ok(Self {
            latitude_deg,
            longitude_deg: normalize_longitude(longitude_deg),
            altitude_km: 0.0,
        })
    }

    pub fn with_altitude(mut self, altitude_km: f64) -> Result<Self> {
        if !altitude_km.is_finite() {
            return Err(CoverageError::InvalidObserver(format!(
                "altitude {} km is not finite",
                altitude_km
            )));
        }
        self.altitude_km = altitude_km;
        Ok(self)
    }

    /// Look up a preset by name, ignoring case and surrounding whitespace.
    pub fn city(name: &str) -> Result<Self> {
        let wanted = name.trim().to_lowercase();
        CITIES
            .iter()
            .find(|(city, _, _)| *city == wanted)
            .map(|&(_, lat, lon)| Self {
                latitude_deg: lat,
                longitude_deg: lon,
                altitude_km: 0.0,
            })
            .ok_or_else(|| CoverageError::UnknownCity(name.to_string()))
    }

    pub fn geodetic(&self) -> GeodeticPosition {
        GeodeticPosition::new(self.latitude_deg, self.longitude_deg, self.altitude_km)
    }

    /// Elevation of an Earth-fixed target above this observer's horizon, degrees.
    pub fn elevation_of(&self, target: &EcefVector) -> f64 {
        elevation_angle(&self.geodetic(), target)
    }
}
