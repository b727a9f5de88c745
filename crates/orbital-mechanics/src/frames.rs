//! Frame and geodesy transforms
//!
//! - Greenwich mean sidereal time (IAU 1982)
//! - TEME -> ECEF rotation about the polar axis
//! - ECEF <-> geodetic on a reference ellipsoid (Bowring, no iteration)
//!
//! Angles are degrees at the API boundary and radians internally.

use crate::constants::{Ellipsoid, WGS84};
use crate::time::JulianDate;
use crate::{EcefVector, GeodeticPosition, TemeVector};

/// Below this |cos(latitude)| the point is treated as polar and altitude is
/// measured along the axis instead of dividing by cos(latitude).
const POLAR_COS_EPSILON: f64 = 1e-10;

/// Greenwich mean sidereal time in degrees, normalized to [0, 360).
pub fn sidereal_angle_deg(jd_ut1: &JulianDate) -> f64 {
    let d = jd_ut1.days_since_j2000();
    let t = jd_ut1.centuries_since_j2000();

    let gmst = 280.46061837 + 360.98564736629 * d + 0.000387933 * t * t
        - t * t * t / 38_710_000.0;

    let normalized = gmst.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Rotate a TEME position into the Earth-fixed frame by -GMST.
pub fn teme_to_ecef(r: &TemeVector, jd_ut1: &JulianDate) -> EcefVector {
    let gmst = sidereal_angle_deg(jd_ut1).to_radians();
    let (sin_g, cos_g) = gmst.sin_cos();

    EcefVector::new(
        r.x * cos_g + r.y * sin_g,
        -r.x * sin_g + r.y * cos_g,
        r.z,
    )
}

/// Wrap a longitude in degrees into (-180, 180].
pub fn normalize_longitude(lon_deg: f64) -> f64 {
    let wrapped = (lon_deg + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

impl Ellipsoid {
    /// Earth-fixed vector to geodetic position using Bowring's closed form.
    pub fn to_geodetic(&self, r: &EcefVector) -> GeodeticPosition {
        let a = self.semi_major_axis_km;
        let b = self.semi_minor_axis_km();
        let e2 = self.eccentricity_squared();

        let lon = r.y.atan2(r.x);
        let p = r.x.hypot(r.y);

        // Parametric latitude stands in for the iteration
        let theta = (r.z * a).atan2(p * b);
        let (sin_t, cos_t) = theta.sin_cos();

        let lat = (r.z + self.second_eccentricity_squared() * b * sin_t.powi(3))
            .atan2(p - e2 * a * cos_t.powi(3));

        let cos_lat = lat.cos();
        let altitude_km = if cos_lat.abs() > POLAR_COS_EPSILON {
            p / cos_lat - self.prime_vertical_radius_km(lat)
        } else {
            r.z.abs() - b
        };

        // atan2 yields [-180, 180]; fold the closed end onto +180
        let lon = lon.to_degrees();
        GeodeticPosition {
            latitude: lat.to_degrees(),
            longitude: if lon <= -180.0 { lon + 360.0 } else { lon },
            altitude_km,
        }
    }

    /// Geodetic position to Earth-fixed vector.
    pub fn to_ecef(&self, pos: &GeodeticPosition) -> EcefVector {
        let lat = pos.latitude.to_radians();
        let lon = pos.longitude.to_radians();
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = lon.sin_cos();

        let n = self.prime_vertical_radius_km(lat);
        let alt = pos.altitude_km;

        EcefVector::new(
            (n + alt) * cos_lat * cos_lon,
            (n + alt) * cos_lat * sin_lon,
            (n * (1.0 - self.eccentricity_squared()) + alt) * sin_lat,
        )
    }
}

pub fn ecef_to_geodetic(r: &EcefVector) -> GeodeticPosition {
    WGS84.to_geodetic(r)
}

pub fn geodetic_to_ecef(pos: &GeodeticPosition) -> EcefVector {
    WGS84.to_ecef(pos)
}
