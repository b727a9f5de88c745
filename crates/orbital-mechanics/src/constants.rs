//! Reference ellipsoid constants.

/// An oblate reference ellipsoid. Lengths in km.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    pub semi_major_axis_km: f64,
    pub flattening: f64,
}

/// World Geodetic System 1984.
pub const WGS84: Ellipsoid = Ellipsoid {
    semi_major_axis_km: 6378.137,
    flattening: 1.0 / 298.257223563,
};

impl Ellipsoid {
    pub fn semi_minor_axis_km(&self) -> f64 {
        self.semi_major_axis_km * (1.0 - self.flattening)
    }

    /// First eccentricity squared, (a² - b²) / a².
    pub fn eccentricity_squared(&self) -> f64 {
        self.flattening * (2.0 - self.flattening)
    }

    /// Second eccentricity squared, (a² - b²) / b².
    pub fn second_eccentricity_squared(&self) -> f64 {
        let e2 = self.eccentricity_squared();
        e2 / (1.0 - e2)
    }

    /// Radius of curvature in the prime vertical at geodetic latitude `lat_rad`.
    pub fn prime_vertical_radius_km(&self, lat_rad: f64) -> f64 {
        let sin_lat = lat_rad.sin();
        self.semi_major_axis_km / (1.0 - self.eccentricity_squared() * sin_lat * sin_lat).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wgs84_derived_axes() {
        assert!((WGS84.semi_minor_axis_km() - 6356.752314245).abs() < 1e-6);
        assert!((WGS84.eccentricity_squared() - 0.00669437999014).abs() < 1e-12);

        let a = WGS84.semi_major_axis_km;
        let b = WGS84.semi_minor_axis_km();
        assert!((WGS84.second_eccentricity_squared() - (a * a - b * b) / (b * b)).abs() < 1e-12);
    }

    #[test]
    fn test_prime_vertical_radius() {
        // Equals a at the equator and a²/b at the poles
        assert!((WGS84.prime_vertical_radius_km(0.0) - 6378.137).abs() < 1e-9);

        let a = WGS84.semi_major_axis_km;
        let b = WGS84.semi_minor_axis_km();
        let polar = WGS84.prime_vertical_radius_km(std::f64::consts::FRAC_PI_2);
        assert!((polar - a * a / b).abs() < 1e-6);
    }
}
