//! Ground footprint geometry

use crate::constants::WGS84;

/// Ground radius (km, along the surface) of the area that sees a satellite
/// at `altitude_km` above `min_elevation_deg`.
///
/// Central angle from the Earth-center / satellite / edge-point triangle:
///
/// ```text
/// λ = acos(R·cos(θ) / (R + h)) − θ
/// ```
///
/// Returns 0 when no point on the ground can see the satellite that high.
/// The result is clamped at 0: below the ellipsoid a steep minimum elevation
/// would otherwise give a negative radius.
pub fn footprint_radius_km(altitude_km: f64, min_elevation_deg: f64) -> f64 {
    let r = WGS84.semi_major_axis_km;
    let theta = min_elevation_deg.to_radians();

    let cos_val = r * theta.cos() / (r + altitude_km);
    if cos_val >= 1.0 {
        return 0.0;
    }

    (r * (cos_val.acos() - theta)).max(0.0)
}
