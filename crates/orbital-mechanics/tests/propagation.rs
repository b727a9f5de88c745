//! End-to-end propagation checks against real and synthetic element sets.

use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc};
use orbital_mechanics::{
    ecef_to_geodetic, elevation_angle, julian_date, look_angles, position_at, propagate,
    sidereal_angle_deg, GeodeticPosition, OrbitalError, Propagator, Satellite,
};

fn iss() -> Satellite {
    Satellite::new(
        "ISS (ZARYA)",
        25544,
        "1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992",
        "2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008",
    )
}

/// Near-circular 500 km orbit, 51.6° inclination, ascending node at epoch.
fn circular_500km() -> Satellite {
    Satellite::new(
        "SYNTH-500",
        90001,
        "1 90001U 24001A   24001.00000000  .00000000  00000-0  00000-0 0  9994",
        "2 90001  51.6000   0.0000 0000001   0.0000   0.0000 15.21937835000010",
    )
}

fn synthetic_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

#[test]
fn test_iss_epoch_is_parsed() {
    let propagator = Propagator::new(&iss()).unwrap();
    let epoch = propagator.epoch();

    assert_eq!((epoch.year(), epoch.month(), epoch.day()), (2020, 7, 12));
    assert_eq!((epoch.hour(), epoch.minute()), (21, 16));
}

#[test]
fn test_iss_state_is_plausible() {
    let sat = iss();
    let epoch = Propagator::new(&sat).unwrap().epoch();

    for minutes in [0, 15, 45, 90, 360] {
        let state = propagate(&sat, epoch + Duration::minutes(minutes)).unwrap();
        let geo = ecef_to_geodetic(&state.position);

        assert!(geo.altitude_km > 380.0 && geo.altitude_km < 450.0, "alt {}", geo.altitude_km);
        assert!(geo.latitude.abs() <= 52.0, "lat {}", geo.latitude);
        assert!(state.speed_km_s > 7.5 && state.speed_km_s < 7.8, "speed {}", state.speed_km_s);
    }
}

#[test]
fn test_synthetic_circular_orbit_at_epoch() {
    let state = propagate(&circular_500km(), synthetic_epoch()).unwrap();
    let geo = ecef_to_geodetic(&state.position);

    assert!(geo.altitude_km > 470.0 && geo.altitude_km < 530.0, "alt {}", geo.altitude_km);
    assert!(geo.latitude.abs() < 1.0, "lat {}", geo.latitude);
    assert!(state.speed_km_s > 7.4 && state.speed_km_s < 7.8, "speed {}", state.speed_km_s);

    // Node on the inertial x axis shows up at longitude -GMST
    let gmst = sidereal_angle_deg(&julian_date(synthetic_epoch()));
    assert!((geo.longitude + gmst).abs() < 1.0, "lon {} gmst {}", geo.longitude, gmst);
}

#[test]
fn test_observer_at_subsatellite_point_sees_zenith() {
    let state = propagate(&circular_500km(), synthetic_epoch()).unwrap();
    let sub = ecef_to_geodetic(&state.position);
    let observer = GeodeticPosition::new(sub.latitude, sub.longitude, 0.0);

    assert!((elevation_angle(&observer, &state.position) - 90.0).abs() < 1e-4);

    let angles = look_angles(&observer, &state.position);
    assert!((angles.range_km - sub.altitude_km).abs() < 1e-3);
}

#[test]
fn test_position_fix_is_rounded_and_idempotent() {
    let sat = circular_500km();
    let t = synthetic_epoch() + Duration::milliseconds(1_234_567);

    let first = position_at(&sat, t).unwrap();
    let second = position_at(&sat, t).unwrap();
    assert_eq!(first, second);

    assert_eq!(first.name, "SYNTH-500");
    assert_eq!(first.norad_id, 90001);
    assert_eq!(first.timestamp, t);

    let p = first.position;
    assert_eq!(p.latitude, (p.latitude * 1e4).round() / 1e4);
    assert_eq!(p.longitude, (p.longitude * 1e4).round() / 1e4);
    assert_eq!(p.altitude_km, (p.altitude_km * 10.0).round() / 10.0);
    assert_eq!(first.velocity_km_s, (first.velocity_km_s * 100.0).round() / 100.0);

    assert!(first.footprint_radius_km(10.0) > 1_000.0);
}

#[test]
fn test_truncated_line_is_a_failure_value() {
    let mut sat = iss();
    sat.tle_line2.truncate(40);

    assert!(matches!(
        propagate(&sat, Utc::now()),
        Err(OrbitalError::InvalidTle(_)) | Err(OrbitalError::PropagationFailed(_))
    ));
    assert!(position_at(&sat, Utc::now()).is_none());
}
