//! SGP4 propagation adapter
//!
//! Turns a `(Satellite, instant)` pair into an Earth-fixed position and a
//! scalar speed. Model errors (decayed orbits, bad elements) come back as
//! [`OrbitalError`] values; callers treat them as "no sample at this
//! instant". There is no retry: the same satellite and instant fail the
//! same way every time.

use chrono::{DateTime, Utc};

use crate::frames::teme_to_ecef;
use crate::time::julian_date;
use crate::{EcefVector, OrbitalError, Result, Satellite, TemeVector};

/// Propagated state rotated into the Earth-fixed frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarthFixedState {
    pub position: EcefVector,
    /// Magnitude of the inertial velocity, km/s
    pub speed_km_s: f64,
    pub time: DateTime<Utc>,
}

/// An SGP4 model built once from a satellite's element set and reused for
/// every instant of a scan.
pub struct Propagator {
    constants: sgp4::Constants,
    epoch: DateTime<Utc>,
}

impl Propagator {
    pub fn new(satellite: &Satellite) -> Result<Self> {
        let elements = sgp4::Elements::from_tle(
            Some(satellite.name.clone()),
            satellite.tle_line1.as_bytes(),
            satellite.tle_line2.as_bytes(),
        )
        .map_err(|e| OrbitalError::InvalidTle(format!("{:?}", e)))?;

        let constants = sgp4::Constants::from_elements(&elements)
            .map_err(|e| OrbitalError::PropagationFailed(format!("{:?}", e)))?;

        let epoch = DateTime::<Utc>::from_naive_utc_and_offset(elements.datetime, Utc);

        Ok(Self { constants, epoch })
    }

    /// Element set epoch.
    pub fn epoch(&self) -> DateTime<Utc> {
        self.epoch
    }

    pub fn propagate(&self, time: DateTime<Utc>) -> Result<EarthFixedState> {
        let prediction = self
            .constants
            .propagate(self.minutes_since_epoch(time))
            .map_err(|e| OrbitalError::PropagationFailed(format!("{:?}", e)))?;

        let position = TemeVector::from(prediction.position);
        let velocity = TemeVector::from(prediction.velocity);

        Ok(EarthFixedState {
            position: teme_to_ecef(&position, &julian_date(time)),
            speed_km_s: velocity.norm(),
            time,
        })
    }

    fn minutes_since_epoch(&self, time: DateTime<Utc>) -> f64 {
        let elapsed = time.signed_duration_since(self.epoch);
        match elapsed.num_microseconds() {
            Some(us) => us as f64 / 60_000_000.0,
            None => elapsed.num_milliseconds() as f64 / 60_000.0,
        }
    }
}

/// One-shot propagation: builds the model from the element lines and
/// evaluates it at `time`.
pub fn propagate(satellite: &Satellite, time: DateTime<Utc>) -> Result<EarthFixedState> {
    Propagator::new(satellite)?.propagate(time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_elements_are_reported() {
        let sat = Satellite::new("JUNK", 1, "not a tle", "still not a tle");

        match propagate(&sat, Utc::now()) {
            Err(OrbitalError::InvalidTle(_)) => {}
            other => panic!("expected InvalidTle, got {:?}", other),
        }
    }
}
