//! Julian dates for the sidereal-time and propagation models.

use chrono::{DateTime, Datelike, Timelike, Utc};

/// Julian date of the J2000.0 epoch (2000-01-01 12:00 TT).
pub const J2000_JD: f64 = 2_451_545.0;

/// Days per Julian century.
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

/// A Julian date split into the midnight-based day number and the fraction
/// of the day, keeping sub-second precision out of the large day value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JulianDate {
    pub day: f64,
    pub fraction: f64,
}

impl JulianDate {
    pub fn value(&self) -> f64 {
        self.day + self.fraction
    }

    /// Days from J2000.0. The day number is differenced first so the
    /// fraction keeps its precision.
    pub fn days_since_j2000(&self) -> f64 {
        (self.day - J2000_JD) + self.fraction
    }

    pub fn centuries_since_j2000(&self) -> f64 {
        self.days_since_j2000() / DAYS_PER_CENTURY
    }
}

impl From<f64> for JulianDate {
    /// Split a plain Julian date at the preceding midnight.
    fn from(jd: f64) -> Self {
        let day = (jd - 0.5).floor() + 0.5;
        Self {
            day,
            fraction: jd - day,
        }
    }
}

/// Julian date of a UTC instant, microsecond precision in the fraction.
///
/// Valid for the Gregorian years 1901-2099.
pub fn julian_date(time: DateTime<Utc>) -> JulianDate {
    let year = time.year() as f64;
    let month = time.month() as f64;
    let day = time.day() as f64;

    let jd = 367.0 * year - (7.0 * (year + ((month + 9.0) / 12.0).floor()) * 0.25).floor()
        + (275.0 * month / 9.0).floor()
        + day
        + 1_721_013.5;

    let micros = (time.nanosecond() / 1_000) as f64;
    let seconds = time.num_seconds_from_midnight() as f64 + micros * 1e-6;

    JulianDate {
        day: jd,
        fraction: seconds / 86_400.0,
    }
}
