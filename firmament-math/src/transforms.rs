//! Time dependent reference frame transforms

use std::f64::consts::PI;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{Mat3, Rad};

const TWO_PI: f64 = 2.0 * PI;
const SECONDS_PER_DAY: f64 = 86400.0;
const DAYS_PER_JULIAN_CENTURY: f64 = 36525.0;
const J2000_DAY_NUMBER: f64 = 2451545.0;
const UNIX_EPOCH_JULIAN_DATE: f64 = 2440587.5;

const GMST_CONSTANT_0: f64 = 24110.54841;
const GMST_CONSTANT_1: f64 = 8640184.812866;
const GMST_CONSTANT_2: f64 = 0.093104;
const GMST_CONSTANT_3: f64 = -6.2e-6;
const EARTH_ROTATION_RATE: f64 = 7.2921158553e-5;
const EARTH_ROTATION_RATE_DRIFT: f64 = 1.1772758384668e-19;

/// Converts a timestamp into the rotation of a fixed reference frame
pub trait TimeTransform {
    /// Returns rotation from the reference frame to the current world orientation
    fn rotation(&self, time: SystemTime) -> Mat3;
}

/// True Equator Mean Equinox to pseudo-fixed frame rotation
///
/// Rotates around the Z axis by the Greenwich hour angle, so a sky attached to the inertial
/// frame turns once per sidereal day.
#[derive(Debug, Default, Copy, Clone)]
pub struct TemeToPseudoFixed;

impl TimeTransform for TemeToPseudoFixed {
    fn rotation(&self, time: SystemTime) -> Mat3 {
        teme_to_pseudo_fixed(time)
    }
}

/// Computes the TEME to pseudo-fixed rotation matrix for a UTC timestamp
pub fn teme_to_pseudo_fixed(time: SystemTime) -> Mat3 {
    Mat3::from_angle_z(Rad(-greenwich_hour_angle(time) as f32))
}

/// Greenwich hour angle in radians
pub fn greenwich_hour_angle(time: SystemTime) -> f64 {
    let (day_number, seconds_of_day) = julian_date(time);
    let diff_days = day_number - J2000_DAY_NUMBER;

    // centuries counted from the UTC midnight preceding the timestamp
    let t = if seconds_of_day >= SECONDS_PER_DAY * 0.5 {
        (diff_days + 0.5) / DAYS_PER_JULIAN_CENTURY
    } else {
        (diff_days - 0.5) / DAYS_PER_JULIAN_CENTURY
    };

    let gmst0 = GMST_CONSTANT_0
        + t * (GMST_CONSTANT_1 + t * (GMST_CONSTANT_2 + t * GMST_CONSTANT_3));
    let angle = (gmst0 * TWO_PI / SECONDS_PER_DAY) % TWO_PI;
    let ratio =
        EARTH_ROTATION_RATE + EARTH_ROTATION_RATE_DRIFT * (day_number - (J2000_DAY_NUMBER + 0.5));
    let seconds_since_midnight = (seconds_of_day + SECONDS_PER_DAY * 0.5) % SECONDS_PER_DAY;

    angle + ratio * seconds_since_midnight
}

/// Splits a timestamp into Julian day number (days start at noon) and seconds of that day
pub fn julian_date(time: SystemTime) -> (f64, f64) {
    let unix_seconds = match time.duration_since(UNIX_EPOCH) {
        Ok(since) => since.as_secs_f64(),
        Err(err) => -err.duration().as_secs_f64(),
    };
    let julian = UNIX_EPOCH_JULIAN_DATE + unix_seconds / SECONDS_PER_DAY;
    let day_number = julian.floor();
    let seconds_of_day = (julian - day_number) * SECONDS_PER_DAY;
    (day_number, seconds_of_day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SquareMatrix, Vec3};
    use std::time::Duration;

    fn angle_of(m: &Mat3) -> f32 {
        m.y.x.atan2(m.x.x)
    }

    #[test]
    fn unix_epoch_is_julian_noon_offset() {
        let (day, seconds) = julian_date(UNIX_EPOCH);
        assert_eq!(day, 2440587.0);
        assert!((seconds - 43200.0).abs() < 1e-3);
    }

    #[test]
    fn rotation_keeps_polar_axis() {
        let time = UNIX_EPOCH + Duration::from_secs(1_000_000_000);
        let m = teme_to_pseudo_fixed(time);
        let z = m * Vec3::unit_z();
        assert!((z - Vec3::unit_z()).x.abs() < 1e-6);
        assert!((z - Vec3::unit_z()).y.abs() < 1e-6);
        assert!((m.determinant() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn one_hour_turns_about_fifteen_degrees() {
        let start = UNIX_EPOCH + Duration::from_secs(1_000_000_000);
        let later = start + Duration::from_secs(3600);
        let a = angle_of(&teme_to_pseudo_fixed(start));
        let b = angle_of(&teme_to_pseudo_fixed(later));
        let mut delta = (b - a) as f64;
        if delta < 0.0 {
            delta += TWO_PI;
        }
        assert!((delta - EARTH_ROTATION_RATE * 3600.0).abs() < 1e-3);
    }
}
