//! Low-precision solar ephemeris.
//!
//! Mean-anomaly plus equation-of-centre model, accurate to a fraction
//! of a degree, which is ample for beta-angle and flux work.

use std::f64::consts::{PI, TAU};

use chrono::{DateTime, Datelike, Timelike, Utc};

/// Apparent sun position at an epoch, in the equatorial frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunPosition {
    /// Solar declination (rad).
    pub declination: f64,
    /// Solar right ascension (rad).
    pub right_ascension: f64,
    /// Earth-Sun distance (AU).
    pub distance_au: f64,
}

/// Obliquity of the ecliptic (deg).
const OBLIQUITY_DEG: f64 = 23.4393;

/// Ecliptic longitude of perihelion offset (deg).
const PERIHELION_LON_DEG: f64 = 102.9;

/// Compute the sun position for a UTC epoch.
pub fn sun_position(epoch: DateTime<Utc>) -> SunPosition {
    let day_of_year = epoch.ordinal() as f64 + epoch.num_seconds_from_midnight() as f64 / 86_400.0;

    let mean_anomaly = TAU * (day_of_year - 2.0) / 365.25;
    let centre = 0.0334 * mean_anomaly.sin() + 0.000_349 * (2.0 * mean_anomaly).sin();
    let ecliptic_lon = mean_anomaly + centre + PI + TAU * PERIHELION_LON_DEG / 360.0;

    let obliquity = OBLIQUITY_DEG.to_radians();
    let declination = (obliquity.sin() * ecliptic_lon.sin()).asin();
    let right_ascension = (obliquity.cos() * ecliptic_lon.sin()).atan2(ecliptic_lon.cos());
    let distance_au = 1.0 - 0.0167 * mean_anomaly.cos();

    SunPosition {
        declination,
        right_ascension,
        distance_au,
    }
}
