//! Derived orbital environment.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use ts_core::constants::{EARTH_ALBEDO, EARTH_IR, EARTH_MU, EARTH_RADIUS_KM, SOLAR_CONSTANT};

use crate::config::OrbitalSpec;
use crate::error::OrbitError;
use crate::sun::sun_position;

/// Environment quantities derived once per orbit description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitalEnvironment {
    /// Orbital period (s).
    pub period_s: f64,
    /// Beta angle between the orbit plane and the sun vector (deg).
    pub beta_angle_deg: f64,
    /// Fraction of the orbit spent in Earth's shadow, in [0, 0.5].
    pub eclipse_fraction: f64,
    /// Complement of the eclipse fraction.
    pub sunlit_fraction: f64,
    /// Direct solar flux at the epoch's Earth-Sun distance (W/m^2).
    pub solar_flux: f64,
    /// Peak reflected (albedo) flux at the subsolar point (W/m^2).
    pub albedo_flux_peak: f64,
    /// Earth infrared flux scaled by the view factor (W/m^2).
    pub earth_ir_flux: f64,
    /// View factor from the spacecraft to the Earth disc, in [0, 1].
    pub earth_view_factor: f64,
}

impl OrbitalEnvironment {
    /// Derive the environment for an orbit description.
    pub fn from_spec(spec: &OrbitalSpec) -> Result<Self, OrbitError> {
        let altitude_km = spec.effective_altitude_km()?;
        let sun = sun_position(spec.epoch);

        let semi_major_m = (EARTH_RADIUS_KM + altitude_km) * 1e3;
        let period_s = TAU * (semi_major_m.powi(3) / EARTH_MU).sqrt();

        let inclination = spec.inclination_deg.to_radians();
        let raan = spec.raan_deg.to_radians();
        let beta = (sun.declination.cos() * inclination.sin() * (raan - sun.right_ascension).sin()
            + sun.declination.sin() * inclination.cos())
        .asin();

        let sin_rho = EARTH_RADIUS_KM / (EARTH_RADIUS_KM + altitude_km);
        let earth_view_factor = sin_rho * sin_rho;
        let eclipse_fraction = eclipse_fraction(altitude_km, beta);

        let solar_flux = SOLAR_CONSTANT / (sun.distance_au * sun.distance_au);

        Ok(Self {
            period_s,
            beta_angle_deg: beta.to_degrees(),
            eclipse_fraction,
            sunlit_fraction: 1.0 - eclipse_fraction,
            solar_flux,
            albedo_flux_peak: EARTH_ALBEDO * solar_flux * earth_view_factor,
            earth_ir_flux: EARTH_IR * earth_view_factor,
            earth_view_factor,
        })
    }
}

/// Cylindrical-shadow eclipse fraction for a circular orbit.
///
/// High-beta orbits never enter the shadow; the fraction is clamped to
/// [0, 0.5] (a circular orbit cannot shadow more than half a
/// revolution).
fn eclipse_fraction(altitude_km: f64, beta: f64) -> f64 {
    let rho = (EARTH_RADIUS_KM / (EARTH_RADIUS_KM + altitude_km)).asin();
    if beta.abs() >= FRAC_PI_2 - rho {
        return 0.0;
    }
    let horizon =
        (altitude_km * altitude_km + 2.0 * EARTH_RADIUS_KM * altitude_km).sqrt();
    let c = horizon / ((EARTH_RADIUS_KM + altitude_km) * beta.abs().cos());
    if c >= 1.0 {
        return 0.0;
    }
    (c.acos() / PI).clamp(0.0, 0.5)
}
