//! Physical constants shared across the solver boundary.
//!
//! Every crate in the workspace pulls these from here so the numbers
//! agree bit-for-bit between the flow kernel, the orbital model, and
//! the tests.

/// Stefan-Boltzmann constant (W/(m^2 K^4)).
pub const STEFAN_BOLTZMANN: f64 = 5.670_374_419e-8;

/// Solar constant at 1 AU (W/m^2).
pub const SOLAR_CONSTANT: f64 = 1361.0;

/// Mean Earth radius (km).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Geocentric gravitational parameter (m^3/s^2).
pub const EARTH_MU: f64 = 3.986_004_418e14;

/// Bond albedo of Earth.
pub const EARTH_ALBEDO: f64 = 0.3;

/// Mean Earth infrared emission (W/m^2).
pub const EARTH_IR: f64 = 237.0;

/// Fallback temperature for nodes without an explicit initial value (K).
pub const DEFAULT_INITIAL_TEMP: f64 = 293.15;
