//! Orbit-specific error types.

use thiserror::Error;

/// Errors raised while validating an orbit description.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrbitError {
    #[error("orbit altitude must be positive, got {altitude_km} km")]
    NonPositiveAltitude { altitude_km: f64 },

    #[error("perigee {perigee_km} km must lie below apogee {apogee_km} km")]
    ApsidesOutOfOrder { perigee_km: f64, apogee_km: f64 },

    #[error("orbit needs an altitude or an apogee/perigee pair")]
    MissingAltitude,
}
