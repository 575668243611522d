//! ts-orbit: orbital thermal environment for thermsat.
//!
//! Turns an orbit description (altitude or apsides, inclination, RAAN,
//! epoch) into the quantities the heat-load kernel consumes:
//! - sun position at the epoch (declination, right ascension, distance)
//! - derived environment (period, beta angle, eclipse fraction, Earth
//!   view factor, solar/albedo/IR fluxes)
//! - a time-periodic flux profile sampled once per orbit position

pub mod config;
pub mod environment;
pub mod error;
pub mod profile;
pub mod sun;

// Re-exports for ergonomics
pub use config::{AttitudeMode, OrbitalSpec};
pub use environment::OrbitalEnvironment;
pub use error::OrbitError;
pub use profile::{FluxSample, OrbitalProfile, DEFAULT_PROFILE_SAMPLES};
pub use sun::{sun_position, SunPosition};
