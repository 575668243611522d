//! Orbit description as it crosses the library boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::OrbitError;

/// Attitude mode hint carried with the orbit description.
///
/// The reference flux profile is attitude-independent; the mode is
/// preserved through the schema for callers that post-process results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttitudeMode {
    NadirPointing,
    SunPointing,
}

/// Orbit description supplied by the caller.
///
/// Circular orbits give `altitude_km`; highly elliptical orbits give
/// the `apogee_km`/`perigee_km` pair instead and are treated at their
/// mean altitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitalSpec {
    #[serde(default)]
    pub altitude_km: Option<f64>,
    #[serde(default)]
    pub apogee_km: Option<f64>,
    #[serde(default)]
    pub perigee_km: Option<f64>,
    pub inclination_deg: f64,
    pub raan_deg: f64,
    pub epoch: DateTime<Utc>,
    #[serde(default)]
    pub attitude: Option<AttitudeMode>,
}

impl OrbitalSpec {
    /// Altitude used for period and shadow geometry (km).
    ///
    /// Apside pairs collapse to their mean so period and eclipse stay
    /// mutually consistent.
    pub fn effective_altitude_km(&self) -> Result<f64, OrbitError> {
        if let Some(h) = self.altitude_km {
            if h <= 0.0 {
                return Err(OrbitError::NonPositiveAltitude { altitude_km: h });
            }
            return Ok(h);
        }
        match (self.apogee_km, self.perigee_km) {
            (Some(apogee_km), Some(perigee_km)) => {
                if perigee_km >= apogee_km {
                    return Err(OrbitError::ApsidesOutOfOrder {
                        perigee_km,
                        apogee_km,
                    });
                }
                let mean = 0.5 * (apogee_km + perigee_km);
                if mean <= 0.0 {
                    return Err(OrbitError::NonPositiveAltitude { altitude_km: mean });
                }
                Ok(mean)
            }
            _ => Err(OrbitError::MissingAltitude),
        }
    }
}
