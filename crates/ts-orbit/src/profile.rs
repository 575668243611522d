//! Time-periodic flux profile over one orbit.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use ts_core::constants::EARTH_ALBEDO;

use crate::environment::OrbitalEnvironment;

/// Samples per orbit in the generated profile.
pub const DEFAULT_PROFILE_SAMPLES: usize = 360;

/// One orbit of flux samples, as parallel arrays sharing an index.
///
/// The eclipse window is symmetric about half the period; the albedo
/// term follows the subsolar cosine and vanishes on the night side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitalProfile {
    /// Orbit period the sample times span (s).
    pub period_s: f64,
    /// Sample times from 0 to just under one period (s).
    pub time_s: Vec<f64>,
    /// Direct solar flux (W/m^2); zero while eclipsed.
    pub solar: Vec<f64>,
    /// Reflected albedo flux (W/m^2); zero while eclipsed.
    pub albedo: Vec<f64>,
    /// Earth infrared flux (W/m^2); constant over the orbit.
    pub earth_ir: Vec<f64>,
    /// Whether the spacecraft sees the sun at each sample.
    pub sunlit: Vec<bool>,
}

/// Interpolated profile lookup at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluxSample {
    pub solar: f64,
    pub albedo: f64,
    pub earth_ir: f64,
    pub sunlit: bool,
}

impl OrbitalProfile {
    /// Generate `samples` evenly spaced flux samples over one orbit.
    pub fn generate(env: &OrbitalEnvironment, samples: usize) -> Self {
        let period = env.period_s;
        let half_window = 0.5 * env.eclipse_fraction * period;

        let mut time_s = Vec::with_capacity(samples);
        let mut solar = Vec::with_capacity(samples);
        let mut albedo = Vec::with_capacity(samples);
        let mut earth_ir = Vec::with_capacity(samples);
        let mut sunlit = Vec::with_capacity(samples);

        for i in 0..samples {
            let t = i as f64 * period / samples as f64;
            let in_shadow = (t - 0.5 * period).abs() < half_window;

            time_s.push(t);
            earth_ir.push(env.earth_ir_flux);
            sunlit.push(!in_shadow);
            if in_shadow {
                solar.push(0.0);
                albedo.push(0.0);
            } else {
                let subsolar = (TAU * t / period).cos().max(0.0);
                solar.push(env.solar_flux);
                albedo.push(EARTH_ALBEDO * env.solar_flux * env.earth_view_factor * subsolar);
            }
        }

        Self {
            period_s: period,
            time_s,
            solar,
            albedo,
            earth_ir,
            sunlit,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.time_s.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_s.is_empty()
    }

    /// Sample the profile at absolute time `t` (s).
    ///
    /// Time maps onto orbit phase; flux values interpolate linearly
    /// between neighbouring samples (wrapping across the period) and
    /// the sunlit flag takes the nearer sample.
    pub fn sample(&self, t: f64) -> FluxSample {
        if self.is_empty() {
            return FluxSample {
                solar: 0.0,
                albedo: 0.0,
                earth_ir: 0.0,
                sunlit: false,
            };
        }
        let n = self.len();
        let period = self.period_s;
        let phase = ((t % period) + period) % period;

        // Falling through the scan means the phase sits in the last
        // bin, which wraps to the start of the next orbit.
        let mut lo = n - 1;
        for i in 0..n - 1 {
            if phase >= self.time_s[i] && phase < self.time_s[i + 1] {
                lo = i;
                break;
            }
        }
        let hi = (lo + 1) % n;
        let t_lo = self.time_s[lo];
        let t_hi = if hi == 0 { period } else { self.time_s[hi] };
        let span = t_hi - t_lo;
        let frac = if span > 0.0 { (phase - t_lo) / span } else { 0.0 };

        let lerp = |a: &[f64]| a[lo] + frac * (a[hi] - a[lo]);
        FluxSample {
            solar: lerp(&self.solar),
            albedo: lerp(&self.albedo),
            earth_ir: lerp(&self.earth_ir),
            sunlit: if frac < 0.5 {
                self.sunlit[lo]
            } else {
                self.sunlit[hi]
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OrbitalSpec;
    use chrono::{TimeZone, Utc};

    fn leo_profile() -> (OrbitalEnvironment, OrbitalProfile) {
        let spec = OrbitalSpec {
            altitude_km: Some(400.0),
            apogee_km: None,
            perigee_km: None,
            inclination_deg: 51.6,
            raan_deg: 0.0,
            epoch: Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap(),
            attitude: None,
        };
        let env = OrbitalEnvironment::from_spec(&spec).unwrap();
        let profile = OrbitalProfile::generate(&env, DEFAULT_PROFILE_SAMPLES);
        (env, profile)
    }

    #[test]
    fn arrays_share_a_length() {
        let (_, p) = leo_profile();
        assert_eq!(p.len(), DEFAULT_PROFILE_SAMPLES);
        assert_eq!(p.solar.len(), p.len());
        assert_eq!(p.albedo.len(), p.len());
        assert_eq!(p.earth_ir.len(), p.len());
        assert_eq!(p.sunlit.len(), p.len());
    }

    #[test]
    fn eclipse_window_is_centred_and_sized() {
        let (env, p) = leo_profile();
        let dark = p.sunlit.iter().filter(|s| !**s).count();
        let expected = env.eclipse_fraction * p.len() as f64;
        assert!((dark as f64 - expected).abs() <= 2.0, "dark samples {dark}");

        // Shadow sits around half the period, not at the start.
        assert!(p.sunlit[0]);
        assert!(!p.sunlit[p.len() / 2]);
    }

    #[test]
    fn eclipsed_samples_carry_no_sun() {
        let (env, p) = leo_profile();
        for i in 0..p.len() {
            if p.sunlit[i] {
                assert_eq!(p.solar[i], env.solar_flux);
            } else {
                assert_eq!(p.solar[i], 0.0);
                assert_eq!(p.albedo[i], 0.0);
            }
            assert_eq!(p.earth_ir[i], env.earth_ir_flux);
        }
    }

    #[test]
    fn albedo_peaks_at_the_subsolar_start() {
        let (env, p) = leo_profile();
        let peak = p.albedo.iter().cloned().fold(0.0, f64::max);
        assert!((peak - env.albedo_flux_peak).abs() < 1e-9);
        assert_eq!(p.albedo[0], peak);
    }

    #[test]
    fn sampling_wraps_across_orbits() {
        let (_, p) = leo_profile();
        let a = p.sample(100.0);
        for t in [100.0 + p.period_s, 100.0 - 3.0 * p.period_s] {
            let w = p.sample(t);
            assert!((a.solar - w.solar).abs() < 1e-6);
            assert!((a.albedo - w.albedo).abs() < 1e-6);
            assert!((a.earth_ir - w.earth_ir).abs() < 1e-6);
            assert_eq!(a.sunlit, w.sunlit);
        }
    }

    #[test]
    fn sampling_interpolates_between_bins() {
        let (_, p) = leo_profile();
        let dt = p.time_s[1] - p.time_s[0];
        let mid = p.sample(0.5 * dt);
        let expected = 0.5 * (p.albedo[0] + p.albedo[1]);
        assert!((mid.albedo - expected).abs() < 1e-9);
    }
}
