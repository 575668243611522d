//! Adaptive classical RK4 with a step-doubling error estimate.
//!
//! Each outer step takes one full step of size h and two half steps
//! from the same start. The difference between the two results over
//! the diffusion nodes estimates the local error; the half-step
//! result (the more accurate one) is what gets accepted. Arithmetic
//! nodes are re-equilibrated before every slope evaluation, and
//! boundary temperatures are re-asserted after every accepted step.

use tracing::debug;
use ts_core::CancelToken;
use ts_network::{SimulationConfig, TemperatureMap, ThermalNetwork};
use ts_results::SimulationResult;
use ts_solver::{node_derivative, relax_arithmetic_nodes};

use crate::recorder::Recorder;
use crate::runner::assert_boundaries;

/// Largest per-step growth factor.
const MAX_GROWTH: f64 = 2.0;
/// Safety factor on the optimal-step estimate.
const SAFETY: f64 = 0.9;

pub(crate) fn integrate(
    net: &ThermalNetwork,
    config: &SimulationConfig,
    cancel: &CancelToken,
) -> SimulationResult {
    let mut temps = net.initial_temperatures();
    relax_arithmetic_nodes(net, &mut temps, config.t_start);

    let mut recorder = Recorder::new(net);
    recorder.record(config.t_start, &temps);

    let mut t = config.t_start;
    let mut h = config.initial_step.clamp(config.min_step, config.max_step);
    let mut accepted = 0usize;
    let mut converged = true;
    let time_eps = 1e-12 * config.t_end.abs().max(1.0);

    while config.t_end - t > time_eps {
        if cancel.is_cancelled() {
            converged = false;
            break;
        }

        let h_try = h.min(config.t_end - t);

        let single = rk4_step(net, &temps, t, h_try);
        let halfway = rk4_step(net, &temps, t, 0.5 * h_try);
        let double = rk4_step(net, &halfway, t + 0.5 * h_try, 0.5 * h_try);

        let error = net
            .diffusion_ids()
            .iter()
            .map(|id| (single[id] - double[id]).abs())
            .fold(0.0f64, f64::max);

        if error < config.tolerance || h_try <= config.min_step {
            if error >= config.tolerance {
                debug!(t, error, "accepting step at the minimum size");
            }
            temps = double;
            assert_boundaries(net, &mut temps);
            relax_arithmetic_nodes(net, &mut temps, t + h_try);
            t += h_try;
            accepted += 1;
            recorder.record(t, &temps);

            if error < config.tolerance {
                let growth = MAX_GROWTH.min(SAFETY * (config.tolerance / error).powf(0.25));
                h = (h_try * growth).clamp(config.min_step, config.max_step);
            }
        } else {
            h = (0.5 * h_try).max(config.min_step);
            debug!(t, error, h, "step rejected");
        }
    }

    recorder.into_result(converged, accepted)
}

/// One classical RK4 step over the diffusion nodes.
///
/// Every slope evaluation sees arithmetic nodes freshly equilibrated
/// at its own trial state and time.
fn rk4_step(net: &ThermalNetwork, base: &TemperatureMap, t: f64, h: f64) -> TemperatureMap {
    let ids = net.diffusion_ids();

    let mut s1 = base.clone();
    relax_arithmetic_nodes(net, &mut s1, t);
    let k1 = slopes(net, &s1, t);

    let mut s2 = stage_state(net, base, &k1, 0.5 * h);
    relax_arithmetic_nodes(net, &mut s2, t + 0.5 * h);
    let k2 = slopes(net, &s2, t + 0.5 * h);

    let mut s3 = stage_state(net, base, &k2, 0.5 * h);
    relax_arithmetic_nodes(net, &mut s3, t + 0.5 * h);
    let k3 = slopes(net, &s3, t + 0.5 * h);

    let mut s4 = stage_state(net, base, &k3, h);
    relax_arithmetic_nodes(net, &mut s4, t + h);
    let k4 = slopes(net, &s4, t + h);

    let mut out = base.clone();
    for (i, id) in ids.iter().enumerate() {
        let slope = (k1[i] + 2.0 * (k2[i] + k3[i]) + k4[i]) / 6.0;
        if let Some(slot) = out.get_mut(id) {
            *slot += h * slope;
        }
    }
    out
}

/// Temperature derivatives for every diffusion node, in list order.
fn slopes(net: &ThermalNetwork, temps: &TemperatureMap, t: f64) -> Vec<f64> {
    net.diffusion_ids()
        .iter()
        .map(|id| node_derivative(net, net.expect_node(id), temps, t))
        .collect()
}

/// Trial state `base + dt * k` over the diffusion nodes.
fn stage_state(
    net: &ThermalNetwork,
    base: &TemperatureMap,
    k: &[f64],
    dt: f64,
) -> TemperatureMap {
    let mut state = base.clone();
    for (i, id) in net.diffusion_ids().iter().enumerate() {
        if let Some(slot) = state.get_mut(id) {
            *slot += dt * k[i];
        }
    }
    state
}
