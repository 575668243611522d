//! Backward Euler with Newton-Raphson on a diagonal Jacobian.
//!
//! Solves C * (T_next - T_now) / h = Q_net(T_next) per diffusion
//! node. Off-diagonal coupling is dropped from the Jacobian; step
//! rejection and the iteration-count controller carry the stability
//! burden instead.

use tracing::{debug, warn};
use ts_core::constants::STEFAN_BOLTZMANN;
use ts_core::CancelToken;
use ts_network::{ConductorKind, SimulationConfig, TemperatureMap, ThermalNetwork};
use ts_results::SimulationResult;
use ts_solver::{heat_pipe_conductance, load_power, net_conductor_heat, relax_arithmetic_nodes};

use crate::recorder::Recorder;
use crate::runner::assert_boundaries;

/// Newton iteration cap per step.
const MAX_NEWTON_ITERS: usize = 10;
/// Convergence bound on the largest Newton update (K).
const NEWTON_TOLERANCE: f64 = 1e-4;
/// Fast-convergence threshold: grow the step at or below this count.
const GROW_AT_ITERS: usize = 3;
/// Slow-convergence threshold: shrink the step at or above this count.
const SHRINK_AT_ITERS: usize = 7;
/// Diagonal guard; smaller magnitudes skip the node's update.
const MIN_JACOBIAN: f64 = 1e-30;

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

    'outer: while config.t_end - t > time_eps {
        if cancel.is_cancelled() {
            converged = false;
            break;
        }

        let mut h_try = h.min(config.t_end - t);

        loop {
            match newton_step(net, &temps, t, h_try) {
                Some((next, iters)) => {
                    temps = next;
                    assert_boundaries(net, &mut temps);
                    relax_arithmetic_nodes(net, &mut temps, t + h_try);
                    t += h_try;
                    accepted += 1;
                    recorder.record(t, &temps);

                    h = if iters <= GROW_AT_ITERS {
                        (2.0 * h_try).min(config.max_step)
                    } else if iters >= SHRINK_AT_ITERS {
                        (0.5 * h_try).max(config.min_step)
                    } else {
                        h_try.max(config.min_step)
                    };
                    break;
                }
                None => {
                    // Roll back (the trial state was never committed)
                    // and retry smaller. Retries may go below min_step;
                    // a collapsed step abandons the run.
                    h_try *= 0.5;
                    debug!(t, h_try, "newton failed to converge; halving the step");
                    if h_try < 0.01 * config.min_step {
                        warn!(t, "implicit euler abandoned: step size collapsed");
                        converged = false;
                        break 'outer;
                    }
                }
            }
        }
    }

    recorder.into_result(converged, accepted)
}

/// One backward-Euler solve from `base` over [t, t+h].
///
/// Returns the converged state and the iteration count, or `None`
/// when Newton does not settle within the cap. Updates sweep the
/// diffusion nodes in stable network order; arithmetic nodes are
/// re-equilibrated at the head of every iteration.
fn newton_step(
    net: &ThermalNetwork,
    base: &TemperatureMap,
    t: f64,
    h: f64,
) -> Option<(TemperatureMap, usize)> {
    let t_next = t + h;
    let mut trial = base.clone();

    for iter in 1..=MAX_NEWTON_ITERS {
        relax_arithmetic_nodes(net, &mut trial, t_next);

        let mut max_delta: f64 = 0.0;
        for id in net.diffusion_ids() {
            let node = net.expect_node(id);
            let capacitance = node.capacitance;

            let q = net_conductor_heat(net, id, &trial) + load_power(net, id, t_next);
            let residual = capacitance * (trial[id] - base[id]) / h - q;
            let jacobian = capacitance / h - dq_dt(net, id, &trial);
            if jacobian.abs() < MIN_JACOBIAN {
                continue;
            }

            let delta = -residual / jacobian;
            max_delta = max_delta.max(delta.abs());
            if let Some(slot) = trial.get_mut(id) {
                *slot += delta;
            }
        }

        if max_delta < NEWTON_TOLERANCE {
            return Some((trial, iter));
        }
    }

    None
}

/// Diagonal derivative of net heat into a node with respect to its
/// own temperature. Heat-pipe conductance is frozen at the current
/// average across the Newton step.
fn dq_dt(net: &ThermalNetwork, id: &str, temps: &TemperatureMap) -> f64 {
    let mut d = 0.0;
    for entry in net.node_conductors(id) {
        let conductor = &net.conductors()[entry.conductor];
        d -= match &conductor.kind {
            ConductorKind::Linear { conductance } | ConductorKind::Contact { conductance } => {
                *conductance
            }
            ConductorKind::Radiation {
                area,
                view_factor,
                emissivity,
            } => {
                4.0 * STEFAN_BOLTZMANN * emissivity * area * view_factor * temps[id].powi(3)
            }
            ConductorKind::HeatPipe { curve } => {
                let t_avg = 0.5 * (temps[&conductor.node_from] + temps[&conductor.node_to]);
                heat_pipe_conductance(curve, t_avg)
            }
        };
    }
    d
}
