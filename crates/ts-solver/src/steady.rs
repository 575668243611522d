//! Steady-state solution by Newton-Raphson with a dense Jacobian.
//!
//! Unknowns are the effective diffusion and arithmetic nodes, in
//! network order; boundary nodes stay fixed and only appear through
//! the residuals. The Jacobian is assembled analytically per
//! conductor and solved with a dense LU factorisation; a singular
//! factorisation falls back to gradient relaxation so the iteration
//! always makes progress.

use std::collections::HashMap;

use nalgebra::{DMatrix, DVector};
use tracing::{debug, warn};
use ts_core::constants::STEFAN_BOLTZMANN;
use ts_core::CancelToken;
use ts_network::{ConductorKind, NodeKind, TemperatureMap, ThermalNetwork};

use crate::flows::{heat_pipe_conductance, load_power, net_conductor_heat};

/// Steady solver knobs.
#[derive(Clone, Copy, Debug)]
pub struct SteadyOptions {
    /// Newton iteration cap.
    pub max_iterations: usize,
    /// Convergence bound on the largest residual (W).
    pub tolerance: f64,
    /// Fraction of each Newton step applied.
    pub damping: f64,
    /// Largest per-iteration temperature change (K).
    pub max_step_k: f64,
    /// Temperatures never drop below this floor (K).
    pub min_temperature_k: f64,
    /// Time at which heat loads are evaluated (s).
    pub load_time: f64,
}

impl Default for SteadyOptions {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-3,
            damping: 1.0,
            max_step_k: 100.0,
            min_temperature_k: 1.0,
            load_time: 0.0,
        }
    }
}

/// Steady solve outcome. Non-convergence is reported, never raised.
#[derive(Clone, Debug)]
pub struct SteadyOutcome {
    /// Final temperatures for every node.
    pub temperatures: TemperatureMap,
    /// Newton iterations taken.
    pub iterations: usize,
    pub converged: bool,
    /// Largest residual magnitude at exit (W).
    pub max_residual: f64,
}

/// Solve the network's steady state from its initial temperatures.
pub fn solve_steady(
    net: &ThermalNetwork,
    opts: &SteadyOptions,
    cancel: &CancelToken,
) -> SteadyOutcome {
    let mut temps = net.initial_temperatures();

    // Unknowns in stable network order; boundary nodes are excluded.
    let unknowns: Vec<&str> = net
        .node_order()
        .iter()
        .filter(|id| {
            net.node(id)
                .is_some_and(|n| n.effective_kind() != NodeKind::Boundary)
        })
        .map(String::as_str)
        .collect();
    let index: HashMap<&str, usize> = unknowns
        .iter()
        .enumerate()
        .map(|(i, id)| (*id, i))
        .collect();
    let n = unknowns.len();

    if n == 0 {
        return SteadyOutcome {
            temperatures: temps,
            iterations: 0,
            converged: true,
            max_residual: 0.0,
        };
    }

    let mut iterations = 0;
    let mut converged = false;
    let mut max_residual = f64::INFINITY;

    for iter in 0..opts.max_iterations {
        if cancel.is_cancelled() {
            break;
        }
        iterations = iter + 1;

        let residual = assemble_residual(net, &unknowns, &temps, opts.load_time);
        max_residual = residual.amax();
        if max_residual < opts.tolerance {
            iterations = iter;
            converged = true;
            break;
        }

        let jacobian = assemble_jacobian(net, &index, &temps, n);
        let delta = match jacobian.lu().solve(&(-&residual)) {
            Some(step) => step,
            None => {
                warn!(iter, "singular steady-state Jacobian; gradient relaxation step");
                0.01 * &residual
            }
        };

        for (i, id) in unknowns.iter().enumerate() {
            let step = opts.damping * delta[i].clamp(-opts.max_step_k, opts.max_step_k);
            if let Some(slot) = temps.get_mut(*id) {
                *slot = (*slot + step).max(opts.min_temperature_k);
            }
        }
    }

    if !converged {
        debug!(max_residual, iterations, "steady solve stopped before tolerance");
    }

    // Boundary nodes report their prescribed value, exactly.
    for id in net.boundary_ids() {
        if let (Some(node), Some(slot)) = (net.node(id), temps.get_mut(id)) {
            if let Some(fixed) = node.boundary_temperature {
                *slot = fixed;
            }
        }
    }

    SteadyOutcome {
        temperatures: temps,
        iterations,
        converged,
        max_residual,
    }
}

fn assemble_residual(
    net: &ThermalNetwork,
    unknowns: &[&str],
    temps: &TemperatureMap,
    load_time: f64,
) -> DVector<f64> {
    DVector::from_iterator(
        unknowns.len(),
        unknowns
            .iter()
            .map(|id| net_conductor_heat(net, id, temps) + load_power(net, id, load_time)),
    )
}

/// Dense Jacobian of the residual over the unknown set.
///
/// Each conductor contributes to the rows of whichever endpoints are
/// unknown; fixed endpoints simply drop their column.
fn assemble_jacobian(
    net: &ThermalNetwork,
    index: &HashMap<&str, usize>,
    temps: &TemperatureMap,
    n: usize,
) -> DMatrix<f64> {
    let mut jac = DMatrix::zeros(n, n);

    for conductor in net.conductors() {
        let from = conductor.node_from.as_str();
        let to = conductor.node_to.as_str();
        let row_from = index.get(from).copied();
        let row_to = index.get(to).copied();

        match &conductor.kind {
            ConductorKind::Linear { conductance } | ConductorKind::Contact { conductance } => {
                couple_linear(&mut jac, row_from, row_to, *conductance);
            }
            ConductorKind::HeatPipe { curve } => {
                let g = heat_pipe_conductance(curve, 0.5 * (temps[from] + temps[to]));
                couple_linear(&mut jac, row_from, row_to, g);
            }
            ConductorKind::Radiation {
                area,
                view_factor,
                emissivity,
            } => {
                let k = STEFAN_BOLTZMANN * emissivity * area * view_factor;
                let d_from = 4.0 * k * temps[from].powi(3);
                let d_to = 4.0 * k * temps[to].powi(3);
                if let Some(i) = row_from {
                    jac[(i, i)] -= d_from;
                    if let Some(j) = row_to {
                        jac[(i, j)] += d_to;
                    }
                }
                if let Some(i) = row_to {
                    jac[(i, i)] -= d_to;
                    if let Some(j) = row_from {
                        jac[(i, j)] += d_from;
                    }
                }
            }
        }
    }

    jac
}

fn couple_linear(jac: &mut DMatrix<f64>, row_from: Option<usize>, row_to: Option<usize>, g: f64) {
    if let Some(i) = row_from {
        jac[(i, i)] -= g;
        if let Some(j) = row_to {
            jac[(i, j)] += g;
        }
    }
    if let Some(i) = row_to {
        jac[(i, i)] -= g;
        if let Some(j) = row_from {
            jac[(i, j)] += g;
        }
    }
}
