//! Energy-balance audit of a completed transient run.
//!
//! Compares stored-energy change against externally injected energy
//! and boundary exchange, both integrated trapezoidally over the
//! recorded time points. Orbital heat loads are not integrated, so
//! orbit-driven runs are not expected to balance; the audit still
//! always returns a report.

use ts_core::relative_error;
use ts_network::{HeatLoadKind, NodeKind, ThermalNetwork};
use ts_results::{EnergyReport, SimulationResult};
use ts_solver::single_load_power;

/// Default relative-error threshold for `is_balanced`.
pub const BALANCE_THRESHOLD: f64 = 0.05;

/// Audit a transient result against its network.
pub fn audit_energy_balance(net: &ThermalNetwork, result: &SimulationResult) -> EnergyReport {
    audit_with_threshold(net, result, BALANCE_THRESHOLD)
}

/// Audit with a caller-chosen threshold.
pub fn audit_with_threshold(
    net: &ThermalNetwork,
    result: &SimulationResult,
    threshold: f64,
) -> EnergyReport {
    let times = &result.times;

    // Stored energy: sum of C * (T_final - T_initial) over diffusion
    // nodes.
    let mut stored_delta = 0.0;
    for id in net.diffusion_ids() {
        let node = net.expect_node(id);
        if let Some(series) = result.node_temperatures.get(id) {
            if let (Some(first), Some(last)) = (series.first(), series.last()) {
                stored_delta += node.capacitance * (last - first);
            }
        }
    }

    // External input from constant and time-varying loads.
    let mut external_input = 0.0;
    for load in net.heat_loads() {
        if matches!(load.kind, HeatLoadKind::Orbital { .. }) {
            continue;
        }
        external_input += trapezoid(times, |t| single_load_power(load, None, t));
    }

    // Boundary exchange: conductors touching exactly one boundary
    // node, signed so boundary -> interior counts positive.
    let mut boundary_exchange = 0.0;
    for conductor in net.conductors() {
        let from_boundary =
            net.expect_node(&conductor.node_from).effective_kind() == NodeKind::Boundary;
        let to_boundary =
            net.expect_node(&conductor.node_to).effective_kind() == NodeKind::Boundary;
        if from_boundary == to_boundary {
            continue;
        }
        let orientation = if from_boundary { 1.0 } else { -1.0 };
        if let Some(flows) = result.conductor_flows.get(&conductor.id) {
            boundary_exchange += orientation * trapezoid_samples(times, flows);
        }
    }

    let supplied = external_input + boundary_exchange;
    let error = relative_error(supplied, stored_delta);

    EnergyReport {
        stored_delta,
        external_input,
        boundary_exchange,
        relative_error: error,
        is_balanced: error < threshold,
        threshold,
    }
}

fn trapezoid(times: &[f64], f: impl Fn(f64) -> f64) -> f64 {
    let mut total = 0.0;
    for pair in times.windows(2) {
        total += 0.5 * (f(pair[0]) + f(pair[1])) * (pair[1] - pair[0]);
    }
    total
}

fn trapezoid_samples(times: &[f64], values: &[f64]) -> f64 {
    let n = times.len().min(values.len());
    let mut total = 0.0;
    for i in 1..n {
        total += 0.5 * (values[i - 1] + values[i]) * (times[i] - times[i - 1]);
    }
    total
}
