//! Gauss-Seidel relaxation of arithmetic (massless) nodes.
//!
//! Arithmetic nodes are not ODE degrees of freedom: before every
//! slope or residual evaluation the integrators call this sweep to
//! put them in instantaneous balance with their neighbours. Radiation
//! is linearised about the endpoint-average temperature, so each node
//! update solves a local linear balance; updates land in place and
//! later nodes in the same sweep see them.

use tracing::trace;
use ts_core::constants::STEFAN_BOLTZMANN;
use ts_network::{ConductorKind, TemperatureMap, ThermalNetwork};

use crate::flows::{heat_pipe_conductance, load_power};

/// Sweep cap per invocation.
pub const MAX_SWEEPS: usize = 100;

/// Convergence bound on the largest per-node update (K).
pub const SWEEP_TOLERANCE: f64 = 1e-4;

/// Drive every arithmetic node to its instantaneous balance at time
/// `t`, mutating `temps` in place.
pub fn relax_arithmetic_nodes(net: &ThermalNetwork, temps: &mut TemperatureMap, t: f64) {
    if net.arithmetic_ids().is_empty() {
        return;
    }

    for sweep in 0..MAX_SWEEPS {
        let mut max_delta: f64 = 0.0;

        for id in net.arithmetic_ids() {
            let t_node = temps[id];
            let mut g_sum = 0.0;
            let mut gt_sum = 0.0;

            for entry in net.node_conductors(id) {
                let conductor = &net.conductors()[entry.conductor];
                let t_other = temps[&entry.other];
                let g = match &conductor.kind {
                    ConductorKind::Linear { conductance }
                    | ConductorKind::Contact { conductance } => *conductance,
                    ConductorKind::HeatPipe { curve } => {
                        heat_pipe_conductance(curve, 0.5 * (t_node + t_other))
                    }
                    ConductorKind::Radiation {
                        area,
                        view_factor,
                        emissivity,
                    } => {
                        let t_avg = 0.5 * (t_node + t_other);
                        4.0 * STEFAN_BOLTZMANN
                            * emissivity
                            * area
                            * view_factor
                            * t_avg.powi(3)
                    }
                };
                g_sum += g;
                gt_sum += g * t_other;
            }

            if g_sum == 0.0 {
                // Isolated node: no balance to enforce.
                continue;
            }

            let t_new = (gt_sum + load_power(net, id, t)) / g_sum;
            max_delta = max_delta.max((t_new - t_node).abs());
            if let Some(slot) = temps.get_mut(id) {
                *slot = t_new;
            }
        }

        if max_delta < SWEEP_TOLERANCE {
            return;
        }
        if sweep + 1 == MAX_SWEEPS {
            trace!(max_delta, "arithmetic sweep hit the pass cap before settling");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ts_network::{build_network, ConductorSpec, HeatLoadKind, HeatLoadSpec, NodeSpec};

    fn strap(id: &str, from: &str, to: &str, g: f64) -> ConductorSpec {
        ConductorSpec {
            id: id.into(),
            name: id.into(),
            node_from: from.into(),
            node_to: to.into(),
            kind: ConductorKind::Linear { conductance: g },
        }
    }

    #[test]
    fn arithmetic_node_lands_between_boundaries() {
        let nodes = vec![
            NodeSpec::boundary("hot", "Hot", 400.0),
            NodeSpec::arithmetic("mid", "Mid"),
            NodeSpec::boundary("cold", "Cold", 300.0),
        ];
        let conductors = vec![
            strap("g1", "hot", "mid", 1.0),
            strap("g2", "mid", "cold", 1.0),
        ];
        let net = build_network(nodes, conductors, vec![], None).unwrap();
        let mut temps = net.initial_temperatures();

        relax_arithmetic_nodes(&net, &mut temps, 0.0);
        assert!((temps["mid"] - 350.0).abs() < 1e-3);
    }

    #[test]
    fn unequal_conductances_weight_the_balance() {
        let nodes = vec![
            NodeSpec::boundary("hot", "Hot", 400.0),
            NodeSpec::arithmetic("mid", "Mid"),
            NodeSpec::boundary("cold", "Cold", 300.0),
        ];
        let conductors = vec![
            strap("g1", "hot", "mid", 3.0),
            strap("g2", "mid", "cold", 1.0),
        ];
        let net = build_network(nodes, conductors, vec![], None).unwrap();
        let mut temps = net.initial_temperatures();

        relax_arithmetic_nodes(&net, &mut temps, 0.0);
        // (3*400 + 1*300) / 4
        assert!((temps["mid"] - 375.0).abs() < 1e-3);
    }

    #[test]
    fn heat_load_raises_the_balance_point() {
        let nodes = vec![
            NodeSpec::boundary("sink", "Sink", 300.0),
            NodeSpec::arithmetic("mid", "Mid"),
        ];
        let conductors = vec![strap("g", "mid", "sink", 2.0)];
        let loads = vec![HeatLoadSpec {
            id: "q".into(),
            node_id: "mid".into(),
            kind: HeatLoadKind::Constant { value: 20.0 },
        }];
        let net = build_network(nodes, conductors, loads, None).unwrap();
        let mut temps = net.initial_temperatures();

        relax_arithmetic_nodes(&net, &mut temps, 0.0);
        // T = T_sink + Q/G
        assert!((temps["mid"] - 310.0).abs() < 1e-3);
    }

    #[test]
    fn radiative_balance_settles_on_the_linearised_fixed_point() {
        // Massless shield radiating to a warm enclosure with a constant
        // absorbed load. The sweep linearises radiation about the
        // endpoint average, so its fixed point satisfies
        // G_rad(T_avg) * (T - T_other) = Q, not the raw quartic law.
        // (The iteration only contracts while T stays under twice the
        // neighbour temperature, which holds here.)
        let nodes = vec![
            NodeSpec::boundary("wall", "Wall", 300.0),
            NodeSpec::arithmetic("shield", "Shield"),
        ];
        let conductors = vec![ConductorSpec {
            id: "rad".into(),
            name: "shield to wall".into(),
            node_from: "shield".into(),
            node_to: "wall".into(),
            kind: ConductorKind::Radiation {
                area: 1.0,
                view_factor: 1.0,
                emissivity: 0.9,
            },
        }];
        let loads = vec![HeatLoadSpec {
            id: "q".into(),
            node_id: "shield".into(),
            kind: HeatLoadKind::Constant { value: 50.0 },
        }];
        let net = build_network(nodes, conductors, loads, None).unwrap();
        let mut temps = net.initial_temperatures();

        relax_arithmetic_nodes(&net, &mut temps, 0.0);

        let t = temps["shield"];
        let t_avg = 0.5 * (t + 300.0);
        let g_rad = 4.0 * STEFAN_BOLTZMANN * 0.9 * t_avg.powi(3);
        let residual = g_rad * (t - 300.0) - 50.0;
        assert!(residual.abs() < 0.1, "residual {residual} W at T = {t} K");
    }

    #[test]
    fn isolated_arithmetic_node_is_skipped() {
        let nodes = vec![NodeSpec::arithmetic("alone", "Alone")];
        let net = build_network(nodes, vec![], vec![], None).unwrap();
        let mut temps = net.initial_temperatures();
        relax_arithmetic_nodes(&net, &mut temps, 0.0);
        assert_eq!(temps["alone"], ts_core::constants::DEFAULT_INITIAL_TEMP);
    }
}
