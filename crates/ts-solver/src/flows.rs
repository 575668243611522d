//! Conductor and heat-load flow primitives.
//!
//! Everything the integrators and the steady solver evaluate per step
//! funnels through here, so the sign conventions live in exactly one
//! place: conductor flow is positive from -> to when T_from > T_to,
//! and adjacency entries carry the orientation sign that turns a flow
//! into heat *into* the indexed node.

use tracing::warn;
use ts_core::constants::STEFAN_BOLTZMANN;
use ts_core::piecewise_linear_by;
use ts_network::{
    ConductorKind, ConductorSpec, CurvePoint, HeatLoadKind, HeatLoadSpec, NodeKind, NodeSpec,
    OrbitContext, SurfaceKind, TemperatureMap, ThermalNetwork,
};

/// Heat-pipe conductance at an endpoint-average temperature, clamped
/// to the curve's domain. Empty curves conduct nothing.
pub fn heat_pipe_conductance(curve: &[CurvePoint], t_avg: f64) -> f64 {
    match piecewise_linear_by(curve, t_avg, |p| (p.temperature, p.conductance)) {
        Some(g) => g,
        None => {
            warn!("heat-pipe curve has no points; treating conductance as zero");
            0.0
        }
    }
}

/// Signed flow through a conductor, positive from -> to.
pub fn conductor_flow(conductor: &ConductorSpec, t_from: f64, t_to: f64) -> f64 {
    match &conductor.kind {
        ConductorKind::Linear { conductance } | ConductorKind::Contact { conductance } => {
            conductance * (t_from - t_to)
        }
        ConductorKind::Radiation {
            area,
            view_factor,
            emissivity,
        } => {
            STEFAN_BOLTZMANN
                * emissivity
                * area
                * view_factor
                * (t_from.powi(4) - t_to.powi(4))
        }
        ConductorKind::HeatPipe { curve } => {
            heat_pipe_conductance(curve, 0.5 * (t_from + t_to)) * (t_from - t_to)
        }
    }
}

/// Net conductor heat into a node, via its adjacency entries.
pub fn net_conductor_heat(net: &ThermalNetwork, node_id: &str, temps: &TemperatureMap) -> f64 {
    let mut q = 0.0;
    for entry in net.node_conductors(node_id) {
        let conductor = &net.conductors()[entry.conductor];
        let t_from = temps[&conductor.node_from];
        let t_to = temps[&conductor.node_to];
        q += entry.sign * conductor_flow(conductor, t_from, t_to);
    }
    q
}

/// Power delivered by one heat load at time `t`.
pub fn single_load_power(load: &HeatLoadSpec, orbit: Option<&OrbitContext>, t: f64) -> f64 {
    match &load.kind {
        HeatLoadKind::Constant { value } => *value,
        HeatLoadKind::TimeVarying { points } => {
            piecewise_linear_by(points, t, |p| (p.time, p.value)).unwrap_or(0.0)
        }
        HeatLoadKind::Orbital {
            absorptivity,
            emissivity,
            area,
            surface,
        } => {
            let Some(ctx) = orbit else {
                return 0.0;
            };
            let flux = ctx.profile.sample(t);
            let mut q = 0.0;
            match surface {
                SurfaceKind::Solar | SurfaceKind::Custom => {
                    if flux.sunlit {
                        q += absorptivity * (flux.solar + flux.albedo) * area;
                    }
                    q += emissivity * flux.earth_ir * area;
                }
                SurfaceKind::EarthFacing => {
                    if flux.sunlit {
                        q += absorptivity * flux.albedo * area;
                    }
                    q += emissivity * flux.earth_ir * area;
                }
                SurfaceKind::AntiEarth => {
                    if flux.sunlit {
                        q += absorptivity * flux.solar * area;
                    }
                }
            }
            q
        }
    }
}

/// Sum of all heat loads on a node at time `t`.
pub fn load_power(net: &ThermalNetwork, node_id: &str, t: f64) -> f64 {
    let mut q = 0.0;
    for &idx in net.node_heat_loads(node_id) {
        q += single_load_power(&net.heat_loads()[idx], net.orbit(), t);
    }
    q
}

/// Temperature derivative of one node (K/s).
///
/// Only effective diffusion nodes integrate; arithmetic and boundary
/// nodes contribute no ODE degree of freedom.
pub fn node_derivative(
    net: &ThermalNetwork,
    node: &NodeSpec,
    temps: &TemperatureMap,
    t: f64,
) -> f64 {
    match node.effective_kind() {
        NodeKind::Diffusion => {
            (net_conductor_heat(net, &node.id, temps) + load_power(net, &node.id, t))
                / node.capacitance
        }
        NodeKind::Arithmetic | NodeKind::Boundary => 0.0,
    }
}
