//! The assembled, immutable thermal network.

use std::collections::HashMap;

use ts_core::constants::DEFAULT_INITIAL_TEMP;
use ts_orbit::{OrbitalEnvironment, OrbitalProfile};

use crate::types::{ConductorSpec, HeatLoadSpec, NodeSpec};

/// Working temperature state, node id -> temperature (K).
///
/// The one piece of mutable state a run owns; everything else on the
/// network is shared by reference.
pub type TemperatureMap = HashMap<String, f64>;

/// One adjacency entry: a conductor incident to a node.
#[derive(Debug, Clone, PartialEq)]
pub struct ConductorRef {
    /// Index into [`ThermalNetwork::conductors`].
    pub conductor: usize,
    /// Id of the opposite endpoint.
    pub other: String,
    /// +1.0 when the node is the `to` endpoint, -1.0 when `from`.
    pub sign: f64,
}

/// Orbital environment and flux profile attached to a network.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitContext {
    pub environment: OrbitalEnvironment,
    pub profile: OrbitalProfile,
}

/// A validated, indexed thermal network.
///
/// Built once by [`build_network`](crate::build_network) and then
/// shared immutably across integrators, the relaxer, and the result
/// writers. The adjacency and heat-load indices keep the inner kernel
/// at O(degree) per node instead of a full edge scan.
#[derive(Debug, Clone)]
pub struct ThermalNetwork {
    pub(crate) nodes: HashMap<String, NodeSpec>,
    pub(crate) conductors: Vec<ConductorSpec>,
    pub(crate) heat_loads: Vec<HeatLoadSpec>,

    /// All node ids in input order; the stable iteration order for
    /// every solver loop.
    pub(crate) node_order: Vec<String>,
    /// Ids of nodes that integrate in time (after the C <= 0 rule).
    pub(crate) diffusion_ids: Vec<String>,
    /// Ids solved algebraically each step (after the C <= 0 rule).
    pub(crate) arithmetic_ids: Vec<String>,
    /// Ids held at a fixed temperature.
    pub(crate) boundary_ids: Vec<String>,

    /// Node id -> incident conductors with orientation.
    pub(crate) node_conductors: HashMap<String, Vec<ConductorRef>>,
    /// Node id -> indices into `heat_loads`.
    pub(crate) node_heat_loads: HashMap<String, Vec<usize>>,

    pub(crate) orbit: Option<OrbitContext>,
}

impl ThermalNetwork {
    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&NodeSpec> {
        self.nodes.get(id)
    }

    /// Look up a node known to exist, e.g. an id taken from one of the
    /// network's own lists (panics otherwise).
    pub fn expect_node(&self, id: &str) -> &NodeSpec {
        &self.nodes[id]
    }

    /// All conductors, in input order.
    pub fn conductors(&self) -> &[ConductorSpec] {
        &self.conductors
    }

    /// All heat loads, in input order.
    pub fn heat_loads(&self) -> &[HeatLoadSpec] {
        &self.heat_loads
    }

    /// Every node id, in input order.
    pub fn node_order(&self) -> &[String] {
        &self.node_order
    }

    /// Ids of effective diffusion nodes.
    pub fn diffusion_ids(&self) -> &[String] {
        &self.diffusion_ids
    }

    /// Ids of effective arithmetic nodes.
    pub fn arithmetic_ids(&self) -> &[String] {
        &self.arithmetic_ids
    }

    /// Ids of boundary nodes.
    pub fn boundary_ids(&self) -> &[String] {
        &self.boundary_ids
    }

    /// Conductors incident to a node.
    pub fn node_conductors(&self, id: &str) -> &[ConductorRef] {
        self.node_conductors.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Heat-load indices attached to a node.
    pub fn node_heat_loads(&self, id: &str) -> &[usize] {
        self.node_heat_loads.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Orbital environment and profile, when the network has one.
    pub fn orbit(&self) -> Option<&OrbitContext> {
        self.orbit.as_ref()
    }

    /// Starting temperature state for a run: boundary nodes at their
    /// fixed value, everything else at its initial temperature (or the
    /// room-temperature fallback).
    pub fn initial_temperatures(&self) -> TemperatureMap {
        let mut temps = TemperatureMap::with_capacity(self.node_order.len());
        for id in &self.node_order {
            let node = &self.nodes[id];
            let t = match node.boundary_temperature {
                Some(fixed) if matches!(node.kind, crate::types::NodeKind::Boundary) => fixed,
                _ => node.initial_temperature.unwrap_or(DEFAULT_INITIAL_TEMP),
            };
            temps.insert(id.clone(), t);
        }
        temps
    }
}
