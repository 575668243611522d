//! Network assembly: validate references, build indices, attach the
//! orbital environment.

use std::collections::HashMap;

use tracing::warn;
use ts_orbit::{OrbitalEnvironment, OrbitalProfile, OrbitalSpec, DEFAULT_PROFILE_SAMPLES};

use crate::error::NetworkError;
use crate::network::{ConductorRef, OrbitContext, ThermalNetwork};
use crate::types::{ConductorSpec, HeatLoadKind, HeatLoadSpec, NodeKind, NodeSpec};

/// Validate raw records and freeze them into a [`ThermalNetwork`].
///
/// Every conductor endpoint and heat-load node must name an existing
/// node; boundary nodes must carry their fixed temperature. When an
/// orbit description is supplied, the derived environment and flux
/// profile are computed here and attached to the network.
pub fn build_network(
    nodes: Vec<NodeSpec>,
    conductors: Vec<ConductorSpec>,
    heat_loads: Vec<HeatLoadSpec>,
    orbital: Option<OrbitalSpec>,
) -> Result<ThermalNetwork, NetworkError> {
    if nodes.is_empty() {
        return Err(NetworkError::EmptyNetwork);
    }

    let mut node_map: HashMap<String, NodeSpec> = HashMap::with_capacity(nodes.len());
    let mut node_order = Vec::with_capacity(nodes.len());
    let mut diffusion_ids = Vec::new();
    let mut arithmetic_ids = Vec::new();
    let mut boundary_ids = Vec::new();

    for node in nodes {
        if node_map.contains_key(&node.id) {
            return Err(NetworkError::DuplicateNodeId { id: node.id });
        }
        match node.effective_kind() {
            NodeKind::Diffusion => diffusion_ids.push(node.id.clone()),
            NodeKind::Arithmetic => arithmetic_ids.push(node.id.clone()),
            NodeKind::Boundary => {
                if node.boundary_temperature.is_none() {
                    return Err(NetworkError::MissingBoundaryTemperature {
                        id: node.id,
                    });
                }
                boundary_ids.push(node.id.clone());
            }
        }
        node_order.push(node.id.clone());
        node_map.insert(node.id.clone(), node);
    }

    // Adjacency: each conductor appears at both endpoints, oriented so
    // that sign * flow is heat into the indexed node.
    let mut node_conductors: HashMap<String, Vec<ConductorRef>> = HashMap::new();
    for (idx, conductor) in conductors.iter().enumerate() {
        for (endpoint, other, sign) in [
            (&conductor.node_from, &conductor.node_to, -1.0),
            (&conductor.node_to, &conductor.node_from, 1.0),
        ] {
            if !node_map.contains_key(endpoint) {
                return Err(NetworkError::InvalidReference {
                    entity: "conductor",
                    id: conductor.id.clone(),
                    reference: endpoint.clone(),
                });
            }
            node_conductors
                .entry(endpoint.clone())
                .or_default()
                .push(ConductorRef {
                    conductor: idx,
                    other: other.clone(),
                    sign,
                });
        }
    }

    let mut node_heat_loads: HashMap<String, Vec<usize>> = HashMap::new();
    let mut has_orbital_load = false;
    for (idx, load) in heat_loads.iter().enumerate() {
        if !node_map.contains_key(&load.node_id) {
            return Err(NetworkError::InvalidReference {
                entity: "heat load",
                id: load.id.clone(),
                reference: load.node_id.clone(),
            });
        }
        if matches!(load.kind, HeatLoadKind::Orbital { .. }) {
            has_orbital_load = true;
        }
        node_heat_loads.entry(load.node_id.clone()).or_default().push(idx);
    }

    let orbit = match orbital {
        Some(spec) => {
            let environment = OrbitalEnvironment::from_spec(&spec)?;
            let profile = OrbitalProfile::generate(&environment, DEFAULT_PROFILE_SAMPLES);
            Some(OrbitContext {
                environment,
                profile,
            })
        }
        None => {
            if has_orbital_load {
                warn!("orbital heat loads present without an orbit; they will contribute nothing");
            }
            None
        }
    };

    Ok(ThermalNetwork {
        nodes: node_map,
        conductors,
        heat_loads,
        node_order,
        diffusion_ids,
        arithmetic_ids,
        boundary_ids,
        node_conductors,
        node_heat_loads,
        orbit,
    })
}
