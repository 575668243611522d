//! Finite-difference sensitivity of the steady state.
//!
//! Enumerates the perturbable design parameters, solves the steady
//! state at p0 - d, p0, p0 + d with a 5 % (floored) step, and emits
//! central-difference dT/dp plus a second-order estimate for every
//! non-boundary output node. Each perturbed solve owns a private
//! clone of the inputs, so the per-parameter work runs on a rayon
//! parallel iterator.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_core::CancelToken;
use ts_network::{
    build_network, ConductorKind, ConductorSpec, HeatLoadKind, HeatLoadSpec, NodeKind, NodeSpec,
    OrbitalSpec, TemperatureMap,
};
use ts_solver::{solve_steady, SteadyOptions};

use crate::error::AnalysisError;

/// Sensitivity sweep knobs.
#[derive(Clone, Copy, Debug)]
pub struct SensitivityOptions {
    /// Relative perturbation size (fraction of the baseline value).
    pub relative_step: f64,
    /// Absolute floor on the perturbation.
    pub min_delta: f64,
    /// Steady-solver settings shared by every solve.
    pub steady: SteadyOptions,
}

impl Default for SensitivityOptions {
    fn default() -> Self {
        Self {
            relative_step: 0.05,
            min_delta: 1e-10,
            steady: SteadyOptions::default(),
        }
    }
}

/// One (parameter, output node) sensitivity record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityEntry {
    /// Parameter path, e.g. `node:radiator:emissivity`.
    pub parameter: String,
    /// Id of the record the parameter lives on.
    pub target_id: String,
    /// Unperturbed parameter value.
    pub baseline: f64,
    /// Perturbation actually applied.
    pub delta: f64,
    /// Output node this entry describes.
    pub node_id: String,
    /// Central-difference temperature derivative (K per unit).
    pub dt_dp: f64,
    /// Second-order central estimate (K per unit^2).
    pub d2t_dp2: f64,
}

/// Which scalar a parameter reference points at.
#[derive(Clone, Copy, Debug)]
enum Parameter {
    NodeAbsorptivity(usize),
    NodeEmissivity(usize),
    NodeCapacitance(usize),
    NodeMass(usize),
    Conductance(usize),
    ViewFactor(usize),
    LoadValue(usize),
}

/// Sweep every perturbable parameter of the design.
pub fn run_sensitivity(
    nodes: &[NodeSpec],
    conductors: &[ConductorSpec],
    loads: &[HeatLoadSpec],
    orbital: Option<&OrbitalSpec>,
    opts: &SensitivityOptions,
) -> Result<Vec<SensitivityEntry>, AnalysisError> {
    let baseline_net = build_network(
        nodes.to_vec(),
        conductors.to_vec(),
        loads.to_vec(),
        orbital.cloned(),
    )?;
    let output_ids: Vec<String> = baseline_net
        .node_order()
        .iter()
        .filter(|id| baseline_net.expect_node(id).effective_kind() != NodeKind::Boundary)
        .cloned()
        .collect();
    let baseline = solve_steady(&baseline_net, &opts.steady, &CancelToken::new()).temperatures;

    let parameters = enumerate_parameters(nodes, conductors, loads);
    debug!(count = parameters.len(), "sensitivity parameter sweep");

    let entries: Vec<Vec<SensitivityEntry>> = parameters
        .par_iter()
        .map(|&param| {
            sweep_one(
                param, nodes, conductors, loads, orbital, opts, &output_ids, &baseline,
            )
        })
        .collect::<Result<_, AnalysisError>>()?;

    Ok(entries.into_iter().flatten().collect())
}

/// Perturbable parameters, in record order.
///
/// Time-varying and orbital load magnitudes are deliberately not
/// enumerated; neither are boundary nodes.
fn enumerate_parameters(
    nodes: &[NodeSpec],
    conductors: &[ConductorSpec],
    loads: &[HeatLoadSpec],
) -> Vec<Parameter> {
    let mut params = Vec::new();

    for (i, node) in nodes.iter().enumerate() {
        if node.effective_kind() == NodeKind::Boundary {
            continue;
        }
        params.push(Parameter::NodeAbsorptivity(i));
        params.push(Parameter::NodeEmissivity(i));
        if node.capacitance > 0.0 {
            params.push(Parameter::NodeCapacitance(i));
        }
        if node.mass.is_some_and(|m| m > 0.0) {
            params.push(Parameter::NodeMass(i));
        }
    }

    for (i, conductor) in conductors.iter().enumerate() {
        match &conductor.kind {
            ConductorKind::Linear { conductance } | ConductorKind::Contact { conductance }
                if *conductance > 0.0 =>
            {
                params.push(Parameter::Conductance(i));
            }
            ConductorKind::Radiation { view_factor, .. } if *view_factor > 0.0 => {
                params.push(Parameter::ViewFactor(i));
            }
            _ => {}
        }
    }

    for (i, load) in loads.iter().enumerate() {
        if matches!(load.kind, HeatLoadKind::Constant { .. }) {
            params.push(Parameter::LoadValue(i));
        }
    }

    params
}

#[allow(clippy::too_many_arguments)]
fn sweep_one(
    param: Parameter,
    nodes: &[NodeSpec],
    conductors: &[ConductorSpec],
    loads: &[HeatLoadSpec],
    orbital: Option<&OrbitalSpec>,
    opts: &SensitivityOptions,
    output_ids: &[String],
    baseline: &TemperatureMap,
) -> Result<Vec<SensitivityEntry>, AnalysisError> {
    let p0 = read(param, nodes, conductors, loads);
    let delta = (p0.abs() * opts.relative_step).max(opts.min_delta);

    let mut perturbed = [TemperatureMap::new(), TemperatureMap::new()];
    for (slot, sign) in perturbed.iter_mut().zip([-1.0, 1.0]) {
        let mut nodes = nodes.to_vec();
        let mut conductors = conductors.to_vec();
        let mut loads = loads.to_vec();
        write(param, p0 + sign * delta, &mut nodes, &mut conductors, &mut loads);

        let net = build_network(nodes, conductors, loads, orbital.cloned())?;
        *slot = solve_steady(&net, &opts.steady, &CancelToken::new()).temperatures;
    }
    let [minus, plus] = perturbed;

    let (parameter, target_id) = label(param, nodes, conductors, loads);
    Ok(output_ids
        .iter()
        .map(|id| {
            let t_minus = minus[id];
            let t_plus = plus[id];
            let t_base = baseline[id];
            SensitivityEntry {
                parameter: parameter.clone(),
                target_id: target_id.clone(),
                baseline: p0,
                delta,
                node_id: id.clone(),
                dt_dp: (t_plus - t_minus) / (2.0 * delta),
                d2t_dp2: (t_plus - 2.0 * t_base + t_minus) / (delta * delta),
            }
        })
        .collect())
}

fn read(
    param: Parameter,
    nodes: &[NodeSpec],
    conductors: &[ConductorSpec],
    loads: &[HeatLoadSpec],
) -> f64 {
    match param {
        Parameter::NodeAbsorptivity(i) => nodes[i].absorptivity,
        Parameter::NodeEmissivity(i) => nodes[i].emissivity,
        Parameter::NodeCapacitance(i) => nodes[i].capacitance,
        Parameter::NodeMass(i) => nodes[i].mass.unwrap_or(0.0),
        Parameter::Conductance(i) => match &conductors[i].kind {
            ConductorKind::Linear { conductance } | ConductorKind::Contact { conductance } => {
                *conductance
            }
            _ => 0.0,
        },
        Parameter::ViewFactor(i) => match &conductors[i].kind {
            ConductorKind::Radiation { view_factor, .. } => *view_factor,
            _ => 0.0,
        },
        Parameter::LoadValue(i) => match &loads[i].kind {
            HeatLoadKind::Constant { value } => *value,
            _ => 0.0,
        },
    }
}

fn write(
    param: Parameter,
    value: f64,
    nodes: &mut [NodeSpec],
    conductors: &mut [ConductorSpec],
    loads: &mut [HeatLoadSpec],
) {
    match param {
        Parameter::NodeAbsorptivity(i) => nodes[i].absorptivity = value,
        Parameter::NodeEmissivity(i) => nodes[i].emissivity = value,
        Parameter::NodeCapacitance(i) => nodes[i].capacitance = value,
        Parameter::NodeMass(i) => nodes[i].mass = Some(value),
        Parameter::Conductance(i) => {
            if let ConductorKind::Linear { conductance } | ConductorKind::Contact { conductance } =
                &mut conductors[i].kind
            {
                *conductance = value;
            }
        }
        Parameter::ViewFactor(i) => {
            if let ConductorKind::Radiation { view_factor, .. } = &mut conductors[i].kind {
                *view_factor = value;
            }
        }
        Parameter::LoadValue(i) => {
            if let HeatLoadKind::Constant { value: v } = &mut loads[i].kind {
                *v = value;
            }
        }
    }
}

fn label(
    param: Parameter,
    nodes: &[NodeSpec],
    conductors: &[ConductorSpec],
    loads: &[HeatLoadSpec],
) -> (String, String) {
    match param {
        Parameter::NodeAbsorptivity(i) => {
            (format!("node:{}:absorptivity", nodes[i].id), nodes[i].id.clone())
        }
        Parameter::NodeEmissivity(i) => {
            (format!("node:{}:emissivity", nodes[i].id), nodes[i].id.clone())
        }
        Parameter::NodeCapacitance(i) => {
            (format!("node:{}:capacitance", nodes[i].id), nodes[i].id.clone())
        }
        Parameter::NodeMass(i) => (format!("node:{}:mass", nodes[i].id), nodes[i].id.clone()),
        Parameter::Conductance(i) => (
            format!("conductor:{}:conductance", conductors[i].id),
            conductors[i].id.clone(),
        ),
        Parameter::ViewFactor(i) => (
            format!("conductor:{}:view_factor", conductors[i].id),
            conductors[i].id.clone(),
        ),
        Parameter::LoadValue(i) => {
            (format!("heat_load:{}:value", loads[i].id), loads[i].id.clone())
        }
    }
}
