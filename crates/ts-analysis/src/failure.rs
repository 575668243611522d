//! Failure-mode transformer.
//!
//! Pure function over the raw records: deep-copies the inputs and
//! applies exactly one named mutation, leaving the originals intact so
//! the caller can rebuild and compare against the healthy baseline.

use serde::{Deserialize, Serialize};

use ts_network::{ConductorKind, ConductorSpec, HeatLoadKind, HeatLoadSpec, NodeSpec, SurfaceKind};

use crate::error::AnalysisError;

/// Emissivity/absorptivity ceiling after degradation.
const OPTICAL_CEILING: f64 = 0.99;
/// MLI blankets are identified by their low starting emissivity.
const MLI_EMISSIVITY_CUTOFF: f64 = 0.1;
/// Default emissivity multiplier for `MliDegradation`.
const DEFAULT_DEGRADATION_FACTOR: f64 = 2.0;
/// Default absorptivity increase for `CoatingDegradationEol`.
const DEFAULT_COATING_DELTA: f64 = 0.1;
/// Default multiplier for `ComponentPowerSpike`.
const DEFAULT_SPIKE_FACTOR: f64 = 2.0;

/// The supported failure modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// A named heat load stops delivering power.
    HeaterFailure,
    /// Low-emissivity (MLI) surfaces lose their insulation quality.
    MliDegradation,
    /// End-of-life coating darkening on orbitally heated surfaces.
    CoatingDegradationEol,
    /// Tumbling: orbital loads average over all faces.
    AttitudeLossTumble,
    /// Electrical loads are scaled down fleet-wide.
    PowerBudgetReduction,
    /// A named conductor stops carrying heat.
    ConductorFailure,
    /// Every load on a named node is multiplied up.
    ComponentPowerSpike,
}

/// Knobs for [`apply_failure`]; unused fields are ignored by modes
/// that do not read them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FailureParams {
    /// Heat-load, conductor, or node id, per the failure kind.
    #[serde(default)]
    pub target_id: Option<String>,
    /// Scale factor (`MliDegradation`, `PowerBudgetReduction`).
    #[serde(default)]
    pub factor: Option<f64>,
    /// Absorptivity increase (`CoatingDegradationEol`).
    #[serde(default)]
    pub delta: Option<f64>,
    /// Multiplier for `ComponentPowerSpike`.
    #[serde(default)]
    pub spike_factor: Option<f64>,
}

/// Apply one failure mode to deep copies of the raw records.
///
/// The returned triple is suitable for a fresh `build_network` call;
/// the inputs are never modified.
pub fn apply_failure(
    kind: FailureKind,
    params: &FailureParams,
    nodes: &[NodeSpec],
    conductors: &[ConductorSpec],
    loads: &[HeatLoadSpec],
) -> Result<(Vec<NodeSpec>, Vec<ConductorSpec>, Vec<HeatLoadSpec>), AnalysisError> {
    let mut nodes = nodes.to_vec();
    let mut conductors = conductors.to_vec();
    let mut loads = loads.to_vec();

    match kind {
        FailureKind::HeaterFailure => {
            let target = require_target(params, "heater_failure")?;
            let mut found = false;
            for load in loads.iter_mut().filter(|l| l.id == target) {
                found = true;
                match &mut load.kind {
                    HeatLoadKind::Constant { value } => *value = 0.0,
                    HeatLoadKind::TimeVarying { points } => {
                        for point in points {
                            point.value = 0.0;
                        }
                    }
                    HeatLoadKind::Orbital { .. } => {}
                }
            }
            if !found {
                return Err(AnalysisError::UnknownTarget {
                    entity: "heat load",
                    target: target.to_string(),
                });
            }
        }

        FailureKind::MliDegradation => {
            let factor = params.factor.unwrap_or(DEFAULT_DEGRADATION_FACTOR);
            for node in nodes
                .iter_mut()
                .filter(|n| n.emissivity < MLI_EMISSIVITY_CUTOFF)
            {
                node.emissivity = (node.emissivity * factor).min(OPTICAL_CEILING);
            }
        }

        FailureKind::CoatingDegradationEol => {
            let delta = params.delta.unwrap_or(DEFAULT_COATING_DELTA);
            let heated: Vec<&str> = loads
                .iter()
                .filter(|l| matches!(l.kind, HeatLoadKind::Orbital { .. }))
                .map(|l| l.node_id.as_str())
                .collect();
            for node in nodes.iter_mut() {
                if heated.contains(&node.id.as_str()) {
                    node.absorptivity = (node.absorptivity + delta).min(OPTICAL_CEILING);
                }
            }
            for load in loads.iter_mut() {
                if let HeatLoadKind::Orbital { absorptivity, .. } = &mut load.kind {
                    *absorptivity = (*absorptivity + delta).min(OPTICAL_CEILING);
                }
            }
        }

        FailureKind::AttitudeLossTumble => {
            for load in loads.iter_mut() {
                if let HeatLoadKind::Orbital {
                    absorptivity,
                    surface,
                    ..
                } = &mut load.kind
                {
                    // Average the sun exposure over the six faces.
                    *surface = SurfaceKind::Custom;
                    *absorptivity /= 6.0;
                }
            }
        }

        FailureKind::PowerBudgetReduction => {
            let factor = params.factor.ok_or(AnalysisError::MissingParameter {
                kind: "power_budget_reduction",
                param: "factor",
            })?;
            for load in loads.iter_mut() {
                match &mut load.kind {
                    HeatLoadKind::Constant { value } => *value = (*value * factor).max(0.0),
                    HeatLoadKind::TimeVarying { points } => {
                        for point in points {
                            point.value = (point.value * factor).max(0.0);
                        }
                    }
                    HeatLoadKind::Orbital { .. } => {}
                }
            }
        }

        FailureKind::ConductorFailure => {
            let target = require_target(params, "conductor_failure")?;
            let conductor = conductors
                .iter_mut()
                .find(|c| c.id == target)
                .ok_or_else(|| AnalysisError::UnknownTarget {
                    entity: "conductor",
                    target: target.to_string(),
                })?;
            match &mut conductor.kind {
                ConductorKind::Linear { conductance }
                | ConductorKind::Contact { conductance } => *conductance = 0.0,
                ConductorKind::Radiation { view_factor, .. } => *view_factor = 0.0,
                ConductorKind::HeatPipe { curve } => {
                    for point in curve {
                        point.conductance = 0.0;
                    }
                }
            }
        }

        FailureKind::ComponentPowerSpike => {
            let target = require_target(params, "component_power_spike")?;
            if !nodes.iter().any(|n| n.id == target) {
                return Err(AnalysisError::UnknownTarget {
                    entity: "node",
                    target: target.to_string(),
                });
            }
            let spike = params.spike_factor.unwrap_or(DEFAULT_SPIKE_FACTOR);
            for load in loads.iter_mut().filter(|l| l.node_id == target) {
                match &mut load.kind {
                    HeatLoadKind::Constant { value } => *value *= spike,
                    HeatLoadKind::TimeVarying { points } => {
                        for point in points {
                            point.value *= spike;
                        }
                    }
                    HeatLoadKind::Orbital { .. } => {}
                }
            }
        }
    }

    Ok((nodes, conductors, loads))
}

fn require_target<'a>(
    params: &'a FailureParams,
    kind: &'static str,
) -> Result<&'a str, AnalysisError> {
    params
        .target_id
        .as_deref()
        .ok_or(AnalysisError::MissingParameter {
            kind,
            param: "target_id",
        })
}
