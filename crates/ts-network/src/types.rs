//! Boundary record types.
//!
//! These are the wire schema: string ids, `f64` physical quantities,
//! and lowercase string tags for every sum type. Field names and tag
//! spellings are pinned by the schema tests.

use serde::{Deserialize, Serialize};

/// What a node is, thermally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Finite thermal capacitance; temperature integrates in time.
    Diffusion,
    /// Massless; temperature solved from instantaneous balance.
    Arithmetic,
    /// Temperature held at a prescribed value.
    Boundary,
}

/// One thermal node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    /// Thermal capacitance (J/K). Ignored for boundary nodes.
    #[serde(default)]
    pub capacitance: f64,
    /// Surface area (m^2).
    #[serde(default)]
    pub area: f64,
    /// Solar absorptivity, in [0, 1].
    #[serde(default)]
    pub absorptivity: f64,
    /// Infrared emissivity, in [0, 1].
    #[serde(default)]
    pub emissivity: f64,
    /// Mass (kg); a sensitivity parameter, not used by the solvers.
    #[serde(default)]
    pub mass: Option<f64>,
    /// Starting temperature (K) for diffusion and arithmetic nodes.
    #[serde(default)]
    pub initial_temperature: Option<f64>,
    /// Fixed temperature (K); required for boundary nodes.
    #[serde(default)]
    pub boundary_temperature: Option<f64>,
}

impl NodeSpec {
    /// Kind after the zero-capacitance rule: a diffusion node with
    /// C <= 0 behaves as arithmetic.
    pub fn effective_kind(&self) -> NodeKind {
        match self.kind {
            NodeKind::Diffusion if self.capacitance <= 0.0 => NodeKind::Arithmetic,
            kind => kind,
        }
    }

    /// Convenience constructor for a diffusion node.
    pub fn diffusion(
        id: impl Into<String>,
        name: impl Into<String>,
        capacitance: f64,
        initial_temperature: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: NodeKind::Diffusion,
            capacitance,
            area: 0.0,
            absorptivity: 0.0,
            emissivity: 0.0,
            mass: None,
            initial_temperature: Some(initial_temperature),
            boundary_temperature: None,
        }
    }

    /// Convenience constructor for an arithmetic node.
    pub fn arithmetic(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: NodeKind::Arithmetic,
            capacitance: 0.0,
            area: 0.0,
            absorptivity: 0.0,
            emissivity: 0.0,
            mass: None,
            initial_temperature: None,
            boundary_temperature: None,
        }
    }

    /// Convenience constructor for a boundary node.
    pub fn boundary(id: impl Into<String>, name: impl Into<String>, temperature: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: NodeKind::Boundary,
            capacitance: 0.0,
            area: 0.0,
            absorptivity: 0.0,
            emissivity: 0.0,
            mass: None,
            initial_temperature: None,
            boundary_temperature: Some(temperature),
        }
    }
}

/// One point of a heat-pipe conductance curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Average temperature of the two endpoints (K).
    pub temperature: f64,
    /// Conductance at that temperature (W/K).
    pub conductance: f64,
}

/// Physical law carried by a conductor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConductorKind {
    /// Q = G * (T_from - T_to).
    Linear { conductance: f64 },
    /// Bolted/contact joint; same law as linear.
    Contact { conductance: f64 },
    /// Q = sigma * eps * A * F * (T_from^4 - T_to^4).
    Radiation {
        area: f64,
        view_factor: f64,
        emissivity: f64,
    },
    /// Conductance interpolated from a curve at the endpoint average
    /// temperature. Curves are sorted by temperature; an empty curve
    /// evaluates to zero conductance.
    HeatPipe { curve: Vec<CurvePoint> },
}

/// A directed heat path between two nodes.
///
/// The (from, to) ordering fixes the sign convention: positive flow
/// means heat moves from -> to when T_from > T_to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConductorSpec {
    pub id: String,
    pub name: String,
    pub node_from: String,
    pub node_to: String,
    #[serde(flatten)]
    pub kind: ConductorKind,
}

/// One point of a time-varying load profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadPoint {
    /// Time (s).
    pub time: f64,
    /// Power (W).
    pub value: f64,
}

/// Which orbital fluxes a surface absorbs while sunlit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
    /// Sun-facing: direct solar plus albedo, plus Earth IR.
    Solar,
    /// Nadir-facing: albedo plus Earth IR, no direct solar.
    EarthFacing,
    /// Zenith-facing: direct solar only.
    AntiEarth,
    /// User-defined surface; treated like a sun-facing one.
    Custom,
}

/// Heat input applied to one node. Multiple loads on a node sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeatLoadKind {
    /// Fixed power (W).
    Constant { value: f64 },
    /// Piecewise-linear power profile, clamped outside its domain.
    TimeVarying { points: Vec<LoadPoint> },
    /// Environment-driven absorption on one surface.
    Orbital {
        absorptivity: f64,
        emissivity: f64,
        area: f64,
        surface: SurfaceKind,
    },
}

/// A heat load record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatLoadSpec {
    pub id: String,
    pub node_id: String,
    #[serde(flatten)]
    pub kind: HeatLoadKind,
}

/// Transient vs. steady-state run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationMode {
    Transient,
    Steady,
}

/// Transient integrator selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverMethod {
    Rk4,
    ImplicitEuler,
}

/// Run configuration consumed by the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub mode: SimulationMode,
    /// Transient integrator; `None` selects RK4.
    #[serde(default)]
    pub method: Option<SolverMethod>,
    /// Start of the time window (s).
    pub t_start: f64,
    /// End of the time window (s).
    pub t_end: f64,
    /// First attempted step (s).
    pub initial_step: f64,
    /// Smallest step the controllers will choose (s).
    pub min_step: f64,
    /// Largest step the controllers will choose (s).
    pub max_step: f64,
    /// Iteration cap for the steady-state Newton loop.
    pub max_iterations: usize,
    /// Convergence tolerance: step-doubling error bound for RK4 (K),
    /// residual bound for the steady solver (W).
    pub tolerance: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            mode: SimulationMode::Transient,
            method: Some(SolverMethod::Rk4),
            t_start: 0.0,
            t_end: 3600.0,
            initial_step: 1.0,
            min_step: 1e-3,
            max_step: 100.0,
            max_iterations: 100,
            tolerance: 1e-3,
        }
    }
}
