//! ts-network: model layer for thermsat.
//!
//! Provides:
//! - Boundary record types for nodes, conductors, heat loads, and the
//!   simulation configuration (serde wire schema)
//! - `build_network`: validation plus per-node conductor and heat-load
//!   indexing, producing an immutable [`ThermalNetwork`]
//!
//! # Example
//!
//! ```
//! use ts_network::{build_network, ConductorKind, ConductorSpec, NodeSpec};
//!
//! let nodes = vec![
//!     NodeSpec::boundary("sink", "Sink", 300.0),
//!     NodeSpec::diffusion("plate", "Plate", 250.0, 280.0),
//! ];
//! let conductors = vec![ConductorSpec {
//!     id: "g1".into(),
//!     name: "Plate-sink strap".into(),
//!     node_from: "plate".into(),
//!     node_to: "sink".into(),
//!     kind: ConductorKind::Linear { conductance: 0.5 },
//! }];
//!
//! let network = build_network(nodes, conductors, vec![], None).unwrap();
//! assert_eq!(network.node_order().len(), 2);
//! assert_eq!(network.node_conductors("plate").len(), 1);
//! ```

pub mod builder;
pub mod error;
pub mod network;
pub mod types;

// Re-exports for ergonomics
pub use builder::build_network;
pub use error::NetworkError;
pub use network::{ConductorRef, OrbitContext, TemperatureMap, ThermalNetwork};
pub use ts_orbit::{AttitudeMode, OrbitalSpec};
pub use types::{
    ConductorKind, ConductorSpec, CurvePoint, HeatLoadKind, HeatLoadSpec, LoadPoint, NodeKind,
    NodeSpec, SimulationConfig, SimulationMode, SolverMethod, SurfaceKind,
};
