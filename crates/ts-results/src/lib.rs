//! ts-results: result types shared by the solvers and their callers.

pub mod types;

pub use types::{EnergyReport, SimulationResult};
