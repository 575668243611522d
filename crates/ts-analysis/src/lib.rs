//! ts-analysis: what-if tooling layered on the steady solver.
//!
//! Provides:
//! - `apply_failure`: pure transform producing deep-copied inputs with
//!   one named failure mode applied, ready for a rebuild
//! - `run_sensitivity`: finite-difference derivatives of the steady
//!   state across every perturbable design parameter

pub mod error;
pub mod failure;
pub mod sensitivity;

pub use error::AnalysisError;
pub use failure::{apply_failure, FailureKind, FailureParams};
pub use sensitivity::{run_sensitivity, SensitivityEntry, SensitivityOptions};
