//! Network construction errors.
//!
//! These are the input errors surfaced synchronously from
//! [`build_network`](crate::build_network). Numerical conditions
//! during a run never raise; they land in the result structure.

use thiserror::Error;
use ts_orbit::OrbitError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    #[error("network has no nodes")]
    EmptyNetwork,

    #[error("duplicate node id `{id}`")]
    DuplicateNodeId { id: String },

    #[error("{entity} `{id}` references unknown node `{reference}`")]
    InvalidReference {
        entity: &'static str,
        id: String,
        reference: String,
    },

    #[error("boundary node `{id}` has no boundary temperature")]
    MissingBoundaryTemperature { id: String },

    #[error("invalid orbital configuration: {0}")]
    InvalidOrbital(#[from] OrbitError),
}
