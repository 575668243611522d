//! Simulation errors.
//!
//! Only configuration problems raise; numerical trouble during a run
//! is reported through the result structure instead.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("invalid simulation config: {what}")]
    InvalidConfig { what: &'static str },
}
