//! ts-core: stable foundation for thermsat.
//!
//! Contains:
//! - constants (physical constants shared across the solver boundary)
//! - numeric (Real + float comparison helpers)
//! - interp (piecewise-linear table lookup used by curves and load profiles)
//! - cancel (cooperative cancellation token for long runs)

pub mod cancel;
pub mod constants;
pub mod interp;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use cancel::CancelToken;
pub use constants::*;
pub use interp::piecewise_linear_by;
pub use numeric::*;
