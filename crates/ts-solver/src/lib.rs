//! ts-solver: heat-flow kernel and nonlinear solvers for thermsat.
//!
//! Three layers share one set of flow primitives:
//! - `flows`: signed conductor flow per physical law, heat-load
//!   evaluation (constant / time-varying / orbital), node derivative
//! - `relax`: Gauss-Seidel sweep that holds massless (arithmetic)
//!   nodes in instantaneous balance, linearising radiation
//! - `steady`: Newton-Raphson steady state with a dense Jacobian over
//!   the non-boundary nodes

pub mod flows;
pub mod relax;
pub mod steady;

pub use flows::{
    conductor_flow, heat_pipe_conductance, load_power, net_conductor_heat, node_derivative,
    single_load_power,
};
pub use relax::relax_arithmetic_nodes;
pub use steady::{solve_steady, SteadyOptions, SteadyOutcome};
