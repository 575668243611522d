//! Run dispatch and shared step helpers.

use ts_core::CancelToken;
use ts_network::{
    NodeKind, SimulationConfig, SimulationMode, SolverMethod, TemperatureMap, ThermalNetwork,
};
use ts_results::SimulationResult;
use ts_solver::{solve_steady, SteadyOptions};

use crate::audit::audit_energy_balance;
use crate::error::SimError;
use crate::recorder::Recorder;
use crate::{implicit, rk4};

/// Run a simulation without external cancellation.
pub fn run(net: &ThermalNetwork, config: &SimulationConfig) -> Result<SimulationResult, SimError> {
    run_with_cancel(net, config, &CancelToken::new())
}

/// Run a simulation, honouring a cancellation signal at the start of
/// every accepted outer step. A cancelled run returns its partial
/// series with `converged = false`.
pub fn run_with_cancel(
    net: &ThermalNetwork,
    config: &SimulationConfig,
    cancel: &CancelToken,
) -> Result<SimulationResult, SimError> {
    validate(config)?;

    match config.mode {
        SimulationMode::Steady => {
            let opts = SteadyOptions {
                max_iterations: config.max_iterations,
                tolerance: config.tolerance,
                load_time: config.t_start,
                ..SteadyOptions::default()
            };
            let outcome = solve_steady(net, &opts, cancel);

            let mut recorder = Recorder::new(net);
            recorder.record(config.t_start, &outcome.temperatures);
            let mut result = recorder.into_result(outcome.converged, outcome.iterations);
            result.energy_balance_error = 0.0;
            Ok(result)
        }
        SimulationMode::Transient => {
            let mut result = match config.method.unwrap_or(SolverMethod::Rk4) {
                SolverMethod::Rk4 => rk4::integrate(net, config, cancel),
                SolverMethod::ImplicitEuler => implicit::integrate(net, config, cancel),
            };
            result.energy_balance_error = audit_energy_balance(net, &result).relative_error;
            Ok(result)
        }
    }
}

/// Re-assert boundary temperatures onto a working state.
pub(crate) fn assert_boundaries(net: &ThermalNetwork, temps: &mut TemperatureMap) {
    for id in net.boundary_ids() {
        let node = net.expect_node(id);
        if node.kind == NodeKind::Boundary {
            if let (Some(fixed), Some(slot)) = (node.boundary_temperature, temps.get_mut(id)) {
                *slot = fixed;
            }
        }
    }
}

fn validate(config: &SimulationConfig) -> Result<(), SimError> {
    if config.tolerance <= 0.0 {
        return Err(SimError::InvalidConfig {
            what: "tolerance must be positive",
        });
    }
    match config.mode {
        SimulationMode::Steady => {
            if config.max_iterations == 0 {
                return Err(SimError::InvalidConfig {
                    what: "max_iterations must be positive",
                });
            }
        }
        SimulationMode::Transient => {
            if config.t_end < config.t_start {
                return Err(SimError::InvalidConfig {
                    what: "t_end must not precede t_start",
                });
            }
            if config.initial_step <= 0.0 {
                return Err(SimError::InvalidConfig {
                    what: "initial_step must be positive",
                });
            }
            if config.min_step <= 0.0 || config.max_step < config.min_step {
                return Err(SimError::InvalidConfig {
                    what: "step bounds must satisfy 0 < min_step <= max_step",
                });
            }
        }
    }
    Ok(())
}
