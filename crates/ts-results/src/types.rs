//! Result data types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Outcome of one run, transient or steady.
///
/// The per-node and per-conductor series are parallel to `times`: the
/// k-th sample of every series belongs to `times[k]`. A steady run
/// carries exactly one sample. Numerical trouble never raises; it
/// shows up here as `converged = false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Shared, non-decreasing time points (s).
    pub times: Vec<f64>,
    /// Node id -> temperature series (K).
    pub node_temperatures: HashMap<String, Vec<f64>>,
    /// Conductor id -> signed from->to flow series (W).
    pub conductor_flows: HashMap<String, Vec<f64>>,
    /// Relative energy-balance error from the audit (transient runs).
    pub energy_balance_error: f64,
    pub converged: bool,
    /// Newton iterations (steady) or accepted steps (transient).
    pub iterations: usize,
}

/// Energy bookkeeping for a completed transient run.
///
/// Orbital heat loads are not integrated into `external_input`, so
/// runs driven by them are not expected to balance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyReport {
    /// Change in stored energy across all diffusion nodes (J).
    pub stored_delta: f64,
    /// Externally injected energy from constant and time-varying
    /// loads (J).
    pub external_input: f64,
    /// Net energy received from boundary nodes (J).
    pub boundary_exchange: f64,
    /// |input + boundary - stored| over the dominant magnitude.
    pub relative_error: f64,
    /// Whether `relative_error` is below `threshold`.
    pub is_balanced: bool,
    pub threshold: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_serialises_with_parallel_series() {
        let mut node_temperatures = HashMap::new();
        node_temperatures.insert("a".to_string(), vec![300.0, 301.0]);
        let result = SimulationResult {
            times: vec![0.0, 1.0],
            node_temperatures,
            conductor_flows: HashMap::new(),
            energy_balance_error: 0.0,
            converged: true,
            iterations: 1,
        };

        let v = serde_json::to_value(&result).unwrap();
        assert_eq!(v["times"], serde_json::json!([0.0, 1.0]));
        assert_eq!(v["node_temperatures"]["a"], serde_json::json!([300.0, 301.0]));
        assert_eq!(v["converged"], serde_json::json!(true));

        let back: SimulationResult = serde_json::from_value(v).unwrap();
        assert_eq!(back, result);
    }
}
