//! Time-series recording shared by both integrators.

use std::collections::HashMap;

use ts_network::{TemperatureMap, ThermalNetwork};
use ts_results::SimulationResult;
use ts_solver::conductor_flow;

/// Accumulates the shared time axis plus per-node temperature and
/// per-conductor flow series, all appended in lockstep.
pub(crate) struct Recorder<'a> {
    net: &'a ThermalNetwork,
    times: Vec<f64>,
    node_temperatures: HashMap<String, Vec<f64>>,
    conductor_flows: HashMap<String, Vec<f64>>,
}

impl<'a> Recorder<'a> {
    pub fn new(net: &'a ThermalNetwork) -> Self {
        let node_temperatures = net
            .node_order()
            .iter()
            .map(|id| (id.clone(), Vec::new()))
            .collect();
        let conductor_flows = net
            .conductors()
            .iter()
            .map(|c| (c.id.clone(), Vec::new()))
            .collect();
        Self {
            net,
            times: Vec::new(),
            node_temperatures,
            conductor_flows,
        }
    }

    /// Append one sample at time `t` from the accepted state.
    pub fn record(&mut self, t: f64, temps: &TemperatureMap) {
        self.times.push(t);
        for id in self.net.node_order() {
            if let Some(series) = self.node_temperatures.get_mut(id) {
                series.push(temps[id]);
            }
        }
        for conductor in self.net.conductors() {
            let flow = conductor_flow(
                conductor,
                temps[&conductor.node_from],
                temps[&conductor.node_to],
            );
            if let Some(series) = self.conductor_flows.get_mut(&conductor.id) {
                series.push(flow);
            }
        }
    }

    pub fn into_result(self, converged: bool, iterations: usize) -> SimulationResult {
        SimulationResult {
            times: self.times,
            node_temperatures: self.node_temperatures,
            conductor_flows: self.conductor_flows,
            energy_balance_error: 0.0,
            converged,
            iterations,
        }
    }
}
