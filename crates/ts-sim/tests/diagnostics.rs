//! Diagnostic paths: degraded inputs run to completion and log
//! instead of raising.

use ts_network::{
    build_network, ConductorKind, ConductorSpec, NodeSpec, SimulationConfig, SimulationMode,
    SolverMethod,
};
use ts_sim::run;

#[test]
fn empty_heat_pipe_curve_runs_and_conducts_nothing() {
    // Capture the solver's structured diagnostics so the degraded
    // curve is visible in test output.
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let nodes = vec![
        NodeSpec::boundary("hot", "Hot", 350.0),
        NodeSpec::diffusion("cold", "Cold", 100.0, 250.0),
    ];
    let conductors = vec![ConductorSpec {
        id: "hp".into(),
        name: "unfilled pipe".into(),
        node_from: "hot".into(),
        node_to: "cold".into(),
        kind: ConductorKind::HeatPipe { curve: vec![] },
    }];
    let net = build_network(nodes, conductors, vec![], None).unwrap();

    let config = SimulationConfig {
        mode: SimulationMode::Transient,
        method: Some(SolverMethod::Rk4),
        t_start: 0.0,
        t_end: 100.0,
        initial_step: 1.0,
        min_step: 1e-3,
        max_step: 50.0,
        max_iterations: 100,
        tolerance: 1e-3,
    };
    let result = run(&net, &config).unwrap();

    // Zero conductance: the cold side never moves.
    assert!(result.converged);
    assert!(result.node_temperatures["cold"].iter().all(|&t| t == 250.0));
    assert!(result.conductor_flows["hp"].iter().all(|&q| q == 0.0));
}
