//! Transient integration scenarios shared by both integrators.

use ts_network::{
    build_network, ConductorKind, ConductorSpec, HeatLoadKind, HeatLoadSpec, NodeSpec,
    SimulationConfig, SimulationMode, SolverMethod, ThermalNetwork,
};
use ts_sim::{run, run_with_cancel};

fn strap(id: &str, from: &str, to: &str, g: f64) -> ConductorSpec {
    ConductorSpec {
        id: id.into(),
        name: id.into(),
        node_from: from.into(),
        node_to: to.into(),
        kind: ConductorKind::Linear { conductance: g },
    }
}

fn bridge_network() -> ThermalNetwork {
    let nodes = vec![
        NodeSpec::boundary("hot", "Hot", 400.0),
        NodeSpec::diffusion("mid", "Mid", 100.0, 200.0),
        NodeSpec::boundary("cold", "Cold", 300.0),
    ];
    let conductors = vec![
        strap("g1", "hot", "mid", 1.0),
        strap("g2", "mid", "cold", 1.0),
    ];
    build_network(nodes, conductors, vec![], None).unwrap()
}

fn transient_config(method: SolverMethod, t_end: f64) -> SimulationConfig {
    SimulationConfig {
        mode: SimulationMode::Transient,
        method: Some(method),
        t_start: 0.0,
        t_end,
        initial_step: 1.0,
        min_step: 1e-3,
        max_step: 100.0,
        max_iterations: 100,
        tolerance: 1e-3,
    }
}

#[test]
fn bridge_converges_to_the_midpoint_rk4() {
    let net = bridge_network();
    let result = run(&net, &transient_config(SolverMethod::Rk4, 10_000.0)).unwrap();

    assert!(result.converged);
    let series = &result.node_temperatures["mid"];
    assert!((series.last().unwrap() - 350.0).abs() < 1.0);
    // Started cold, monotone warming toward the midpoint.
    assert_eq!(series[0], 200.0);
    assert!(series.windows(2).all(|w| w[1] >= w[0] - 1e-9));
}

#[test]
fn bridge_converges_to_the_midpoint_implicit() {
    let net = bridge_network();
    let result = run(&net, &transient_config(SolverMethod::ImplicitEuler, 10_000.0)).unwrap();

    assert!(result.converged);
    assert!((result.node_temperatures["mid"].last().unwrap() - 350.0).abs() < 1.0);
}

#[test]
fn boundary_temperatures_are_exact_at_every_sample() {
    let net = bridge_network();
    for method in [SolverMethod::Rk4, SolverMethod::ImplicitEuler] {
        let result = run(&net, &transient_config(method, 500.0)).unwrap();
        assert!(result.node_temperatures["hot"].iter().all(|&t| t == 400.0));
        assert!(result.node_temperatures["cold"].iter().all(|&t| t == 300.0));
    }
}

#[test]
fn time_points_never_decrease() {
    let net = bridge_network();
    for method in [SolverMethod::Rk4, SolverMethod::ImplicitEuler] {
        let result = run(&net, &transient_config(method, 1_000.0)).unwrap();
        assert!(result.times.windows(2).all(|w| w[1] >= w[0]));
        assert_eq!(result.times[0], 0.0);
        let final_t = *result.times.last().unwrap();
        assert!((final_t - 1_000.0).abs() < 1e-6);
    }
}

#[test]
fn swapping_a_linear_conductor_is_invisible() {
    let nodes = || {
        vec![
            NodeSpec::diffusion("a", "A", 80.0, 360.0),
            NodeSpec::diffusion("b", "B", 120.0, 250.0),
        ]
    };
    let forward = build_network(nodes(), vec![strap("g", "a", "b", 0.7)], vec![], None).unwrap();
    let swapped = build_network(nodes(), vec![strap("g", "b", "a", 0.7)], vec![], None).unwrap();

    let config = transient_config(SolverMethod::Rk4, 600.0);
    let lhs = run(&forward, &config).unwrap();
    let rhs = run(&swapped, &config).unwrap();

    assert_eq!(lhs.times, rhs.times);
    assert_eq!(lhs.node_temperatures["a"], rhs.node_temperatures["a"]);
    assert_eq!(lhs.node_temperatures["b"], rhs.node_temperatures["b"]);
}

#[test]
fn closed_network_conserves_energy() {
    let nodes = vec![
        NodeSpec::diffusion("a", "A", 50.0, 350.0),
        NodeSpec::diffusion("b", "B", 100.0, 250.0),
    ];
    let net = build_network(nodes, vec![strap("g", "a", "b", 2.0)], vec![], None).unwrap();
    let result = run(&net, &transient_config(SolverMethod::Rk4, 2_000.0)).unwrap();

    let energy_at = |k: usize| {
        50.0 * result.node_temperatures["a"][k] + 100.0 * result.node_temperatures["b"][k]
    };
    let initial = energy_at(0);
    for k in 0..result.times.len() {
        let drift = (energy_at(k) - initial).abs() / initial.abs();
        assert!(drift < 1e-6, "drift {drift} at sample {k}");
    }
}

#[test]
fn closed_network_conservation_implicit_is_looser() {
    let nodes = vec![
        NodeSpec::diffusion("a", "A", 50.0, 350.0),
        NodeSpec::diffusion("b", "B", 100.0, 250.0),
    ];
    let net = build_network(nodes, vec![strap("g", "a", "b", 2.0)], vec![], None).unwrap();
    let result = run(&net, &transient_config(SolverMethod::ImplicitEuler, 2_000.0)).unwrap();

    let energy_at = |k: usize| {
        50.0 * result.node_temperatures["a"][k] + 100.0 * result.node_temperatures["b"][k]
    };
    let initial = energy_at(0);
    let last = energy_at(result.times.len() - 1);
    // The diagonal Newton stops at a finite update tolerance, so the
    // implicit path only conserves to that order.
    assert!((last - initial).abs() / initial.abs() < 1e-4);
}

#[test]
fn arithmetic_node_tracks_the_transient() {
    // hot boundary -- G -- arithmetic -- G -- diffusion
    let nodes = vec![
        NodeSpec::boundary("hot", "Hot", 400.0),
        NodeSpec::arithmetic("joint", "Joint"),
        NodeSpec::diffusion("tank", "Tank", 200.0, 300.0),
    ];
    let conductors = vec![
        strap("g1", "hot", "joint", 2.0),
        strap("g2", "joint", "tank", 2.0),
    ];
    let net = build_network(nodes, conductors, vec![], None).unwrap();
    let result = run(&net, &transient_config(SolverMethod::Rk4, 5_000.0)).unwrap();

    // Everything settles at the boundary temperature, the joint
    // halfway between its neighbours along the way.
    let joint = &result.node_temperatures["joint"];
    let tank = &result.node_temperatures["tank"];
    assert!((tank.last().unwrap() - 400.0).abs() < 1.0);
    assert!((joint.last().unwrap() - 400.0).abs() < 1.0);
    for k in 0..result.times.len() {
        let expected = 0.5 * (400.0 + tank[k]);
        assert!((joint[k] - expected).abs() < 0.01, "sample {k}");
    }
}

#[test]
fn heat_pipe_conductor_warms_the_sink_side() {
    let curve = vec![
        ts_network::CurvePoint { temperature: 250.0, conductance: 0.5 },
        ts_network::CurvePoint { temperature: 350.0, conductance: 5.0 },
    ];
    let nodes = vec![
        NodeSpec::boundary("hot", "Hot", 350.0),
        NodeSpec::diffusion("cold", "Cold", 150.0, 250.0),
    ];
    let conductors = vec![ConductorSpec {
        id: "hp".into(),
        name: "pipe".into(),
        node_from: "hot".into(),
        node_to: "cold".into(),
        kind: ConductorKind::HeatPipe { curve },
    }];
    let net = build_network(nodes, conductors, vec![], None).unwrap();
    let result = run(&net, &transient_config(SolverMethod::Rk4, 2_000.0)).unwrap();

    let series = &result.node_temperatures["cold"];
    assert!(series.last().unwrap() > &340.0);
    // Near equilibrium the step controller rides the tolerance, so
    // allow wiggle at that order.
    assert!(series.windows(2).all(|w| w[1] >= w[0] - 2e-3));
}

#[test]
fn implicit_euler_strides_over_a_stiff_coupling() {
    let nodes = vec![
        NodeSpec::diffusion("chip", "Chip", 1.0, 400.0),
        NodeSpec::boundary("plate", "Plate", 300.0),
    ];
    let net = build_network(nodes, vec![strap("g", "chip", "plate", 100.0)], vec![], None).unwrap();

    let config = transient_config(SolverMethod::ImplicitEuler, 10.0);
    let result = run(&net, &config).unwrap();
    assert!(result.converged);
    assert!((result.node_temperatures["chip"].last().unwrap() - 300.0).abs() < 0.1);
    // Iteration-count control keeps the step count far below t_end/tau.
    assert!(result.iterations < 200, "took {} steps", result.iterations);
}

#[test]
fn constant_load_balances_conduction() {
    // Scenario: heat into a node leaks through a strap to a boundary.
    let nodes = vec![
        NodeSpec::diffusion("box", "Box", 100.0, 290.0),
        NodeSpec::boundary("sink", "Sink", 200.0),
    ];
    let loads = vec![HeatLoadSpec {
        id: "q".into(),
        node_id: "box".into(),
        kind: HeatLoadKind::Constant { value: 100.0 },
    }];
    let net = build_network(nodes, vec![strap("g", "box", "sink", 10.0)], loads, None).unwrap();

    for method in [SolverMethod::Rk4, SolverMethod::ImplicitEuler] {
        let result = run(&net, &transient_config(method, 1_000.0)).unwrap();
        assert!((result.node_temperatures["box"].last().unwrap() - 210.0).abs() < 0.05);
    }
}

#[test]
fn time_varying_load_follows_its_profile() {
    let nodes = vec![NodeSpec::diffusion("box", "Box", 10.0, 300.0)];
    let loads = vec![HeatLoadSpec {
        id: "ramp".into(),
        node_id: "box".into(),
        kind: HeatLoadKind::TimeVarying {
            points: vec![
                ts_network::LoadPoint { time: 0.0, value: 0.0 },
                ts_network::LoadPoint { time: 100.0, value: 10.0 },
            ],
        },
    }];
    let net = build_network(nodes, vec![], loads, None).unwrap();
    let mut config = transient_config(SolverMethod::Rk4, 100.0);
    config.max_step = 10.0;
    let result = run(&net, &config).unwrap();

    // Integrated ramp: dT = (1/C) * integral of q dt = 500/10 = 50 K.
    let series = &result.node_temperatures["box"];
    assert!((series.last().unwrap() - 350.0).abs() < 0.1);
}

#[test]
fn cancellation_returns_partial_series() {
    let net = bridge_network();
    let cancel = ts_core::CancelToken::new();
    cancel.cancel();

    let result = run_with_cancel(
        &net,
        &transient_config(SolverMethod::Rk4, 10_000.0),
        &cancel,
    )
    .unwrap();
    assert!(!result.converged);
    assert_eq!(result.times.len(), 1);
    assert_eq!(result.iterations, 0);
}
