//! Building a full network with an orbit attached.

use chrono::{TimeZone, Utc};
use ts_network::{
    build_network, ConductorKind, ConductorSpec, HeatLoadKind, HeatLoadSpec, NetworkError,
    NodeSpec, OrbitalSpec, SurfaceKind,
};

fn leo_orbit() -> OrbitalSpec {
    OrbitalSpec {
        altitude_km: Some(400.0),
        apogee_km: None,
        perigee_km: None,
        inclination_deg: 51.6,
        raan_deg: 0.0,
        epoch: Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap(),
        attitude: None,
    }
}

#[test]
fn orbit_attaches_environment_and_profile() {
    let nodes = vec![NodeSpec::diffusion("panel", "Panel", 500.0, 290.0)];
    let loads = vec![HeatLoadSpec {
        id: "sun".into(),
        node_id: "panel".into(),
        kind: HeatLoadKind::Orbital {
            absorptivity: 0.9,
            emissivity: 0.85,
            area: 0.5,
            surface: SurfaceKind::Solar,
        },
    }];

    let net = build_network(nodes, vec![], loads, Some(leo_orbit())).unwrap();
    let orbit = net.orbit().expect("orbit context");
    assert!(orbit.environment.period_s > 5000.0);
    assert_eq!(orbit.profile.len(), 360);
    assert_eq!(orbit.profile.period_s, orbit.environment.period_s);
}

#[test]
fn invalid_orbit_fails_the_build() {
    let nodes = vec![NodeSpec::diffusion("panel", "Panel", 500.0, 290.0)];
    let mut orbit = leo_orbit();
    orbit.altitude_km = Some(-100.0);
    assert!(matches!(
        build_network(nodes, vec![], vec![], Some(orbit)).unwrap_err(),
        NetworkError::InvalidOrbital(_)
    ));
}

#[test]
fn network_is_cheap_to_share_and_never_mutated() {
    let nodes = vec![
        NodeSpec::diffusion("a", "A", 100.0, 300.0),
        NodeSpec::boundary("space", "Space", 4.0),
    ];
    let conductors = vec![ConductorSpec {
        id: "rad".into(),
        name: "to space".into(),
        node_from: "a".into(),
        node_to: "space".into(),
        kind: ConductorKind::Radiation {
            area: 1.0,
            view_factor: 1.0,
            emissivity: 0.9,
        },
    }];
    let net = build_network(nodes, conductors, vec![], None).unwrap();

    // A run's working state is an owned map; the network itself stays
    // fixed behind a shared reference.
    let mut temps = net.initial_temperatures();
    temps.insert("a".into(), 100.0);
    assert_eq!(net.initial_temperatures()["a"], 300.0);
}
