use anyhow::Result;
use junction_sim::{
    arrivals::{ArrivalGenerator, ArrivalSource, ScriptedArrivals},
    config::{LaneKind, SimulationConfig},
    simulation::{LightState, Simulation, Vehicle},
    SimError,
};

const THREE_ROADS: &str = r#"
[intersection]
roads = ["N", "E", "S"]
lanes = ["priority_capable", "general", "free_turn"]
representative_lane = 1
priority_lane = "EL1"

[timing]
priority_enter_threshold = 3
priority_exit_threshold = 1
min_green = 10
per_vehicle_green = 5

[arrivals]
seed = 9
rate_per_tick = 0.0
per_tick = 2
"#;

#[test]
fn custom_layout_drives_the_scheduler() -> Result<()> {
    let config = SimulationConfig::from_toml_str(THREE_ROADS)?;
    assert_eq!(config.intersection.lanes[2], LaneKind::FreeTurn);

    let mut sim = Simulation::new(&config.intersection, config.timing)?;
    assert_eq!(sim.intersection().priority_lane().id(), "EL1");

    // free-turn lanes flow before the controller ever runs
    assert_eq!(sim.light_state("S", "SL3")?, LightState::Green);

    sim.enqueue_vehicle("S", "SL3", Vehicle::new(1))?;
    let report = sim.step();
    assert_eq!(report.served.len(), 1);
    assert_eq!(sim.current_green(), Some(("N", "NL1")));
    assert_eq!(report.green_duration, 10);

    for id in 10..14 {
        sim.enqueue_vehicle("E", "EL1", Vehicle::new(id))?;
    }
    let report = sim.step();
    assert!(sim.priority_mode());
    assert_eq!(report.green_duration, 20);
    assert_eq!(sim.current_green(), Some(("E", "EL1")));
    assert_eq!(sim.light_state("S", "SL3")?, LightState::Green);
    Ok(())
}

#[test]
fn scripted_arrivals_use_configured_release_rate() -> Result<()> {
    let config = SimulationConfig::from_toml_str(THREE_ROADS)?;
    let sim = Simulation::new(&config.intersection, config.timing)?;

    let script = "1,NL1\n2,EL2\n3,SL3,1\n";
    let mut source = ArrivalGenerator::Scripted(ScriptedArrivals::parse(
        script,
        sim.intersection(),
        config.arrivals.per_tick,
    )?);

    assert_eq!(source.name(), "scripted");
    assert_eq!(source.next_arrivals(0)?.len(), 2);
    assert_eq!(source.next_arrivals(1)?.len(), 1);
    assert!(source.is_exhausted());
    Ok(())
}

#[test]
fn configuration_errors_abort_startup() {
    let cases = [
        ("[intersection]\nroads = []\n", "road"),
        ("[intersection]\npriority_lane = \"\"\n", "priority lane"),
        ("[intersection]\npriority_lane = \"AL3\"\n", "priority-capable"),
        ("[intersection]\nrepresentative_lane = 4\n", "out of range"),
        ("[timing]\npriority_enter_threshold = 3\npriority_exit_threshold = 8\n", "exit threshold"),
        ("[timing]\nmin_green = 0\n", "min_green"),
        ("[timing]\npriority_exit_threshold = 0\n", "exit threshold must be greater than zero"),
        ("[arrivals]\nrate_per_tick = -1.0\n", "Arrival rate"),
        ("[arrivals]\npriority_probability = 1.5\n", "Priority probability"),
    ];

    for (toml, needle) in cases {
        let err = SimulationConfig::from_toml_str(toml).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains(needle), "'{}' not in '{}'", needle, message);
    }
}

#[test]
fn core_rejects_bad_layouts_without_file_validation() {
    let config = junction_sim::config::IntersectionConfig {
        roads: Vec::new(),
        ..Default::default()
    };
    let err = Simulation::new(&config, Default::default()).unwrap_err();
    assert!(matches!(err, SimError::InvalidConfiguration(_)));
}

#[test]
fn unknown_lane_fails_the_call_not_the_run() -> Result<()> {
    let mut sim = Simulation::with_defaults()?;
    sim.enqueue_vehicle("A", "AL2", Vehicle::new(1))?;

    let err = sim.enqueue_vehicle("Q", "QL1", Vehicle::new(2)).unwrap_err();
    assert!(matches!(err, SimError::UnknownLaneOrRoad { .. }));
    assert!(sim.queue_size("Q", "QL1").is_err());

    let report = sim.step();
    assert_eq!(report.served.len(), 1);
    Ok(())
}

#[test]
fn shipped_configuration_is_valid() -> Result<()> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/junction.toml");
    let config = SimulationConfig::load_from_file(path)?;
    Simulation::new(&config.intersection, config.timing)?;
    Ok(())
}
