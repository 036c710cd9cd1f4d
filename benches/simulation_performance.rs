use criterion::{black_box, criterion_group, criterion_main, Criterion};
use junction_sim::{
    arrivals::{ArrivalSource, RandomArrivals},
    config::{ArrivalsConfig, IntersectionConfig, PhaseScope, SignalTiming},
    simulation::Simulation,
};

fn loaded_simulation(scope: PhaseScope) -> (Simulation, RandomArrivals) {
    let config = IntersectionConfig {
        phase_scope: scope,
        ..Default::default()
    };
    let simulation = Simulation::new(&config, SignalTiming::default())
        .expect("Failed to build junction");

    let arrivals = ArrivalsConfig {
        seed: Some(42),
        rate_per_tick: 0.8,
        ..Default::default()
    };
    let source = RandomArrivals::new(&arrivals, simulation.intersection())
        .expect("Failed to build arrival source");

    (simulation, source)
}

fn run_ticks(simulation: &mut Simulation, source: &mut RandomArrivals, ticks: u64) {
    for _ in 0..ticks {
        for arrival in source.next_arrivals(simulation.tick()).unwrap() {
            simulation
                .enqueue_vehicle(&arrival.road_id, &arrival.lane_id, arrival.vehicle)
                .unwrap();
        }
        black_box(simulation.step());
    }
}

fn benchmark_step(c: &mut Criterion) {
    let (mut simulation, mut source) = loaded_simulation(PhaseScope::Lane);

    // Pre-populate with some vehicles for realistic benchmarking
    run_ticks(&mut simulation, &mut source, 200);

    c.bench_function("junction_step", |b| {
        b.iter(|| {
            black_box(simulation.step());
        })
    });
}

fn benchmark_thousand_ticks(c: &mut Criterion) {
    c.bench_function("junction_1000_ticks_road_scope", |b| {
        b.iter(|| {
            let (mut simulation, mut source) = loaded_simulation(PhaseScope::Road);
            run_ticks(&mut simulation, &mut source, 1000);
        })
    });
}

criterion_group!(benches, benchmark_step, benchmark_thousand_ticks);
criterion_main!(benches);
