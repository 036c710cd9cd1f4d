use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};

use junction_sim::{
    arrivals::{generate_script, ArrivalGenerator, ArrivalSource, RandomArrivals, ScriptedArrivals},
    config::SimulationConfig,
    simulation::{Metrics, Simulation, StepTimings},
};

#[derive(Parser)]
#[command(name = "junction-sim")]
#[command(about = "Four-road junction signal scheduling simulation")]
struct Args {
    /// Junction configuration file
    #[arg(short, long, default_value = "junction.toml")]
    config: String,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 1000)]
    ticks: u64,

    /// Random seed for reproducible arrivals (overrides the config file)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Replay arrivals from a vehicle file instead of generating them
    #[arg(short, long)]
    arrivals: Option<String>,

    /// Write a random vehicle file to this path and exit
    #[arg(long)]
    generate: Option<String>,

    /// Vehicles to write with --generate
    #[arg(long, default_value_t = 100)]
    count: usize,

    /// Real-time delay per tick in milliseconds
    #[arg(long, default_value_t = 0)]
    tick_ms: u64,

    /// Log a status line every N ticks
    #[arg(long, default_value_t = 100)]
    status_every: u64,

    /// Enable verbose logging for detailed phase changes
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(if args.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info })
        .init();

    let mut config = if std::path::Path::new(&args.config).exists() {
        info!("Loading junction configuration from: {}", &args.config);
        SimulationConfig::load_from_file(&args.config)?
    } else {
        info!("No configuration at '{}', using the default four-road junction", &args.config);
        SimulationConfig::default()
    };
    if let Some(seed) = args.seed {
        config.arrivals.seed = Some(seed);
    }

    if let Some(path) = &args.generate {
        return write_vehicle_file(path, args.count, &config);
    }

    let mut simulation = Simulation::new(&config.intersection, config.timing)
        .context("Failed to set up the junction")?;
    info!(
        "Junction ready: {} roads, {} lanes per road, priority lane {}",
        config.intersection.roads.len(),
        config.intersection.lanes.len(),
        config.intersection.priority_lane
    );

    let mut source = match &args.arrivals {
        Some(path) => ArrivalGenerator::Scripted(ScriptedArrivals::load_from_file(
            path,
            simulation.intersection(),
            config.arrivals.per_tick,
        )?),
        None => ArrivalGenerator::Random(RandomArrivals::new(
            &config.arrivals,
            simulation.intersection(),
        )?),
    };
    info!("Arrival source: {}", source.name());

    let mut metrics = Metrics::new();
    let mut timings = StepTimings::new(120);
    let tick_delay = Duration::from_millis(args.tick_ms);
    let start_time = Instant::now();

    info!("Running simulation for {} ticks...", args.ticks);

    for _ in 0..args.ticks {
        // Arrivals land between ticks, never inside one
        for arrival in source.next_arrivals(simulation.tick())? {
            let vehicle = arrival.vehicle.clone();
            match simulation.enqueue_vehicle(&arrival.road_id, &arrival.lane_id, arrival.vehicle) {
                Ok(()) => metrics.record_arrival(simulation.tick(), &vehicle),
                Err(e) => warn!("Dropped arrival {} for {}: {}", vehicle, arrival.lane_id, e),
            }
        }

        timings.start_step();
        let report = simulation.step();
        timings.end_step();

        metrics.record(&report);
        metrics.observe_queued(simulation.total_queued());

        if report.phase_changed {
            debug!(
                "Tick {}: {} mode, green {} for {} ticks",
                report.tick,
                report.mode,
                report.current_green.as_deref().unwrap_or("-"),
                report.green_duration
            );
        }

        if args.status_every > 0 && report.tick % args.status_every == 0 {
            info!(
                "Tick {}: {} mode, green {}, {} queued, {} served",
                report.tick,
                report.mode,
                report.current_green.as_deref().unwrap_or("-"),
                simulation.total_queued(),
                metrics.total_served()
            );
        }

        if source.is_exhausted() && simulation.total_queued() == 0 {
            info!("All scripted vehicles served at tick {}", report.tick);
            break;
        }

        if !tick_delay.is_zero() {
            let elapsed = timings.last_step_time();
            if elapsed < tick_delay {
                std::thread::sleep(tick_delay - elapsed);
            }
        }
    }

    // Final statistics
    let summary = metrics.summary();
    info!("Simulation completed!");
    info!("Total time: {:.2}s", start_time.elapsed().as_secs_f64());
    info!("Ticks simulated: {}", simulation.tick());
    info!("Average step time: {:?}", timings.average_step_time());
    info!("Vehicles arrived: {}", summary.arrived);
    info!("Total vehicles processed: {}", summary.served);
    info!("Average wait: {:.1} ticks", summary.average_wait);
    info!("Peak queued: {}", summary.peak_queued);
    info!("Priority episodes: {}", summary.priority_entries);
    info!("Phase changes: {}", summary.phase_changes);
    for (lane, served) in &summary.served_per_lane {
        info!("  {}: {} served", lane, served);
    }
    info!("Still queued: {}", simulation.total_queued());

    Ok(())
}

fn write_vehicle_file(path: &str, count: usize, config: &SimulationConfig) -> Result<()> {
    let lanes = if config.arrivals.lanes.is_empty() {
        config.intersection.lane_ids()
    } else {
        config.arrivals.lanes.clone()
    };

    let mut rng = match config.arrivals.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let script = generate_script(count, &lanes, config.arrivals.priority_probability, &mut rng)?;
    std::fs::write(path, script).with_context(|| format!("Failed to write vehicle file '{}'", path))?;
    info!("Wrote {} vehicles to {}", count, path);
    Ok(())
}
