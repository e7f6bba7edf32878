use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bevy_ecs::prelude::World;
use clap::Parser;
use tracing::{info, Level};

use fleet_core::clock::{EventKind, SimulationClock};
use fleet_core::dispatch::DispatchEngine;
use fleet_core::fleet::Fleet;
use fleet_core::report::{fleet_summaries, statistics_report, status_report};
use fleet_core::runner::{initialize_simulation, run_until_empty_with_hook, simulation_schedule};
use fleet_core::scenario::{build_scenario, ScenarioParams};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "fleet",
    about = "Ride-hailing fleet dispatch simulation on a grid",
    long_about = "Builds a random rider roster and fleet, runs the tick loop until every\n\
                  ride has finished, and prints the ride events and per-vehicle statistics."
)]
struct Cli {
    /// Scenario parameters as JSON; flags below override its fields
    #[arg(long, env = "FLEET_PARAMS")]
    params: Option<PathBuf>,
    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
    /// Number of riders on the roster
    #[arg(long)]
    riders: Option<usize>,
    /// Number of vehicles in the fleet
    #[arg(long)]
    vehicles: Option<usize>,
    /// Every n-th vehicle is a shuttle (0 for taxis only)
    #[arg(long)]
    shuttle_every: Option<usize>,
    /// Last tick to process
    #[arg(long)]
    max_ticks: Option<u64>,
    /// Print the status board after every tick
    #[arg(long)]
    show_status: bool,
    /// Print final statistics as JSON instead of text
    #[arg(long)]
    json: bool,
    /// Print the effective parameters and exit
    #[arg(long)]
    dump_params: bool,
    /// Log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    fn scenario_params(&self) -> Result<ScenarioParams> {
        let mut params = match &self.params {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => ScenarioParams::default(),
        };
        if let Some(seed) = self.seed {
            params = params.with_seed(seed);
        }
        if let Some(riders) = self.riders {
            params = params.with_riders(riders);
        }
        if let Some(vehicles) = self.vehicles {
            params = params.with_vehicles(vehicles);
        }
        if let Some(every) = self.shuttle_every {
            params = params.with_shuttle_every(every);
        }
        if let Some(max_ticks) = self.max_ticks {
            params = params.with_max_ticks(max_ticks);
        }
        Ok(params)
    }
}

// ── Main ───────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .init();

    let params = cli.scenario_params()?;
    if cli.dump_params {
        println!("{}", serde_json::to_string_pretty(&params)?);
        return Ok(());
    }

    let mut world = World::new();
    build_scenario(&mut world, &params).context("building scenario")?;
    initialize_simulation(&mut world);

    let show_status = cli.show_status;
    let mut schedule = simulation_schedule();
    let steps = run_until_empty_with_hook(&mut world, &mut schedule, usize::MAX, |world, event| {
        for ride_event in world.resource_mut::<DispatchEngine>().drain_events() {
            println!("{ride_event}");
        }
        if show_status && event.kind == EventKind::MoveStep {
            println!(
                "\nStatus at tick {}\n{}\n",
                event.timestamp,
                status_report(world.resource::<Fleet>())
            );
        }
    })
    .context("simulation failed")?;

    let ticks = world.resource::<SimulationClock>().now();
    info!(steps, ticks, "simulation finished");

    let fleet = world.resource::<Fleet>();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&fleet_summaries(fleet))?);
    } else {
        println!("\nStatistics\n{}", statistics_report(fleet));
    }
    Ok(())
}
