//! Run the classic 15 riders / 10 vehicles scenario and print the event log,
//! the final status board and per-vehicle statistics.
//!
//! Run with: cargo run -p fleet_core --example scenario_run

use bevy_ecs::prelude::World;
use fleet_core::dispatch::DispatchEngine;
use fleet_core::fleet::Fleet;
use fleet_core::report::{statistics_report, status_report};
use fleet_core::runner::{initialize_simulation, run_until_empty_with_hook, simulation_schedule};
use fleet_core::scenario::{build_scenario, ScenarioParams};

fn main() {
    let params = ScenarioParams::default().with_seed(123);

    let mut world = World::new();
    if let Err(err) = build_scenario(&mut world, &params) {
        eprintln!("invalid scenario: {err}");
        return;
    }
    initialize_simulation(&mut world);

    let mut schedule = simulation_schedule();
    let result = run_until_empty_with_hook(&mut world, &mut schedule, usize::MAX, |world, _| {
        for event in world.resource_mut::<DispatchEngine>().drain_events() {
            println!("{event}");
        }
    });
    let steps = match result {
        Ok(steps) => steps,
        Err(err) => {
            eprintln!("simulation failed: {err}");
            return;
        }
    };

    let clock = world.resource::<fleet_core::clock::SimulationClock>();
    println!("\n--- Scenario run (seed 123): {steps} events, {} ticks ---", clock.now());

    let fleet = world.resource::<Fleet>();
    println!("\nStatus\n{}", status_report(fleet));
    println!("\nStatistics\n{}", statistics_report(fleet));
}
