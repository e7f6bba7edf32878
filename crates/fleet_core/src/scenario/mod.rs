//! Scenario setup: a random rider roster and fleet on a rectangular grid,
//! plus the runtime knobs the event systems read.

mod build;
mod params;

pub use build::{build_scenario, random_fleet, random_profile, vehicle_kind_for};
pub use params::{ScenarioParams, SimulationConfig, SimulationEndTick};
