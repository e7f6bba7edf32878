use bevy_ecs::prelude::World;
use chrono::{Datelike, Local, NaiveDate};
use tracing::info;

use crate::agents::{Driver, DriverId, Gender, Profile, Rider, RiderId};
use crate::clock::SimulationClock;
use crate::dispatch::DispatchEngine;
use crate::error::ConfigError;
use crate::fleet::Fleet;
use crate::grid::Grid;
use crate::random::{RandomSource, SimRng};
use crate::runner::SimulationFault;
use crate::scenario::params::{ScenarioParams, SimulationEndTick};
use crate::vehicle::{Vehicle, VehicleId, VehicleKind};

const MALE_NAMES: [&str; 10] = [
    "John", "Michael", "David", "James", "Robert", "Daniel", "William", "Joseph", "Charles",
    "Matthew",
];
const FEMALE_NAMES: [&str; 10] = [
    "Emily",
    "Jessica",
    "Sarah",
    "Ashley",
    "Amanda",
    "Elizabeth",
    "Samantha",
    "Jennifer",
    "Lauren",
    "Megan",
];
const LAST_NAMES: [&str; 10] = [
    "Smith", "Johnson", "Brown", "Taylor", "Anderson", "Thomas", "Jackson", "White", "Harris",
    "Martin",
];

const FIRST_BIRTH_YEAR: i32 = 1970;
const BIRTH_YEAR_SPAN: u32 = 50;

fn pick<'a, R: RandomSource + ?Sized>(names: &[&'a str], rng: &mut R) -> &'a str {
    names[rng.below(names.len() as u32) as usize]
}

/// Random person born between 1970 and 2019.
pub fn random_profile<R: RandomSource + ?Sized>(rng: &mut R) -> Profile {
    let gender = if rng.coin_flip() {
        Gender::Male
    } else {
        Gender::Female
    };
    let first_name = match gender {
        Gender::Male => pick(&MALE_NAMES, rng),
        Gender::Female => pick(&FEMALE_NAMES, rng),
    };
    let last_name = pick(&LAST_NAMES, rng);

    let year = FIRST_BIRTH_YEAR + rng.below(BIRTH_YEAR_SPAN) as i32;
    let month = rng.below(12) + 1;
    // Day 28 at most, so every month is valid.
    let day = rng.below(28) + 1;
    let birth_date = NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN);

    Profile {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        gender,
        birth_date,
    }
}

/// Kind of the vehicle with 1-based position `number` in the fleet.
pub fn vehicle_kind_for(number: usize, shuttle_every: usize) -> VehicleKind {
    if shuttle_every > 0 && number % shuttle_every == 0 {
        VehicleKind::Shuttle
    } else {
        VehicleKind::Taxi
    }
}

/// Riders 1..=n, then one driver per vehicle, then the vehicles themselves,
/// each parked at a random spot and roaming away from it.
pub fn random_fleet<R: RandomSource + ?Sized>(
    params: &ScenarioParams,
    grid: &Grid,
    rng: &mut R,
) -> Result<Fleet, ConfigError> {
    let rider_count = params.rider_count()?;
    let vehicle_count = params.vehicle_count()?;

    let riders = (1..=rider_count)
        .map(|id| Rider::new(RiderId(id), random_profile(rng)))
        .collect();

    let drivers: Vec<Driver> = (1..=vehicle_count)
        .map(|id| Driver::new(DriverId(id), random_profile(rng)))
        .collect();

    let vehicles = (1..=vehicle_count)
        .zip(drivers)
        .enumerate()
        .map(|(index, (id, driver))| {
            let location = grid.random_location(rng);
            Vehicle::roaming(
                VehicleId(id),
                vehicle_kind_for(index + 1, params.shuttle_every),
                driver,
                location,
                grid,
                rng,
            )
        })
        .collect();

    Ok(Fleet::new(riders, vehicles))
}

/// Inserts every resource a run needs: clock, fleet, dispatch engine, RNG and
/// runtime config. Call [`crate::runner::initialize_simulation`] afterwards.
pub fn build_scenario(world: &mut World, params: &ScenarioParams) -> Result<(), ConfigError> {
    params.validate()?;
    let grid = params.grid()?;

    let mut rng = match params.seed {
        Some(seed) => SimRng::seeded(seed),
        None => SimRng::from_entropy(),
    };
    let current_year = params.current_year.unwrap_or_else(|| Local::now().year());
    let fleet = random_fleet(params, &grid, &mut rng)?;

    info!(
        riders = fleet.riders().len(),
        vehicles = fleet.vehicles().len(),
        width = grid.width(),
        height = grid.height(),
        current_year,
        "scenario built"
    );

    world.insert_resource(SimulationClock::default());
    world.insert_resource(fleet);
    world.insert_resource(DispatchEngine::new(grid, current_year));
    world.insert_resource(rng);
    world.insert_resource(params.simulation_config());
    world.insert_resource(SimulationEndTick(params.max_ticks));
    world.insert_resource(SimulationFault::default());
    Ok(())
}
