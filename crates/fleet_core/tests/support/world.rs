#![allow(dead_code)]

use bevy_ecs::prelude::World;
use fleet_core::clock::SimulationClock;
use fleet_core::dispatch::DispatchEngine;
use fleet_core::fleet::Fleet;
use fleet_core::grid::Grid;
use fleet_core::random::SimRng;
use fleet_core::runner::SimulationFault;
use fleet_core::scenario::{SimulationConfig, SimulationEndTick};
use fleet_core::test_helpers::TEST_YEAR;

/// Builder configuration for reproducible test worlds.
#[derive(Clone, Debug)]
pub struct TestWorldConfig {
    pub seed: u64,
    pub grid: Grid,
    pub current_year: i32,
    pub initial_requests: u32,
    pub request_probability: f64,
    pub end_tick: Option<u64>,
}

impl Default for TestWorldConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            grid: Grid::default(),
            current_year: TEST_YEAR,
            initial_requests: 0,
            request_probability: 0.0,
            end_tick: None,
        }
    }
}

/// Helper that populates the ECS world with all shared resources used in integration tests.
#[derive(Debug, Default)]
pub struct TestWorldBuilder {
    config: TestWorldConfig,
    fleet: Fleet,
}

impl TestWorldBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn with_fleet(mut self, fleet: Fleet) -> Self {
        self.fleet = fleet;
        self
    }

    /// Number of `RideRequest` events scheduled when the simulation starts.
    pub fn with_initial_requests(mut self, count: u32) -> Self {
        self.config.initial_requests = count;
        self
    }

    pub fn with_request_probability(mut self, probability: f64) -> Self {
        self.config.request_probability = probability;
        self
    }

    pub fn with_end_tick(mut self, tick: u64) -> Self {
        self.config.end_tick = Some(tick);
        self
    }

    /// Build the ECS world with the configured resources.
    pub fn build(self) -> World {
        let TestWorldConfig {
            seed,
            grid,
            current_year,
            initial_requests,
            request_probability,
            end_tick,
        } = self.config;

        let mut world = World::new();
        world.insert_resource(SimulationClock::default());
        world.insert_resource(self.fleet);
        world.insert_resource(DispatchEngine::new(grid, current_year));
        world.insert_resource(SimRng::seeded(seed));
        world.insert_resource(SimulationConfig {
            initial_requests,
            request_probability,
        });
        world.insert_resource(SimulationFault::default());
        if let Some(tick) = end_tick {
            world.insert_resource(SimulationEndTick(tick));
        }
        world
    }
}
