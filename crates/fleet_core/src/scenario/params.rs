use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::grid::Grid;

const DEFAULT_NUM_RIDERS: usize = 15;
const DEFAULT_NUM_VEHICLES: usize = 10;
const DEFAULT_SHUTTLE_EVERY: usize = 3;
const DEFAULT_GRID_SIDE: u32 = 10;
const DEFAULT_INITIAL_REQUESTS: u32 = 5;
const DEFAULT_REQUEST_PROBABILITY: f64 = 0.25;
const DEFAULT_MAX_TICKS: u64 = 100_000;

/// Knobs the runtime systems read while the simulation runs.
#[derive(Debug, Clone, Copy, PartialEq, Resource)]
pub struct SimulationConfig {
    /// `RideRequest` events scheduled at t=0.
    pub initial_requests: u32,
    /// Chance, per tick, of one more `RideRequest`.
    pub request_probability: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_requests: DEFAULT_INITIAL_REQUESTS,
            request_probability: DEFAULT_REQUEST_PROBABILITY,
        }
    }
}

/// Last tick the runner will process. Events scheduled after it are left in
/// the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Resource)]
pub struct SimulationEndTick(pub u64);

/// Everything needed to build a run. Missing JSON fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioParams {
    pub num_riders: usize,
    pub num_vehicles: usize,
    /// Every n-th vehicle (1-based) is a shuttle; 0 means an all-taxi fleet.
    pub shuttle_every: usize,
    pub width: u32,
    pub height: u32,
    /// RNG seed. None draws one from the OS.
    pub seed: Option<u64>,
    pub initial_requests: u32,
    pub request_probability: f64,
    pub max_ticks: u64,
    /// Year used for age checks. None uses the wall-clock year.
    pub current_year: Option<i32>,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            num_riders: DEFAULT_NUM_RIDERS,
            num_vehicles: DEFAULT_NUM_VEHICLES,
            shuttle_every: DEFAULT_SHUTTLE_EVERY,
            width: DEFAULT_GRID_SIDE,
            height: DEFAULT_GRID_SIDE,
            seed: None,
            initial_requests: DEFAULT_INITIAL_REQUESTS,
            request_probability: DEFAULT_REQUEST_PROBABILITY,
            max_ticks: DEFAULT_MAX_TICKS,
            current_year: None,
        }
    }
}

impl ScenarioParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_riders(mut self, num_riders: usize) -> Self {
        self.num_riders = num_riders;
        self
    }

    pub fn with_vehicles(mut self, num_vehicles: usize) -> Self {
        self.num_vehicles = num_vehicles;
        self
    }

    pub fn with_shuttle_every(mut self, shuttle_every: usize) -> Self {
        self.shuttle_every = shuttle_every;
        self
    }

    pub fn with_grid(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_initial_requests(mut self, initial_requests: u32) -> Self {
        self.initial_requests = initial_requests;
        self
    }

    pub fn with_request_probability(mut self, probability: f64) -> Self {
        self.request_probability = probability;
        self
    }

    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = Some(year);
        self
    }

    pub fn grid(&self) -> Result<Grid, ConfigError> {
        Grid::new(self.width, self.height)
    }

    pub fn rider_count(&self) -> Result<u32, ConfigError> {
        u32::try_from(self.num_riders).map_err(|_| ConfigError::TooMany {
            what: "riders",
            count: self.num_riders,
        })
    }

    pub fn vehicle_count(&self) -> Result<u32, ConfigError> {
        u32::try_from(self.num_vehicles).map_err(|_| ConfigError::TooMany {
            what: "vehicles",
            count: self.num_vehicles,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid()?;
        self.rider_count()?;
        self.vehicle_count()?;
        if !(0.0..=1.0).contains(&self.request_probability) {
            return Err(ConfigError::RequestProbability(self.request_probability));
        }
        if self.num_vehicles == 0 {
            return Err(ConfigError::EmptyFleet);
        }
        Ok(())
    }

    pub fn simulation_config(&self) -> SimulationConfig {
        SimulationConfig {
            initial_requests: self.initial_requests,
            request_probability: self.request_probability,
        }
    }
}
