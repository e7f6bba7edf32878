//! Grid geometry: integer locations, Manhattan distance, and random sampling
//! of points inside the simulated map.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::random::RandomSource;

/// Minimum Manhattan separation for sampled pickup/dropoff pairs and for the
/// pooling proximity check.
pub const MINIMUM_DISTANCE: u32 = 3;

/// Smallest grid side that still guarantees a point `MINIMUM_DISTANCE` away
/// from any location on the map.
const MIN_GRID_SIDE: u32 = 4;

/// Largest grid side whose coordinates still fit in an `i32`.
const MAX_GRID_SIDE: u32 = i32::MAX as u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance (`|dx| + |dy|`).
    pub fn distance(self, other: Location) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Bounds of the simulated map. Locations live in `[0, width) x [0, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: u32,
    height: u32,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
        }
    }
}

impl Grid {
    pub fn new(width: u32, height: u32) -> Result<Self, ConfigError> {
        if width < MIN_GRID_SIDE || height < MIN_GRID_SIDE {
            return Err(ConfigError::GridTooSmall {
                width,
                height,
                min_side: MIN_GRID_SIDE,
            });
        }
        if width > MAX_GRID_SIDE || height > MAX_GRID_SIDE {
            return Err(ConfigError::GridTooLarge {
                width,
                height,
                max_side: MAX_GRID_SIDE,
            });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, location: Location) -> bool {
        location.x >= 0
            && location.y >= 0
            && (location.x as u32) < self.width
            && (location.y as u32) < self.height
    }

    /// Uniform location anywhere on the map.
    pub fn random_location<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Location {
        let x = rng.below(self.width) as i32;
        let y = rng.below(self.height) as i32;
        Location::new(x, y)
    }

    /// Uniform location at least [`MINIMUM_DISTANCE`] away from `from`.
    ///
    /// Rejection sampling; terminates because [`Grid::new`] refuses maps too
    /// small to hold such a point.
    pub fn random_location_away<R: RandomSource + ?Sized>(
        &self,
        from: Location,
        rng: &mut R,
    ) -> Location {
        loop {
            let candidate = self.random_location(rng);
            if candidate.distance(from) >= MINIMUM_DISTANCE {
                return candidate;
            }
        }
    }
}
