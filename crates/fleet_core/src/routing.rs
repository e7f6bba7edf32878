//! Route engine: grid paths between two locations, consumed one step per tick.
//!
//! Paths are axis-aligned: every x-step toward the destination first, then every
//! y-step. The origin itself is never part of a path, so a path is exactly
//! `from.distance(to)` locations long and ends on `to`.

use std::collections::VecDeque;
use std::fmt;

use crate::error::RouteError;
use crate::grid::Location;

/// Unit steps from `from` to `to`, x-axis first. Excludes `from`.
pub fn manhattan_path(from: Location, to: Location) -> impl Iterator<Item = Location> {
    let step_x = (to.x - from.x).signum();
    let step_y = (to.y - from.y).signum();
    let x_steps = from.x.abs_diff(to.x) as i32;
    let y_steps = from.y.abs_diff(to.y) as i32;

    let horizontal = (1..=x_steps).map(move |i| Location::new(from.x + i * step_x, from.y));
    let vertical = (1..=y_steps).map(move |i| Location::new(to.x, from.y + i * step_y));
    horizontal.chain(vertical)
}

/// Queue of locations a vehicle still has to visit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    steps: VecDeque<Location>,
}

impl Route {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Path from `from` to `to`; empty when they coincide.
    pub fn between(from: Location, to: Location) -> Self {
        Self {
            steps: manhattan_path(from, to).collect(),
        }
    }

    pub fn has_next(&self) -> bool {
        !self.steps.is_empty()
    }

    /// Pops the head of the route.
    pub fn next_location(&mut self) -> Result<Location, RouteError> {
        self.steps.pop_front().ok_or(RouteError::Empty)
    }

    /// Appends the path from `from` to `to` verbatim.
    ///
    /// The caller picks the anchor. Passing anything other than the route's
    /// tail (or the vehicle position when the route is empty) leaves a jump in
    /// the path; [`Route::extend_to`] picks the anchor itself.
    pub fn append_segment(&mut self, from: Location, to: Location) {
        self.steps.extend(manhattan_path(from, to));
    }

    /// Appends a path to `to` starting at the last queued location, or at
    /// `position` when nothing is queued, so the route stays contiguous.
    pub fn extend_to(&mut self, position: Location, to: Location) {
        let anchor = self.tail().unwrap_or(position);
        self.append_segment(anchor, to);
    }

    /// Last queued location.
    pub fn tail(&self) -> Option<Location> {
        self.steps.back().copied()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> + '_ {
        self.steps.iter()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}
