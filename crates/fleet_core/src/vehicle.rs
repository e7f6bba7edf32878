//! Vehicle state machine.
//!
//! A vehicle roams freely until dispatch hands it a ride, drives to the pickup,
//! then serves one dropoff after another. Pooled riders add extra stops that are
//! served in the order they joined.
//!
//! ```text
//!  Free --pick_service--> Pickup --start_service--> Service --end_service--> Free
//!                                                     |  ^
//!                                                     +--+ continue_after_dropoff
//!                                                          (next pooled stop)
//! ```
//!
//! Arrivals are returned from [`Vehicle::advance`] rather than dispatched from
//! inside the vehicle; the dispatch engine reacts to them and calls back into
//! the next transition.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::agents::{Driver, RiderId};
use crate::error::{VehicleError, VehicleResult};
use crate::grid::{Grid, Location};
use crate::random::RandomSource;
use crate::ride::{Ride, RideKind, SharedRide};
use crate::routing::Route;
use crate::statistics::Statistics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VehicleId(pub u32);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleKind {
    Taxi,
    Shuttle,
}

impl VehicleKind {
    /// Multiplier applied on top of a ride's fare basis.
    pub fn fare_multiplier(&self) -> f64 {
        match self {
            VehicleKind::Taxi => 2.0,
            VehicleKind::Shuttle => 1.5,
        }
    }

    /// Only taxis take on pooled riders mid-ride.
    pub fn accepts_pooling(&self) -> bool {
        matches!(self, VehicleKind::Taxi)
    }
}

impl fmt::Display for VehicleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleKind::Taxi => f.write_str("Taxi"),
            VehicleKind::Shuttle => f.write_str("Shuttle"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleStatus {
    Free,
    Pickup,
    Service,
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleStatus::Free => f.write_str("free"),
            VehicleStatus::Pickup => f.write_str("picking up"),
            VehicleStatus::Service => f.write_str("in service"),
        }
    }
}

/// Raised by [`Vehicle::advance`] when the vehicle reaches its ride target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrival {
    Pickup,
    Dropoff,
}

#[derive(Debug, Clone)]
pub struct Vehicle {
    id: VehicleId,
    kind: VehicleKind,
    driver: Driver,
    location: Location,
    destination: Location,
    route: Route,
    status: VehicleStatus,
    ride: Option<RideKind>,
    extra_stops: VecDeque<Location>,
    statistics: Statistics,
}

impl Vehicle {
    /// Free vehicle heading for `destination`.
    pub fn new(
        id: VehicleId,
        kind: VehicleKind,
        driver: Driver,
        location: Location,
        destination: Location,
    ) -> Self {
        Self {
            id,
            kind,
            driver,
            location,
            destination,
            route: Route::between(location, destination),
            status: VehicleStatus::Free,
            ride: None,
            extra_stops: VecDeque::new(),
            statistics: Statistics::default(),
        }
    }

    /// Free vehicle roaming toward a random point at least the minimum
    /// distance away.
    pub fn roaming<R: RandomSource + ?Sized>(
        id: VehicleId,
        kind: VehicleKind,
        driver: Driver,
        location: Location,
        grid: &Grid,
        rng: &mut R,
    ) -> Self {
        let destination = grid.random_location_away(location, rng);
        Self::new(id, kind, driver, location, destination)
    }

    pub fn id(&self) -> VehicleId {
        self.id
    }

    pub fn kind(&self) -> VehicleKind {
        self.kind
    }

    pub fn driver(&self) -> &Driver {
        &self.driver
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn destination(&self) -> Location {
        self.destination
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn status(&self) -> VehicleStatus {
        self.status
    }

    pub fn is_free(&self) -> bool {
        self.status == VehicleStatus::Free
    }

    pub fn ride(&self) -> Option<&RideKind> {
        self.ride.as_ref()
    }

    pub(crate) fn ride_mut(&mut self) -> Option<&mut RideKind> {
        self.ride.as_mut()
    }

    pub fn extra_stops(&self) -> &VecDeque<Location> {
        &self.extra_stops
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Fare for the current ride: fare basis times the vehicle multiplier.
    pub fn fare(&self) -> Option<f64> {
        self.ride
            .as_ref()
            .map(|ride| ride.fare_basis() * self.kind.fare_multiplier())
    }

    /// Free -> Pickup: heads for the ride's pickup point.
    pub fn pick_service(&mut self, ride: Ride) -> VehicleResult<()> {
        self.expect_status(VehicleStatus::Free, "pick a service")?;
        self.destination = ride.pickup();
        self.route = Route::between(self.location, self.destination);
        self.ride = Some(RideKind::Solo(ride));
        self.status = VehicleStatus::Pickup;
        trace!(vehicle = %self.id, destination = %self.destination, "heading to pickup");
        Ok(())
    }

    /// Pickup -> Service: heads for the (head) dropoff point.
    pub fn start_service(&mut self) -> VehicleResult<()> {
        self.expect_status(VehicleStatus::Pickup, "start service")?;
        let dropoff = self
            .ride
            .as_ref()
            .and_then(RideKind::current_dropoff)
            .ok_or(VehicleError::NoActiveRide(self.id))?;
        self.destination = dropoff;
        self.route = Route::between(self.location, self.destination);
        self.status = VehicleStatus::Service;
        trace!(vehicle = %self.id, destination = %self.destination, "service started");
        Ok(())
    }

    /// Service -> Free: settles statistics for the ride and goes roaming.
    ///
    /// The roaming target here is any point on the map, with no minimum
    /// distance, so the vehicle may sit still for a tick.
    pub fn end_service<R: RandomSource + ?Sized>(
        &mut self,
        grid: &Grid,
        rng: &mut R,
    ) -> VehicleResult<()> {
        self.expect_status(VehicleStatus::Service, "end service")?;
        let fare = self.fare().ok_or(VehicleError::NoActiveRide(self.id))?;
        let ride = self.ride.take().ok_or(VehicleError::NoActiveRide(self.id))?;

        self.statistics.record_service(ride.distance(), fare);
        for stars in ride.reviews() {
            self.statistics.record_review(stars);
        }

        self.extra_stops.clear();
        self.destination = grid.random_location(rng);
        self.route = Route::between(self.location, self.destination);
        self.status = VehicleStatus::Free;
        trace!(vehicle = %self.id, fare, distance = ride.distance(), "service ended");
        Ok(())
    }

    /// Queues another dropoff behind the current one.
    pub fn add_destination(&mut self, location: Location) {
        self.extra_stops.push_back(location);
    }

    /// Turns the current solo ride into a pooled one and queues the new
    /// rider's dropoff as an extra stop.
    pub fn attach_pooled_rider(&mut self, rider: RiderId, dropoff: Location) -> VehicleResult<()> {
        self.expect_status(VehicleStatus::Service, "take a pooled rider")?;
        let mut shared = match self.ride.take() {
            Some(RideKind::Solo(ride)) => SharedRide::from_ride(ride),
            other => {
                self.ride = other;
                return Err(VehicleError::NotPoolable(self.id));
            }
        };
        shared.add_rider(rider, dropoff);
        self.ride = Some(RideKind::Shared(shared));
        self.add_destination(dropoff);
        trace!(vehicle = %self.id, %rider, %dropoff, "pooled rider attached");
        Ok(())
    }

    /// Called once dispatch has let the head rider out: drives on to the next
    /// pooled stop, or ends the service when none is left.
    ///
    /// The next leg is appended to the route rather than rebuilt, and the
    /// vehicle stays in service.
    pub fn continue_after_dropoff<R: RandomSource + ?Sized>(
        &mut self,
        grid: &Grid,
        rng: &mut R,
    ) -> VehicleResult<()> {
        self.expect_status(VehicleStatus::Service, "continue after dropoff")?;
        let pooled = self.ride.as_ref().is_some_and(RideKind::is_shared);
        match self.extra_stops.pop_front() {
            Some(stop) if pooled => {
                self.destination = stop;
                self.route.extend_to(self.location, stop);
                trace!(vehicle = %self.id, destination = %stop, "next pooled stop");
                Ok(())
            }
            _ => self.end_service(grid, rng),
        }
    }

    /// Moves one step along the route.
    ///
    /// When the route runs out, a free vehicle picks a new roaming target and a
    /// busy one reports whether it reached its pickup or dropoff. A vehicle
    /// whose route is already empty stays put and only re-checks its target.
    pub fn advance<R: RandomSource + ?Sized>(
        &mut self,
        grid: &Grid,
        rng: &mut R,
    ) -> VehicleResult<Option<Arrival>> {
        if self.route.has_next() {
            self.location = self.route.next_location()?;
        }
        if self.route.has_next() {
            return Ok(None);
        }

        let Some(ride) = self.ride.as_ref() else {
            self.destination = grid.random_location_away(self.location, rng);
            self.route = Route::between(self.location, self.destination);
            return Ok(None);
        };

        let arrival = match self.status {
            VehicleStatus::Pickup if self.location == ride.pickup() => Some(Arrival::Pickup),
            VehicleStatus::Service if Some(self.location) == ride.current_dropoff() => {
                Some(Arrival::Dropoff)
            }
            _ => None,
        };
        Ok(arrival)
    }

    fn expect_status(&self, expected: VehicleStatus, action: &'static str) -> VehicleResult<()> {
        if self.status != expected {
            return Err(VehicleError::InvalidStateTransition {
                vehicle: self.id,
                action,
                status: self.status,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {} driving to {}",
            self.id, self.location, self.destination
        )?;
        match (self.status, self.ride.as_ref().and_then(RideKind::current_rider)) {
            (VehicleStatus::Free, _) => write!(f, " is free with path {}", self.route),
            (VehicleStatus::Pickup, Some(rider)) => write!(f, " to pickup user {rider}"),
            _ => f.write_str(" in service"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{DriverId, RiderId};
    use crate::random::ScriptedRandom;
    use crate::ride::RideMode;
    use crate::service_type::ServiceType;
    use crate::test_helpers::test_driver;

    fn parked_taxi(at: Location) -> Vehicle {
        Vehicle::new(
            VehicleId(1),
            VehicleKind::Taxi,
            test_driver(DriverId(1)),
            at,
            at,
        )
    }

    fn ride(pickup: Location, dropoff: Location) -> Ride {
        Ride::new(
            RiderId(7),
            pickup,
            dropoff,
            ServiceType::Standard,
            RideMode::Standard,
        )
    }

    fn drive_until_arrival(vehicle: &mut Vehicle, grid: &Grid, rng: &mut ScriptedRandom) -> (Arrival, Vec<Location>) {
        let mut visited = Vec::new();
        for _ in 0..100 {
            let arrival = vehicle.advance(grid, rng).expect("advance");
            visited.push(vehicle.location());
            if let Some(arrival) = arrival {
                return (arrival, visited);
            }
        }
        panic!("vehicle never arrived");
    }

    #[test]
    fn serves_a_solo_ride_along_x_then_y() {
        let grid = Grid::default();
        let mut rng = ScriptedRandom::new();
        let mut vehicle = parked_taxi(Location::new(0, 0));

        vehicle
            .pick_service(ride(Location::new(5, 0), Location::new(5, 5)))
            .expect("pick");
        assert_eq!(vehicle.status(), VehicleStatus::Pickup);
        assert_eq!(vehicle.route().len(), 5);
        assert!(vehicle.route().iter().all(|step| step.y == 0));

        let (arrival, _) = drive_until_arrival(&mut vehicle, &grid, &mut rng);
        assert_eq!(arrival, Arrival::Pickup);
        assert_eq!(vehicle.location(), Location::new(5, 0));

        vehicle.start_service().expect("start");
        assert_eq!(vehicle.status(), VehicleStatus::Service);
        assert_eq!(vehicle.route().len(), 5);
        assert!(vehicle.route().iter().all(|step| step.x == 5));
        // Ride distance is pickup to dropoff; the empty leg is not billed.
        assert_eq!(vehicle.ride().map(RideKind::distance), Some(5));

        let (arrival, _) = drive_until_arrival(&mut vehicle, &grid, &mut rng);
        assert_eq!(arrival, Arrival::Dropoff);
        vehicle.continue_after_dropoff(&grid, &mut rng).expect("end");

        assert!(vehicle.is_free());
        assert!(vehicle.ride().is_none());
        let stats = vehicle.statistics();
        assert_eq!(stats.services(), 1);
        assert_eq!(stats.distance(), 5);
        assert!((stats.billing() - 10.0).abs() < 1e-9, "5 * 1.0 * taxi 2.0");
        assert_eq!(stats.reviews(), 0);
    }

    #[test]
    fn stays_busy_from_pickup_until_service_ends() {
        let grid = Grid::default();
        let mut rng = ScriptedRandom::new();
        let mut vehicle = parked_taxi(Location::new(0, 0));
        vehicle
            .pick_service(ride(Location::new(3, 0), Location::new(3, 3)))
            .expect("pick");

        let second = vehicle.pick_service(ride(Location::new(1, 1), Location::new(4, 4)));
        assert!(matches!(
            second,
            Err(VehicleError::InvalidStateTransition { status: VehicleStatus::Pickup, .. })
        ));

        for _ in 0..6 {
            if let Some(Arrival::Pickup) = vehicle.advance(&grid, &mut rng).expect("advance") {
                vehicle.start_service().expect("start");
            }
            assert!(!vehicle.is_free());
        }
    }

    #[test]
    fn out_of_order_transitions_fail_fast() {
        let grid = Grid::default();
        let mut rng = ScriptedRandom::new();
        let mut vehicle = parked_taxi(Location::new(0, 0));

        assert!(matches!(
            vehicle.start_service(),
            Err(VehicleError::InvalidStateTransition { action: "start service", .. })
        ));
        assert!(matches!(
            vehicle.end_service(&grid, &mut rng),
            Err(VehicleError::InvalidStateTransition { status: VehicleStatus::Free, .. })
        ));
        assert!(matches!(
            vehicle.attach_pooled_rider(RiderId(2), Location::new(4, 4)),
            Err(VehicleError::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn free_vehicle_picks_a_new_roaming_target_when_route_runs_out() {
        let grid = Grid::default();
        // Next roaming target: (9, 9).
        let mut rng = ScriptedRandom::new().with_integers([9, 9]);
        let mut vehicle = Vehicle::new(
            VehicleId(1),
            VehicleKind::Shuttle,
            test_driver(DriverId(1)),
            Location::new(0, 0),
            Location::new(1, 0),
        );

        assert_eq!(vehicle.advance(&grid, &mut rng).expect("advance"), None);
        assert_eq!(vehicle.location(), Location::new(1, 0));
        assert_eq!(vehicle.destination(), Location::new(9, 9));
        assert_eq!(vehicle.route().len(), 17);
    }

    #[test]
    fn ending_service_may_roam_to_the_current_location() {
        let grid = Grid::default();
        let mut vehicle = parked_taxi(Location::new(0, 0));
        vehicle
            .pick_service(ride(Location::new(0, 3), Location::new(2, 3)))
            .expect("pick");
        let mut rng = ScriptedRandom::new();
        drive_until_arrival(&mut vehicle, &grid, &mut rng);
        vehicle.start_service().expect("start");
        drive_until_arrival(&mut vehicle, &grid, &mut rng);

        // Roaming target equal to the dropoff point: allowed at this call site.
        let mut rng = ScriptedRandom::new().with_integers([2, 3]);
        vehicle.end_service(&grid, &mut rng).expect("end");
        assert_eq!(vehicle.destination(), Location::new(2, 3));
        assert!(vehicle.route().is_empty());

        // Next tick: the vehicle stays put and picks a proper roaming target.
        let mut rng = ScriptedRandom::new().with_integers([9, 9]);
        assert_eq!(vehicle.advance(&grid, &mut rng).expect("advance"), None);
        assert_eq!(vehicle.location(), Location::new(2, 3));
        assert_eq!(vehicle.destination(), Location::new(9, 9));
    }

    #[test]
    fn pooled_rider_is_dropped_after_the_anchor_rider() {
        let grid = Grid::default();
        let mut rng = ScriptedRandom::new();
        let mut vehicle = parked_taxi(Location::new(0, 0));
        vehicle
            .pick_service(ride(Location::new(0, 0), Location::new(3, 0)))
            .expect("pick");
        // Already at the pickup point.
        assert_eq!(vehicle.advance(&grid, &mut rng).expect("advance"), Some(Arrival::Pickup));
        vehicle.start_service().expect("start");

        vehicle
            .attach_pooled_rider(RiderId(8), Location::new(3, 4))
            .expect("pool");
        assert!(vehicle.ride().is_some_and(RideKind::is_shared));
        assert_eq!(vehicle.extra_stops().len(), 1);

        let (arrival, _) = drive_until_arrival(&mut vehicle, &grid, &mut rng);
        assert_eq!(arrival, Arrival::Dropoff);
        assert_eq!(vehicle.location(), Location::new(3, 0));

        // Dispatch lets the anchor rider out before the vehicle moves on.
        if let Some(RideKind::Shared(shared)) = vehicle.ride_mut() {
            shared.rate_head(4);
            shared.remove_head();
        }
        vehicle.continue_after_dropoff(&grid, &mut rng).expect("continue");
        assert_eq!(vehicle.status(), VehicleStatus::Service);
        assert_eq!(vehicle.destination(), Location::new(3, 4));
        assert!(vehicle.extra_stops().is_empty());

        let (arrival, visited) = drive_until_arrival(&mut vehicle, &grid, &mut rng);
        assert_eq!(arrival, Arrival::Dropoff);
        assert_eq!(visited.len(), 4);
        if let Some(RideKind::Shared(shared)) = vehicle.ride_mut() {
            shared.rate_head(2);
            shared.remove_head();
        }
        vehicle.continue_after_dropoff(&grid, &mut rng).expect("end");

        let stats = vehicle.statistics();
        assert!(vehicle.is_free());
        assert_eq!(stats.services(), 1);
        assert_eq!(stats.distance(), 7);
        assert!((stats.billing() - 7.0 * 0.7 * 2.0).abs() < 1e-9);
        assert_eq!(stats.reviews(), 2);
        assert_eq!(stats.star_sum(), 6);
    }

    #[test]
    fn only_solo_rides_can_be_pooled() {
        let grid = Grid::default();
        let mut rng = ScriptedRandom::new();
        let mut vehicle = parked_taxi(Location::new(0, 0));
        vehicle
            .pick_service(ride(Location::new(0, 0), Location::new(3, 0)))
            .expect("pick");
        vehicle.advance(&grid, &mut rng).expect("advance");
        vehicle.start_service().expect("start");
        vehicle
            .attach_pooled_rider(RiderId(8), Location::new(3, 4))
            .expect("first pool");

        assert_eq!(
            vehicle.attach_pooled_rider(RiderId(9), Location::new(6, 6)),
            Err(VehicleError::NotPoolable(VehicleId(1)))
        );
        assert!(vehicle.ride().is_some_and(RideKind::is_shared));
    }

    #[test]
    fn status_line_describes_what_the_vehicle_is_doing() {
        let mut vehicle = Vehicle::new(
            VehicleId(3),
            VehicleKind::Taxi,
            test_driver(DriverId(3)),
            Location::new(0, 0),
            Location::new(1, 0),
        );
        assert_eq!(
            vehicle.to_string(),
            "3 at (0,0) driving to (1,0) is free with path (1,0)"
        );
        vehicle
            .pick_service(ride(Location::new(0, 3), Location::new(4, 3)))
            .expect("pick");
        assert_eq!(vehicle.to_string(), "3 at (0,0) driving to (0,3) to pickup user 7");
    }
}
