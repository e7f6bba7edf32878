//! Dispatch engine: matches riders to vehicles and reacts to vehicle arrivals.
//!
//! Matching is greedy and first-fit over fleet order. A request first tries to
//! pool the rider onto a taxi already serving a solo ride nearby; failing that,
//! the first free vehicle whose driver is eligible for the chosen service type
//! gets a new ride. "No vehicle" is an ordinary outcome, not an error: the rider
//! stays unbooked and can ask again later.
//!
//! Lifecycle notifications go to an in-memory queue of [`RideEvent`]s that the
//! simulation loop drains.

use std::fmt;

use bevy_ecs::prelude::Resource;
use tracing::debug;

use crate::agents::{Rider, RiderId};
use crate::error::{DispatchError, DispatchResult, VehicleError};
use crate::fleet::Fleet;
use crate::grid::{Grid, Location, MINIMUM_DISTANCE};
use crate::random::RandomSource;
use crate::ride::{Ride, RideKind, RideMode};
use crate::service_type::ServiceType;
use crate::vehicle::{Arrival, Vehicle, VehicleId, VehicleKind, VehicleStatus};

/// Lifecycle notification, rendered as a human-readable line by `Display`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RideEvent {
    Matched {
        rider: RiderId,
        vehicle: VehicleId,
        kind: VehicleKind,
        vehicle_location: Location,
        pickup: Location,
        dropoff: Location,
        service_type: ServiceType,
    },
    Pooled {
        rider: RiderId,
        vehicle: VehicleId,
        dropoff: Location,
    },
    PickedUp {
        rider: RiderId,
        vehicle: VehicleId,
        kind: VehicleKind,
    },
    DroppedOff {
        rider: RiderId,
        vehicle: VehicleId,
        kind: VehicleKind,
    },
}

impl fmt::Display for RideEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RideEvent::Matched {
                rider,
                vehicle,
                kind,
                vehicle_location,
                pickup,
                dropoff,
                service_type,
            } => write!(
                f,
                "User {rider} requests a {service_type} service from {pickup} to {dropoff}, \
                 the ride is assigned to {kind} {vehicle} at location {vehicle_location}"
            ),
            RideEvent::Pooled { rider, vehicle, .. } => {
                write!(f, "Shared ride accepted for user {rider} with vehicle {vehicle}")
            }
            RideEvent::PickedUp {
                rider,
                vehicle,
                kind,
            } => write!(f, "{:<8}{vehicle} picks up user {rider}", kind.to_string()),
            RideEvent::DroppedOff {
                rider,
                vehicle,
                kind,
            } => write!(f, "{:<8}{vehicle} drops off user {rider}", kind.to_string()),
        }
    }
}

/// Result of a single [`DispatchEngine::request_ride`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Rider already has a ride; nothing changed.
    AlreadyInService,
    /// Rider joined the ride of an in-service vehicle.
    Pooled(VehicleId),
    /// A free vehicle is on its way to the rider.
    Dispatched(VehicleId),
    /// No eligible free vehicle this time.
    NoVehicle,
}

#[derive(Debug, Resource)]
pub struct DispatchEngine {
    grid: Grid,
    current_year: i32,
    active_rides: usize,
    events: Vec<RideEvent>,
}

impl DispatchEngine {
    pub fn new(grid: Grid, current_year: i32) -> Self {
        Self {
            grid,
            current_year,
            active_rides: 0,
            events: Vec::new(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    /// Rides matched and not yet finished. A pooled ride counts once until
    /// its last rider is out.
    pub fn active_rides(&self) -> usize {
        self.active_rides
    }

    pub fn events(&self) -> &[RideEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<RideEvent> {
        std::mem::take(&mut self.events)
    }

    /// Books `rider` on a pooled ride if one accepts them, otherwise on a new
    /// solo ride. At most one match per call.
    pub fn request_ride<R: RandomSource + ?Sized>(
        &mut self,
        fleet: &mut Fleet,
        rider: RiderId,
        rng: &mut R,
    ) -> DispatchResult<DispatchOutcome> {
        let profile = fleet.rider(rider).ok_or(DispatchError::UnknownRider(rider))?;
        if profile.in_service() {
            return Ok(DispatchOutcome::AlreadyInService);
        }
        let restricted_ok = profile.qualifies_for_restricted(self.current_year);

        if let Some(vehicle) = self.try_pool(fleet, rider, rng)? {
            return Ok(DispatchOutcome::Pooled(vehicle));
        }

        let mode = if rng.coin_flip() {
            RideMode::Standard
        } else {
            RideMode::Silent
        };
        let service_type = if restricted_ok && rng.coin_flip() {
            ServiceType::Restricted
        } else {
            ServiceType::Standard
        };

        Ok(match self.provide_ride(fleet, rider, service_type, mode, rng)? {
            Some(vehicle) => DispatchOutcome::Dispatched(vehicle),
            None => DispatchOutcome::NoVehicle,
        })
    }

    /// Assigns the first free eligible vehicle to `rider` with fresh pickup and
    /// dropoff points. Returns `None`, with no side effects, when no vehicle
    /// qualifies.
    pub fn provide_ride<R: RandomSource + ?Sized>(
        &mut self,
        fleet: &mut Fleet,
        rider: RiderId,
        service_type: ServiceType,
        mode: RideMode,
        rng: &mut R,
    ) -> DispatchResult<Option<VehicleId>> {
        let profile = fleet.rider(rider).ok_or(DispatchError::UnknownRider(rider))?;
        let Some(index) = fleet.find_free_vehicle(profile, service_type, self.current_year) else {
            debug!(%rider, %service_type, "no eligible free vehicle");
            return Ok(None);
        };

        let (riders, vehicles) = fleet.parts_mut();
        let vehicle = &mut vehicles[index];
        let (pickup, dropoff) = self.sample_trip(vehicle.location(), rng);

        vehicle.pick_service(Ride::new(rider, pickup, dropoff, service_type, mode))?;
        rider_mut(riders, rider)?.set_in_service(true);
        self.active_rides += 1;

        debug!(%rider, vehicle = %vehicle.id(), %pickup, %dropoff, "ride dispatched");
        self.events.push(RideEvent::Matched {
            rider,
            vehicle: vehicle.id(),
            kind: vehicle.kind(),
            vehicle_location: vehicle.location(),
            pickup,
            dropoff,
            service_type,
        });
        Ok(Some(vehicle.id()))
    }

    /// Moves every vehicle one step, in fleet order, handling arrivals as
    /// they happen.
    pub fn advance_fleet<R: RandomSource + ?Sized>(
        &mut self,
        fleet: &mut Fleet,
        rng: &mut R,
    ) -> DispatchResult<()> {
        for index in 0..fleet.vehicles().len() {
            let (_, vehicles) = fleet.parts_mut();
            let arrival = vehicles[index].advance(&self.grid, rng)?;
            match arrival {
                Some(Arrival::Pickup) => self.on_arrival_at_pickup(fleet, index)?,
                Some(Arrival::Dropoff) => self.on_arrival_at_dropoff(fleet, index, rng)?,
                None => {}
            }
        }
        Ok(())
    }

    /// Vehicle at `index` reached its pickup point: the rider boards.
    pub fn on_arrival_at_pickup(&mut self, fleet: &mut Fleet, index: usize) -> DispatchResult<()> {
        let (_, vehicles) = fleet.parts_mut();
        let vehicle = vehicles
            .get_mut(index)
            .ok_or(DispatchError::UnknownVehicle(index))?;
        let rider = current_rider(vehicle)?;

        self.events.push(RideEvent::PickedUp {
            rider,
            vehicle: vehicle.id(),
            kind: vehicle.kind(),
        });
        vehicle.start_service()?;
        Ok(())
    }

    /// Vehicle at `index` reached a dropoff point: the departing rider rates
    /// the ride and leaves, then the vehicle moves on to its next stop or
    /// finishes the service.
    pub fn on_arrival_at_dropoff<R: RandomSource + ?Sized>(
        &mut self,
        fleet: &mut Fleet,
        index: usize,
        rng: &mut R,
    ) -> DispatchResult<()> {
        let (riders, vehicles) = fleet.parts_mut();
        let vehicle = vehicles
            .get_mut(index)
            .ok_or(DispatchError::UnknownVehicle(index))?;
        let vehicle_id = vehicle.id();
        let kind = vehicle.kind();

        let ride = vehicle
            .ride_mut()
            .ok_or(VehicleError::NoActiveRide(vehicle_id))?;
        let rider = match ride {
            RideKind::Solo(ride) => {
                let passenger = rider_mut(riders, ride.rider())?;
                ride.set_rating(passenger.rate_ride(rng));
                passenger.set_in_service(false);
                self.finish_ride();
                ride.rider()
            }
            RideKind::Shared(shared) => {
                let head = shared
                    .head_rider()
                    .ok_or(VehicleError::NoActiveRide(vehicle_id))?;
                shared.rate_head(rider_mut(riders, head)?.rate_ride(rng));
                let departure = shared
                    .remove_head()
                    .ok_or(VehicleError::NoActiveRide(vehicle_id))?;
                rider_mut(riders, departure.rider)?.set_in_service(false);
                debug!(
                    rider = %departure.rider,
                    vehicle = %vehicle_id,
                    dropoff = %departure.dropoff,
                    stars = departure.rating,
                    "pooled rider left"
                );
                if shared.is_finished() {
                    self.finish_ride();
                }
                departure.rider
            }
        };

        self.events.push(RideEvent::DroppedOff {
            rider,
            vehicle: vehicle_id,
            kind,
        });
        vehicle.continue_after_dropoff(&self.grid, rng)?;
        Ok(())
    }

    /// Offers `rider` a seat on the first in-service taxi near a freshly
    /// sampled pickup point whose current rider and driver both accept.
    fn try_pool<R: RandomSource + ?Sized>(
        &mut self,
        fleet: &mut Fleet,
        rider: RiderId,
        rng: &mut R,
    ) -> DispatchResult<Option<VehicleId>> {
        let (riders, vehicles) = fleet.parts_mut();
        for vehicle in vehicles.iter_mut() {
            if !is_poolable(vehicle) {
                continue;
            }
            let pickup = self.grid.random_location(rng);
            let dropoff = self.grid.random_location_away(pickup, rng);
            if vehicle.location().distance(pickup) >= MINIMUM_DISTANCE {
                continue;
            }
            // Both the rider already on board and the driver get a say.
            if !(rng.coin_flip() && rng.coin_flip()) {
                continue;
            }

            vehicle.attach_pooled_rider(rider, dropoff)?;
            rider_mut(riders, rider)?.set_in_service(true);
            debug!(%rider, vehicle = %vehicle.id(), %dropoff, "rider pooled");
            self.events.push(RideEvent::Pooled {
                rider,
                vehicle: vehicle.id(),
                dropoff,
            });
            return Ok(Some(vehicle.id()));
        }
        Ok(None)
    }

    /// Pickup at least the minimum distance from the vehicle, dropoff at least
    /// the minimum distance from the pickup.
    fn sample_trip<R: RandomSource + ?Sized>(
        &self,
        vehicle_location: Location,
        rng: &mut R,
    ) -> (Location, Location) {
        loop {
            let pickup = self.grid.random_location(rng);
            let dropoff = self.grid.random_location_away(pickup, rng);
            if pickup.distance(vehicle_location) >= MINIMUM_DISTANCE {
                return (pickup, dropoff);
            }
        }
    }

    fn finish_ride(&mut self) {
        debug_assert!(self.active_rides > 0, "finished more rides than were started");
        self.active_rides = self.active_rides.saturating_sub(1);
    }
}

fn is_poolable(vehicle: &Vehicle) -> bool {
    vehicle.status() == VehicleStatus::Service
        && vehicle.kind().accepts_pooling()
        && matches!(vehicle.ride(), Some(RideKind::Solo(_)))
}

fn current_rider(vehicle: &Vehicle) -> DispatchResult<RiderId> {
    vehicle
        .ride()
        .and_then(RideKind::current_rider)
        .ok_or_else(|| VehicleError::NoActiveRide(vehicle.id()).into())
}

fn rider_mut(riders: &mut [Rider], id: RiderId) -> DispatchResult<&mut Rider> {
    riders
        .iter_mut()
        .find(|rider| rider.id() == id)
        .ok_or(DispatchError::UnknownRider(id))
}
