//! The rider roster and the vehicle fleet, owned together as one resource.

use bevy_ecs::prelude::Resource;

use crate::agents::{Rider, RiderId};
use crate::service_type::ServiceType;
use crate::vehicle::Vehicle;

/// Roster and fleet. Vehicle order is significant: dispatch scans it
/// front to back and takes the first match, and every tick moves vehicles
/// in this order.
#[derive(Debug, Default, Resource)]
pub struct Fleet {
    riders: Vec<Rider>,
    vehicles: Vec<Vehicle>,
}

impl Fleet {
    pub fn new(riders: Vec<Rider>, vehicles: Vec<Vehicle>) -> Self {
        Self { riders, vehicles }
    }

    pub fn riders(&self) -> &[Rider] {
        &self.riders
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn rider(&self, id: RiderId) -> Option<&Rider> {
        self.riders.iter().find(|rider| rider.id() == id)
    }

    pub fn vehicle(&self, index: usize) -> Option<&Vehicle> {
        self.vehicles.get(index)
    }

    /// First rider on the roster who is not already booked.
    pub fn next_waiting_rider(&self) -> Option<RiderId> {
        self.riders
            .iter()
            .find(|rider| !rider.in_service())
            .map(Rider::id)
    }

    /// Index of the first free vehicle whose driver can serve `rider` under
    /// `service_type`.
    pub fn find_free_vehicle(
        &self,
        rider: &Rider,
        service_type: ServiceType,
        current_year: i32,
    ) -> Option<usize> {
        if !service_type.is_rider_eligible(rider, current_year) {
            return None;
        }
        self.vehicles.iter().position(|vehicle| {
            vehicle.is_free() && service_type.is_driver_eligible(vehicle.driver())
        })
    }

    /// Number of riders currently booked.
    pub fn riders_in_service(&self) -> usize {
        self.riders.iter().filter(|rider| rider.in_service()).count()
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut [Rider], &mut [Vehicle]) {
        (&mut self.riders, &mut self.vehicles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{DriverId, Gender};
    use crate::grid::Location;
    use crate::test_helpers::{test_driver_with_gender, test_rider_with, test_vehicle};
    use crate::vehicle::VehicleKind;

    #[test]
    fn free_vehicle_search_is_first_fit_in_fleet_order() {
        let fleet = Fleet::new(
            vec![test_rider_with(RiderId(1), Gender::Female, 1990)],
            vec![
                test_vehicle(1, VehicleKind::Taxi, test_driver_with_gender(DriverId(1), Gender::Male), Location::new(0, 0)),
                test_vehicle(2, VehicleKind::Taxi, test_driver_with_gender(DriverId(2), Gender::Female), Location::new(9, 9)),
                test_vehicle(3, VehicleKind::Shuttle, test_driver_with_gender(DriverId(3), Gender::Female), Location::new(1, 1)),
            ],
        );
        let rider = fleet.rider(RiderId(1)).expect("rider");

        assert_eq!(fleet.find_free_vehicle(rider, ServiceType::Standard, 2024), Some(0));
        assert_eq!(fleet.find_free_vehicle(rider, ServiceType::Restricted, 2024), Some(1));
    }

    #[test]
    fn ineligible_riders_get_no_vehicle() {
        let fleet = Fleet::new(
            vec![test_rider_with(RiderId(1), Gender::Male, 1980)],
            vec![test_vehicle(
                1,
                VehicleKind::Taxi,
                test_driver_with_gender(DriverId(1), Gender::Female),
                Location::new(0, 0),
            )],
        );
        let rider = fleet.rider(RiderId(1)).expect("rider");
        assert_eq!(fleet.find_free_vehicle(rider, ServiceType::Restricted, 2024), None);
    }

    #[test]
    fn next_waiting_rider_skips_booked_riders() {
        let mut first = test_rider_with(RiderId(1), Gender::Male, 1980);
        first.set_in_service(true);
        let fleet = Fleet::new(
            vec![first, test_rider_with(RiderId(2), Gender::Male, 1980)],
            Vec::new(),
        );
        assert_eq!(fleet.next_waiting_rider(), Some(RiderId(2)));
        assert_eq!(fleet.riders_in_service(), 1);
    }
}
