#![allow(dead_code)]

use fleet_core::agents::{Driver, DriverId, Gender, Rider, RiderId};
use fleet_core::fleet::Fleet;
use fleet_core::grid::Location;
use fleet_core::test_helpers::{test_driver_with_gender, test_rider_with, test_vehicle};
use fleet_core::vehicle::{Vehicle, VehicleKind};

/// Builder for a single rider fixture.
#[derive(Clone, Debug)]
pub struct RiderBuilder {
    id: u32,
    gender: Gender,
    birth_year: i32,
    in_service: bool,
}

impl RiderBuilder {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            gender: Gender::Male,
            birth_year: 1980,
            in_service: false,
        }
    }

    pub fn female(mut self) -> Self {
        self.gender = Gender::Female;
        self
    }

    pub fn born(mut self, year: i32) -> Self {
        self.birth_year = year;
        self
    }

    pub fn in_service(mut self) -> Self {
        self.in_service = true;
        self
    }

    pub fn build(self) -> Rider {
        let mut rider = test_rider_with(RiderId(self.id), self.gender, self.birth_year);
        rider.set_in_service(self.in_service);
        rider
    }
}

/// Builder for a parked vehicle fixture.
#[derive(Clone, Debug)]
pub struct VehicleBuilder {
    id: u32,
    kind: VehicleKind,
    driver_gender: Gender,
    location: Location,
}

impl VehicleBuilder {
    pub fn taxi(id: u32) -> Self {
        Self {
            id,
            kind: VehicleKind::Taxi,
            driver_gender: Gender::Male,
            location: Location::new(0, 0),
        }
    }

    pub fn shuttle(id: u32) -> Self {
        Self {
            kind: VehicleKind::Shuttle,
            ..Self::taxi(id)
        }
    }

    pub fn female_driver(mut self) -> Self {
        self.driver_gender = Gender::Female;
        self
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.location = Location::new(x, y);
        self
    }

    pub fn build(self) -> Vehicle {
        let driver: Driver = test_driver_with_gender(DriverId(self.id), self.driver_gender);
        test_vehicle(self.id, self.kind, driver, self.location)
    }
}

/// Fleet from rider and vehicle builders, in the given order.
pub fn fleet_of(riders: Vec<RiderBuilder>, vehicles: Vec<VehicleBuilder>) -> Fleet {
    Fleet::new(
        riders.into_iter().map(RiderBuilder::build).collect(),
        vehicles.into_iter().map(VehicleBuilder::build).collect(),
    )
}
