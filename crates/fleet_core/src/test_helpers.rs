//! Test helpers for common test setup and utilities.
//!
//! This module provides shared test utilities to reduce duplication across test files.

use chrono::NaiveDate;

use crate::agents::{Driver, DriverId, Gender, Profile, Rider, RiderId};
use crate::grid::Location;
use crate::vehicle::{Vehicle, VehicleId, VehicleKind};

/// Year used for age checks throughout the tests.
pub const TEST_YEAR: i32 = 2024;

/// Profile born on January 1st of `birth_year`.
pub fn test_profile(gender: Gender, birth_year: i32) -> Profile {
    Profile {
        first_name: "Test".to_string(),
        last_name: "Person".to_string(),
        gender,
        birth_date: NaiveDate::from_ymd_opt(birth_year, 1, 1).unwrap_or(NaiveDate::MIN),
    }
}

pub fn test_rider_with(id: RiderId, gender: Gender, birth_year: i32) -> Rider {
    Rider::new(id, test_profile(gender, birth_year))
}

/// Adult male rider: eligible for the standard class only.
pub fn test_rider(id: RiderId) -> Rider {
    test_rider_with(id, Gender::Male, 1980)
}

pub fn test_driver_with_gender(id: DriverId, gender: Gender) -> Driver {
    Driver::new(id, test_profile(gender, 1980))
}

/// Female driver: eligible for every service class.
pub fn test_driver(id: DriverId) -> Driver {
    test_driver_with_gender(id, Gender::Female)
}

/// Free vehicle parked at `location` with an empty route.
pub fn test_vehicle(id: u32, kind: VehicleKind, driver: Driver, location: Location) -> Vehicle {
    Vehicle::new(VehicleId(id), kind, driver, location, location)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_test_people_have_expected_eligibility() {
        assert!(!test_rider(RiderId(1)).qualifies_for_restricted(TEST_YEAR));
        assert_eq!(test_driver(DriverId(1)).gender(), Gender::Female);
    }

    #[test]
    fn test_vehicle_is_parked() {
        let vehicle = test_vehicle(1, VehicleKind::Taxi, test_driver(DriverId(1)), Location::new(2, 2));
        assert!(vehicle.is_free());
        assert!(vehicle.route().is_empty());
        assert_eq!(vehicle.destination(), Location::new(2, 2));
    }
}
