//! Riders and drivers: the profile data dispatch consults.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::random::RandomSource;

/// Riders younger than this may book the restricted service class.
pub const ADULT_AGE: i32 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RiderId(pub u32);

impl fmt::Display for RiderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DriverId(pub u32);

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
}

/// Person profile shared by riders and drivers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
}

impl Profile {
    /// Age by calendar year only; month and day are ignored.
    pub fn age_in(&self, current_year: i32) -> i32 {
        current_year - self.birth_date.year()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rider {
    id: RiderId,
    profile: Profile,
    in_service: bool,
}

impl Rider {
    pub fn new(id: RiderId, profile: Profile) -> Self {
        Self {
            id,
            profile,
            in_service: false,
        }
    }

    pub fn id(&self) -> RiderId {
        self.id
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn gender(&self) -> Gender {
        self.profile.gender
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.profile.birth_date
    }

    /// True while the rider is booked on a ride (solo or pooled).
    pub fn in_service(&self) -> bool {
        self.in_service
    }

    pub fn set_in_service(&mut self, in_service: bool) {
        self.in_service = in_service;
    }

    /// Female riders and minors may book the restricted service class.
    pub fn qualifies_for_restricted(&self, current_year: i32) -> bool {
        self.profile.gender == Gender::Female || self.profile.age_in(current_year) < ADULT_AGE
    }

    /// Riders rate about half of their rides, 1 to 5 stars. Returns 0 when the
    /// ride goes unrated.
    pub fn rate_ride<R: RandomSource + ?Sized>(&self, rng: &mut R) -> u8 {
        if rng.coin_flip() {
            rng.below(5) as u8 + 1
        } else {
            0
        }
    }
}

impl fmt::Display for Rider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:<20}", self.id, self.profile.full_name())
    }
}

/// Driver profile; read-only once the vehicle is on the road.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Driver {
    id: DriverId,
    profile: Profile,
}

impl Driver {
    pub fn new(id: DriverId, profile: Profile) -> Self {
        Self { id, profile }
    }

    pub fn id(&self) -> DriverId {
        self.id
    }

    pub fn gender(&self) -> Gender {
        self.profile.gender
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;

    fn profile(gender: Gender, year: i32, month: u32, day: u32) -> Profile {
        Profile {
            first_name: "Alex".to_string(),
            last_name: "Smith".to_string(),
            gender,
            birth_date: NaiveDate::from_ymd_opt(year, month, day).expect("valid date"),
        }
    }

    #[test]
    fn age_counts_calendar_years_only() {
        // Born on the last day of the year: still "18" on New Year's Day.
        let late = profile(Gender::Male, 2000, 12, 31);
        assert_eq!(late.age_in(2018), 18);
        let early = profile(Gender::Male, 2000, 1, 1);
        assert_eq!(early.age_in(2018), 18);
    }

    #[test]
    fn restricted_class_is_open_to_women_and_minors() {
        let year = 2024;
        let woman = Rider::new(RiderId(1), profile(Gender::Female, 1980, 5, 5));
        let boy = Rider::new(RiderId(2), profile(Gender::Male, 2010, 5, 5));
        let man = Rider::new(RiderId(3), profile(Gender::Male, 1980, 5, 5));
        let just_adult = Rider::new(RiderId(4), profile(Gender::Male, 2006, 12, 31));

        assert!(woman.qualifies_for_restricted(year));
        assert!(boy.qualifies_for_restricted(year));
        assert!(!man.qualifies_for_restricted(year));
        assert!(!just_adult.qualifies_for_restricted(year));
    }

    #[test]
    fn ratings_are_skipped_or_between_one_and_five() {
        let rider = Rider::new(RiderId(1), profile(Gender::Female, 1990, 1, 1));
        let mut rng = ScriptedRandom::new()
            .with_flips([false, true, true])
            .with_integers([0, 4]);
        assert_eq!(rider.rate_ride(&mut rng), 0);
        assert_eq!(rider.rate_ride(&mut rng), 1);
        assert_eq!(rider.rate_ride(&mut rng), 5);
    }
}
