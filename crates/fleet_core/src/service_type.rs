//! Service classes: who may ride, who may drive, and the base fare.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::agents::{Driver, Gender, Rider};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ServiceType {
    /// Open to every rider and driver.
    #[default]
    Standard,
    /// Women and minors only, driven by women.
    Restricted,
}

impl ServiceType {
    pub fn is_rider_eligible(&self, rider: &Rider, current_year: i32) -> bool {
        match self {
            ServiceType::Standard => true,
            ServiceType::Restricted => rider.qualifies_for_restricted(current_year),
        }
    }

    pub fn is_driver_eligible(&self, driver: &Driver) -> bool {
        match self {
            ServiceType::Standard => true,
            ServiceType::Restricted => driver.gender() == Gender::Female,
        }
    }

    pub fn base_fare(&self) -> f64 {
        match self {
            ServiceType::Standard => 1.0,
            ServiceType::Restricted => 2.0,
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceType::Standard => f.write_str("standard"),
            ServiceType::Restricted => f.write_str("restricted"),
        }
    }
}
