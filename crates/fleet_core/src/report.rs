//! Text views over the fleet: a live status board and end-of-run statistics.

use std::fmt;

use serde::Serialize;

use crate::fleet::Fleet;
use crate::vehicle::{Vehicle, VehicleId, VehicleKind};

/// One row of the statistics view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleSummary {
    pub kind: VehicleKind,
    pub id: VehicleId,
    pub services: u32,
    pub distance: u64,
    pub billing: f64,
    pub reviews: u32,
    pub average_stars: Option<f64>,
}

impl From<&Vehicle> for VehicleSummary {
    fn from(vehicle: &Vehicle) -> Self {
        let stats = vehicle.statistics();
        Self {
            kind: vehicle.kind(),
            id: vehicle.id(),
            services: stats.services(),
            distance: stats.distance(),
            billing: stats.billing(),
            reviews: stats.reviews(),
            average_stars: stats.average_stars(),
        }
    }
}

impl fmt::Display for VehicleSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stars = match self.average_stars {
            Some(avg) => format!("{avg:.2}"),
            None => "-".to_string(),
        };
        write!(
            f,
            "{:<8}{:>2} {:>2} services {:>3} km. {:>6.2} eur. {:>2} reviews {:<4} stars",
            self.kind.to_string(),
            self.id.to_string(),
            self.services,
            self.distance,
            self.billing,
            self.reviews,
            stars
        )
    }
}

pub fn fleet_summaries(fleet: &Fleet) -> Vec<VehicleSummary> {
    fleet.vehicles().iter().map(VehicleSummary::from).collect()
}

/// One status line per vehicle, in fleet order.
pub fn status_report(fleet: &Fleet) -> String {
    fleet
        .vehicles()
        .iter()
        .map(Vehicle::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// One statistics line per vehicle, in fleet order.
pub fn statistics_report(fleet: &Fleet) -> String {
    fleet_summaries(fleet)
        .iter()
        .map(VehicleSummary::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::DriverId;
    use crate::grid::Location;
    use crate::test_helpers::{test_driver, test_vehicle};

    #[test]
    fn unreviewed_vehicle_shows_a_dash_for_stars() {
        let fleet = Fleet::new(
            Vec::new(),
            vec![test_vehicle(
                3,
                VehicleKind::Shuttle,
                test_driver(DriverId(3)),
                Location::new(2, 2),
            )],
        );
        assert_eq!(
            statistics_report(&fleet),
            "Shuttle  3  0 services   0 km.   0.00 eur.  0 reviews -    stars"
        );
    }

    #[test]
    fn summary_rounds_billing_and_average() {
        let summary = VehicleSummary {
            kind: VehicleKind::Taxi,
            id: VehicleId(1),
            services: 2,
            distance: 17,
            billing: 29.8,
            reviews: 3,
            average_stars: Some(11.0 / 3.0),
        };
        assert_eq!(
            summary.to_string(),
            "Taxi     1  2 services  17 km.  29.80 eur.  3 reviews 3.67 stars"
        );
    }

    #[test]
    fn status_report_has_a_line_per_vehicle() {
        let fleet = Fleet::new(
            Vec::new(),
            vec![
                test_vehicle(1, VehicleKind::Taxi, test_driver(DriverId(1)), Location::new(0, 0)),
                test_vehicle(2, VehicleKind::Taxi, test_driver(DriverId(2)), Location::new(4, 4)),
            ],
        );
        let report = status_report(&fleet);
        assert_eq!(report.lines().count(), 2);
        assert!(report.starts_with("1 at (0,0) driving to (0,0) is free"));
    }
}
