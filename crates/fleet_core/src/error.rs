use thiserror::Error;

use crate::agents::RiderId;
use crate::vehicle::{VehicleId, VehicleStatus};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid {width}x{height} is too small; each side needs at least {min_side} cells")]
    GridTooSmall { width: u32, height: u32, min_side: u32 },

    #[error("grid {width}x{height} is too large; each side allows at most {max_side} cells")]
    GridTooLarge { width: u32, height: u32, max_side: u32 },

    #[error("{count} {what} do not fit in 32-bit ids")]
    TooMany { what: &'static str, count: usize },

    #[error("request probability {0} is outside [0, 1]")]
    RequestProbability(f64),

    #[error("fleet needs at least one vehicle")]
    EmptyFleet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("route has no remaining locations")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VehicleError {
    #[error("vehicle {vehicle} cannot {action} while {status}")]
    InvalidStateTransition {
        vehicle: VehicleId,
        action: &'static str,
        status: VehicleStatus,
    },

    #[error("vehicle {0} has no active ride")]
    NoActiveRide(VehicleId),

    #[error("vehicle {0} is not on a solo ride")]
    NotPoolable(VehicleId),

    #[error(transparent)]
    Route(#[from] RouteError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("rider {0} is not on the roster")]
    UnknownRider(RiderId),

    #[error("no vehicle at fleet index {0}")]
    UnknownVehicle(usize),

    #[error(transparent)]
    Vehicle(#[from] VehicleError),
}

pub type VehicleResult<T> = Result<T, VehicleError>;
pub type DispatchResult<T> = Result<T, DispatchError>;
