use bevy_ecs::prelude::{Res, ResMut};
use tracing::debug;

use crate::clock::{CurrentEvent, EventKind};
use crate::dispatch::DispatchEngine;
use crate::fleet::Fleet;
use crate::random::SimRng;
use crate::runner::SimulationFault;

/// One dispatch round: the first rider on the roster who is not already
/// booked asks for a ride.
pub fn ride_request_system(
    mut fleet: ResMut<Fleet>,
    mut engine: ResMut<DispatchEngine>,
    mut rng: ResMut<SimRng>,
    mut fault: ResMut<SimulationFault>,
    event: Res<CurrentEvent>,
) {
    if event.0.kind != EventKind::RideRequest {
        return;
    }

    let Some(rider) = fleet.next_waiting_rider() else {
        debug!("every rider is already booked");
        return;
    };

    match engine.request_ride(&mut fleet, rider, &mut *rng) {
        Ok(outcome) => debug!(%rider, ?outcome, "ride requested"),
        Err(error) => fault.record(error),
    }
}
