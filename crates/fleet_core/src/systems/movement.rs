//! Movement system: one fleet tick.
//!
//! Every vehicle advances one grid step in fleet order and arrivals are
//! handled on the spot. Afterwards the tick may spawn another ride request,
//! and the next tick is scheduled as long as there is work left.

use bevy_ecs::prelude::{Res, ResMut};
use tracing::trace;

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::dispatch::DispatchEngine;
use crate::fleet::Fleet;
use crate::random::{RandomSource, SimRng};
use crate::runner::SimulationFault;
use crate::scenario::SimulationConfig;

pub fn movement_system(
    mut clock: ResMut<SimulationClock>,
    mut fleet: ResMut<Fleet>,
    mut engine: ResMut<DispatchEngine>,
    mut rng: ResMut<SimRng>,
    mut fault: ResMut<SimulationFault>,
    config: Option<Res<SimulationConfig>>,
    event: Res<CurrentEvent>,
) {
    if event.0.kind != EventKind::MoveStep {
        return;
    }

    if let Err(error) = engine.advance_fleet(&mut fleet, &mut *rng) {
        fault.record(error);
        return;
    }

    let now = clock.now();
    let probability = config
        .as_deref()
        .map(|c| c.request_probability)
        .unwrap_or_default();
    let requested = rng.unit() < probability;
    if requested {
        clock.schedule_at(now, EventKind::RideRequest);
    }

    // A request scheduled this tick may still book a ride, so keep ticking
    // until it has been served.
    if engine.active_rides() > 0 || requested {
        clock.schedule_in(1, EventKind::MoveStep);
    }
    trace!(tick = now, active = engine.active_rides(), requested, "fleet tick");
}
