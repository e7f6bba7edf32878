use bevy_ecs::prelude::{Res, ResMut};
use tracing::debug;

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::scenario::SimulationConfig;

/// Seeds the queue: the opening burst of ride requests at t=0 and the first
/// fleet tick at t=1.
pub fn simulation_started_system(
    mut clock: ResMut<SimulationClock>,
    config: Option<Res<SimulationConfig>>,
    event: Res<CurrentEvent>,
) {
    if event.0.kind != EventKind::SimulationStarted {
        return;
    }

    let config = config.as_deref().copied().unwrap_or_default();
    let now = clock.now();
    for _ in 0..config.initial_requests {
        clock.schedule_at(now, EventKind::RideRequest);
    }
    clock.schedule_in(1, EventKind::MoveStep);
    debug!(initial_requests = config.initial_requests, "simulation started");
}
