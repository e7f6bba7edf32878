//! Simulation runner: advances the clock and routes events into the ECS.
//!
//! Clock progression and event routing happen here, outside systems. Each step
//! pops the next event from [SimulationClock], inserts it as [CurrentEvent],
//! then runs the schedule. Systems cannot return errors, so a failing system
//! parks its error in [SimulationFault] and the runner surfaces it after the
//! schedule completes.

use bevy_ecs::prelude::{Res, Resource, Schedule, World};
use bevy_ecs::schedule::IntoSystemConfigs;
use tracing::{debug, warn};

use crate::clock::{CurrentEvent, Event, EventKind, SimulationClock};
use crate::error::DispatchError;
use crate::scenario::SimulationEndTick;
use crate::systems::{
    movement::movement_system, ride_request::ride_request_system,
    simulation_started::simulation_started_system,
};

/// First error raised by a system during the current step.
#[derive(Debug, Default, Resource)]
pub struct SimulationFault(Option<DispatchError>);

impl SimulationFault {
    /// Keeps the first error of a step; later ones are logged and dropped.
    pub fn record(&mut self, error: DispatchError) {
        if self.0.is_some() {
            warn!(%error, "additional fault in the same step");
            return;
        }
        self.0 = Some(error);
    }

    pub fn take(&mut self) -> Option<DispatchError> {
        self.0.take()
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }
}

fn is_simulation_started(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::SimulationStarted)
        .unwrap_or(false)
}

fn is_move_step(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::MoveStep)
        .unwrap_or(false)
}

fn is_ride_request(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::RideRequest)
        .unwrap_or(false)
}

/// Runs one simulation step: pops the next event, inserts it as [CurrentEvent],
/// then runs the schedule.
///
/// Returns `Ok(true)` if an event was processed and `Ok(false)` if the clock
/// was empty or the next event lies past [SimulationEndTick] (when that
/// resource is present). A fault recorded by a system is returned as `Err`.
pub fn run_next_event(world: &mut World, schedule: &mut Schedule) -> Result<bool, DispatchError> {
    let stop_after = world.get_resource::<SimulationEndTick>().map(|e| e.0);
    let next_ts = world
        .get_resource::<SimulationClock>()
        .and_then(|c| c.next_event_time());
    if let (Some(end), Some(ts)) = (stop_after, next_ts) {
        if ts > end {
            debug!(tick = ts, end, "end tick reached");
            return Ok(false);
        }
    }

    let event = match world.resource_mut::<SimulationClock>().pop_next() {
        Some(e) => e,
        None => return Ok(false),
    };
    world.insert_resource(CurrentEvent(event));

    schedule.run(world);

    match world
        .get_resource_mut::<SimulationFault>()
        .and_then(|mut fault| fault.take())
    {
        Some(error) => Err(error),
        None => Ok(true),
    }
}

/// Runs one simulation step and invokes `hook` after the schedule completes.
pub fn run_next_event_with_hook<F>(
    world: &mut World,
    schedule: &mut Schedule,
    mut hook: F,
) -> Result<bool, DispatchError>
where
    F: FnMut(&mut World, &Event),
{
    let processed = run_next_event(world, schedule)?;
    if processed {
        if let Some(event) = world.get_resource::<CurrentEvent>().map(|e| e.0) {
            hook(world, &event);
        }
    }
    Ok(processed)
}

/// Runs simulation steps until the event queue is empty or `max_steps` is reached.
/// Returns the number of steps executed.
pub fn run_until_empty(
    world: &mut World,
    schedule: &mut Schedule,
    max_steps: usize,
) -> Result<usize, DispatchError> {
    let mut steps = 0;
    while steps < max_steps && run_next_event(world, schedule)? {
        steps += 1;
    }
    Ok(steps)
}

/// Runs simulation steps until empty and invokes `hook` after each step.
pub fn run_until_empty_with_hook<F>(
    world: &mut World,
    schedule: &mut Schedule,
    max_steps: usize,
    mut hook: F,
) -> Result<usize, DispatchError>
where
    F: FnMut(&mut World, &Event),
{
    let mut steps = 0;
    while steps < max_steps && run_next_event_with_hook(world, schedule, &mut hook)? {
        steps += 1;
    }
    Ok(steps)
}

/// Builds the simulation schedule: one system per event kind, each gated on
/// the current event.
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems((
        simulation_started_system.run_if(is_simulation_started),
        movement_system.run_if(is_move_step),
        ride_request_system.run_if(is_ride_request),
    ));
    schedule
}

/// Initializes the simulation by scheduling the SimulationStarted event at time 0.
/// Call this after building the scenario and before running events.
pub fn initialize_simulation(world: &mut World) {
    let mut clock = world.resource_mut::<SimulationClock>();
    clock.schedule_at(0, EventKind::SimulationStarted);
}
