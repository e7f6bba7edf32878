pub mod movement;
pub mod ride_request;
pub mod simulation_started;
