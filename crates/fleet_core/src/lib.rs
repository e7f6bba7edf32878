pub mod agents;
pub mod clock;
pub mod dispatch;
pub mod error;
pub mod fleet;
pub mod grid;
pub mod random;
pub mod report;
pub mod ride;
pub mod routing;
pub mod runner;
pub mod scenario;
pub mod service_type;
pub mod statistics;
pub mod systems;
pub mod vehicle;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
