//! Domain model types for vehicle routing problems.
//!
//! Provides the core abstractions: stops with demands and time windows,
//! vehicle classes forming a fleet, routes as ordered sequences of visits,
//! solutions, and the problem instance that ties them to a cost matrix.

mod fleet;
mod problem;
mod route;
mod solution;
mod stop;

pub use fleet::{Fleet, Vehicle, VehicleClass};
pub use problem::Problem;
pub use route::{Route, Visit, DEPOT};
pub use solution::{Solution, Violation, ViolationType};
pub use stop::{Stop, TimeWindow};
