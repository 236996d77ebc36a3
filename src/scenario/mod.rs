//! Stop-set input: JSON scenario documents and random stop selection.
//!
//! Both produce positional [`Stop`](crate::models::Stop) lists with the
//! depot first, ready to be combined with a fleet and a
//! [`CostProvider`](crate::distance::CostProvider) into a
//! [`Problem`](crate::models::Problem).

mod document;
mod selector;

pub use document::{Scenario, ScenarioDepot, ScenarioNode, DEFAULT_HORIZON};
pub use selector::{RandomStopSelector, RawPoint, StopSelector};
