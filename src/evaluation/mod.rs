//! Solution evaluation and cost computation.
//!
//! Rebuilds route schedules from stop sequences, checks capacity and
//! time-window constraints, and prices solutions under a [`CostModel`].

mod cost;
mod evaluator;

pub use cost::CostModel;
pub use evaluator::{Evaluation, SolutionEvaluator};

pub(crate) use evaluator::visit_timing;
