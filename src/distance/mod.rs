//! Distance and travel time matrices.
//!
//! Provides the dense `(distance, duration)` matrix the optimizer reads and
//! the [`CostProvider`] boundary through which it is obtained.

mod matrix;
mod provider;

pub use matrix::CostMatrix;
pub use provider::{CostProvider, EuclideanProvider, StaticProvider};
