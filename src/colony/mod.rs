//! Ant colony optimization engine.
//!
//! A run alternates four phases until a termination condition holds:
//!
//! 1. **Construct**: `num_ants` ants each build a complete solution against
//!    the current [`PheromoneMatrix`] generation ([`construct_solution`]).
//! 2. **Evaluate**: every solution is priced and checked by the
//!    [`SolutionEvaluator`](crate::evaluation::SolutionEvaluator).
//! 3. **Update**: the [`Strategy`] (EAS or MMAS) plans a [`PheromoneUpdate`]
//!    and the next generation is built from it.
//! 4. **Check**: iteration cap, stagnation, [`StopSignal`], time limit.
//!
//! Ants only borrow the matrix, so construction runs on the rayon pool
//! without locks. Each ant draws from its own RNG seeded by
//! `(seed, iteration, ant)`, which makes runs reproducible regardless of
//! thread scheduling.

mod config;
mod construction;
mod pheromone;
mod result;
mod rng;
mod runner;
mod strategy;

pub use config::{ColonyConfig, MmasDeposit, StrategyKind};
pub use construction::construct_solution;
pub use pheromone::{Deposit, PheromoneMatrix, PheromoneUpdate, MIN_TRAIL};
pub use result::{ConvergenceEntry, ConvergenceRecord, RunResult, TerminationReason};
pub use runner::{solve, ColonyRunner, StopSignal};
pub use strategy::{adaptive_bounds, EasStrategy, MmasStrategy, Strategy, UpdateContext};
