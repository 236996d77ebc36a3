//! The optimization loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::ColonyError;
use crate::evaluation::SolutionEvaluator;
use crate::models::{Problem, Solution};

use super::rng::ant_rng;
use super::{
    construct_solution, ColonyConfig, ConvergenceEntry, ConvergenceRecord, PheromoneMatrix,
    RunResult, Strategy, TerminationReason, UpdateContext,
};

/// Cooperative cancellation flag, checked between iterations.
///
/// Clones share the same flag.
///
/// # Examples
///
/// ```
/// use u_colony::colony::StopSignal;
///
/// let signal = StopSignal::new();
/// let handle = signal.clone();
/// handle.request_stop();
/// assert!(signal.is_requested());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    /// Creates a lowered flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks the run to stop after the current iteration.
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether a stop was requested.
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Runs an ant colony on one problem.
///
/// # Examples
///
/// ```
/// use u_colony::colony::{ColonyConfig, ColonyRunner, StrategyKind};
/// use u_colony::distance::EuclideanProvider;
/// use u_colony::models::{Fleet, Problem, Stop};
///
/// let stops = vec![
///     Stop::depot(0.0, 0.0),
///     Stop::new(1, 2.0, 0.0, 3, 0.0),
///     Stop::new(2, 2.0, 2.0, 3, 0.0),
///     Stop::new(3, 0.0, 2.0, 3, 0.0),
/// ];
/// let fleet = Fleet::homogeneous(10, 1).unwrap();
/// let problem = Problem::from_provider(stops, fleet, &EuclideanProvider::default()).unwrap();
///
/// let config = ColonyConfig::default()
///     .with_strategy(StrategyKind::Mmas)
///     .with_num_ants(5)
///     .with_max_iterations(30)
///     .with_seed(7);
/// let result = ColonyRunner::new(&problem, config).unwrap().run().unwrap();
/// assert!(result.feasible);
/// assert!((result.best.total_cost() - 8.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct ColonyRunner<'a> {
    problem: &'a Problem,
    config: ColonyConfig,
}

impl<'a> ColonyRunner<'a> {
    /// Validates `config` and prepares a run.
    pub fn new(problem: &'a Problem, config: ColonyConfig) -> Result<Self, ColonyError> {
        config.validate()?;
        Ok(Self { problem, config })
    }

    /// The validated configuration.
    pub fn config(&self) -> &ColonyConfig {
        &self.config
    }

    /// Runs until a termination condition holds.
    pub fn run(&self) -> Result<RunResult, ColonyError> {
        self.run_with_stop(&StopSignal::new())
    }

    /// Runs until a termination condition holds or `stop` is raised.
    pub fn run_with_stop(&self, stop: &StopSignal) -> Result<RunResult, ColonyError> {
        let config = &self.config;
        let problem = self.problem;
        let started = Instant::now();
        let evaluator = SolutionEvaluator::new(problem, config.cost_model, config.penalty_weight);
        let num_stops = problem.stops().len();
        let mut strategy = Strategy::from_config(config, num_stops);
        let mut pheromone = PheromoneMatrix::new(num_stops, config.tau_0, problem.is_symmetric())?;

        info!(
            strategy = %config.strategy,
            ants = config.num_ants,
            max_iterations = config.max_iterations,
            stops = problem.num_customers(),
            vehicles = problem.fleet().len(),
            "colony run started"
        );

        let mut record = ConvergenceRecord::default();
        let mut run_best: Option<Solution> = None;
        let mut fallback: Option<Solution> = None;
        let mut no_improve = 0usize;
        let mut restarts = 0usize;
        let mut fruitless_restarts = 0usize;
        let mut iteration = 0usize;

        let termination = loop {
            let solutions = self.build_ants(&evaluator, &pheromone, iteration);
            let ib = cheapest(solutions.iter().map(|s| s.total_cost()));
            let best_feasible = cheapest(
                solutions
                    .iter()
                    .map(|s| if s.is_feasible() { s.total_cost() } else { f64::INFINITY }),
            )
            .filter(|&i| solutions[i].is_feasible());

            let Some(ib) = ib else {
                return Err(ColonyError::NumericalDegeneracy(format!(
                    "iteration {iteration} produced no comparable solution cost"
                )));
            };

            if best_feasible.is_none() {
                warn!(
                    iteration,
                    unassigned = solutions[ib].unassigned().len(),
                    "no feasible solution this iteration"
                );
            }

            let improved = match best_feasible {
                Some(i) => run_best
                    .as_ref()
                    .map_or(true, |b| solutions[i].total_cost() < b.total_cost()),
                None => false,
            };
            if let (true, Some(i)) = (improved, best_feasible) {
                run_best = Some(solutions[i].clone());
                no_improve = 0;
                fruitless_restarts = 0;
            } else {
                no_improve += 1;
            }
            if run_best.is_none()
                && fallback
                    .as_ref()
                    .map_or(true, |f| solutions[ib].total_cost() < f.total_cost())
            {
                fallback = Some(solutions[ib].clone());
            }

            let restart = if no_improve >= config.stagnation_window
                && fruitless_restarts < config.max_restarts
            {
                strategy.restart()
            } else {
                None
            };
            let restarted = restart.is_some();
            let update = match restart {
                Some(update) => {
                    restarts += 1;
                    fruitless_restarts += 1;
                    no_improve = 0;
                    warn!(iteration, restarts, "stagnation, resetting trails");
                    update
                }
                None => strategy.plan(&UpdateContext {
                    solutions: &solutions,
                    iteration_best: ib,
                    iteration_best_feasible: best_feasible,
                    run_best: run_best.as_ref(),
                    improved,
                }),
            };
            pheromone = pheromone.apply(&update)?;

            let best_cost = run_best.as_ref().map(|b| b.total_cost());
            record.push(ConvergenceEntry {
                iteration,
                best_cost,
                iteration_best_cost: solutions[ib].total_cost(),
                iteration_best_feasible: solutions[ib].is_feasible(),
                restarted,
            });
            debug!(
                iteration,
                iteration_best = solutions[ib].total_cost(),
                run_best = ?best_cost,
                "iteration finished"
            );

            iteration += 1;
            if iteration >= config.max_iterations {
                break TerminationReason::MaxIterations;
            }
            if no_improve >= config.stagnation_window {
                break TerminationReason::Stagnation;
            }
            if stop.is_requested() {
                break TerminationReason::StopRequested;
            }
            if config
                .time_limit
                .is_some_and(|limit| started.elapsed() >= limit)
            {
                break TerminationReason::TimeLimit;
            }
        };

        let feasible = run_best.is_some();
        let best = run_best.or(fallback).unwrap_or_default();
        info!(
            best_cost = best.total_cost(),
            feasible,
            iterations = iteration,
            restarts,
            reason = ?termination,
            "colony run finished"
        );

        Ok(RunResult {
            best,
            feasible,
            convergence: record,
            iterations: iteration,
            restarts,
            termination,
        })
    }

    fn build_ants(
        &self,
        evaluator: &SolutionEvaluator<'_>,
        pheromone: &PheromoneMatrix,
        iteration: usize,
    ) -> Vec<Solution> {
        let build = |ant: usize| {
            let mut rng = ant_rng(self.config.seed, iteration, ant);
            let mut solution = construct_solution(self.problem, pheromone, &self.config, &mut rng);
            evaluator.evaluate_into(&mut solution);
            solution
        };
        if self.config.parallel {
            (0..self.config.num_ants).into_par_iter().map(build).collect()
        } else {
            (0..self.config.num_ants).map(build).collect()
        }
    }
}

/// Runs `config` on `problem`.
pub fn solve(problem: &Problem, config: ColonyConfig) -> Result<RunResult, ColonyError> {
    ColonyRunner::new(problem, config)?.run()
}

/// Index of the smallest cost, lowest index on ties; `None` if every cost is NaN.
fn cheapest<I>(costs: I) -> Option<usize>
where
    I: IntoIterator<Item = f64>,
{
    let mut best: Option<(usize, f64)> = None;
    for (i, c) in costs.into_iter().enumerate() {
        if c.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, b)| c < b) {
            best = Some((i, c));
        }
    }
    best.map(|(i, _)| i)
}
