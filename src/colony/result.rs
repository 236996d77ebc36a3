//! Run outcome and convergence history.

use serde::{Deserialize, Serialize};

use crate::models::Solution;

/// One iteration of the convergence history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceEntry {
    /// Zero-based iteration index.
    pub iteration: usize,
    /// Cost of the best feasible solution so far; `None` until one exists.
    pub best_cost: Option<f64>,
    /// Penalized cost of this iteration's best solution.
    pub iteration_best_cost: f64,
    /// Whether this iteration's best solution was feasible.
    pub iteration_best_feasible: bool,
    /// Whether the trail was reset to its upper bound after this iteration.
    pub restarted: bool,
}

/// Append-only per-iteration history of a run.
///
/// # Examples
///
/// ```
/// use u_colony::colony::ConvergenceRecord;
///
/// let record = ConvergenceRecord::default();
/// assert!(record.is_empty());
/// assert_eq!(record.best_cost(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceRecord {
    entries: Vec<ConvergenceEntry>,
}

impl ConvergenceRecord {
    pub(crate) fn push(&mut self, entry: ConvergenceEntry) {
        self.entries.push(entry);
    }

    /// All entries in iteration order.
    pub fn entries(&self) -> &[ConvergenceEntry] {
        &self.entries
    }

    /// Number of recorded iterations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` before the first iteration completes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best-so-far cost per iteration.
    pub fn best_costs(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.entries.iter().map(|e| e.best_cost)
    }

    /// Final best-so-far cost.
    pub fn best_cost(&self) -> Option<f64> {
        self.entries.last().and_then(|e| e.best_cost)
    }

    /// Iteration at which the final best cost first appeared.
    pub fn best_found_at(&self) -> Option<usize> {
        let best = self.best_cost()?;
        self.entries
            .iter()
            .find(|e| e.best_cost == Some(best))
            .map(|e| e.iteration)
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// The iteration cap was reached.
    MaxIterations,
    /// No improvement within the stagnation window (after the allowed
    /// restarts, for MMAS).
    Stagnation,
    /// A [`StopSignal`](super::StopSignal) was raised.
    StopRequested,
    /// The wall-clock budget ran out.
    TimeLimit,
}

/// Outcome of a colony run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Best feasible solution, or the least-penalized infeasible one when no
    /// ant ever built a feasible solution.
    pub best: Solution,
    /// Whether `best` is feasible.
    pub feasible: bool,
    /// Per-iteration history.
    pub convergence: ConvergenceRecord,
    /// Iterations executed.
    pub iterations: usize,
    /// MMAS restarts performed.
    pub restarts: usize,
    /// Why the run stopped.
    pub termination: TerminationReason,
}

impl RunResult {
    /// Cost of the best solution if it is feasible.
    pub fn best_cost(&self) -> Option<f64> {
        self.feasible.then(|| self.best.total_cost())
    }
}
