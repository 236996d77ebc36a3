//! Colony run configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::evaluation::CostModel;

/// Pheromone update rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Elitist Ant System.
    Eas,
    /// Max-Min Ant System.
    Mmas,
}

impl FromStr for StrategyKind {
    type Err = ConfigError;

    /// Parses `eas` or `mmas`, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eas" => Ok(StrategyKind::Eas),
            "mmas" => Ok(StrategyKind::Mmas),
            _ => Err(ConfigError::UnknownStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Eas => f.write_str("eas"),
            StrategyKind::Mmas => f.write_str("mmas"),
        }
    }
}

/// Which solution reinforces the trail under MMAS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MmasDeposit {
    /// Best solution of the current iteration.
    #[default]
    IterationBest,
    /// Best solution of the whole run.
    RunBest,
}

/// Parameters of one colony run.
///
/// # Examples
///
/// ```
/// use u_colony::colony::{ColonyConfig, StrategyKind};
///
/// let config = ColonyConfig::default()
///     .with_strategy(StrategyKind::Mmas)
///     .with_num_ants(16)
///     .with_max_iterations(200)
///     .with_seed(42);
/// assert_eq!(config.num_ants, 16);
/// assert!(config.validate().is_ok());
///
/// let bad = ColonyConfig::default().with_rho(1.0);
/// assert_eq!(bad.validate().unwrap_err().field(), "rho");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColonyConfig {
    /// Update rule.
    pub strategy: StrategyKind,
    /// Pheromone exponent.
    pub alpha: f64,
    /// Heuristic (inverse distance) exponent.
    pub beta: f64,
    /// Evaporation rate in (0, 1).
    pub rho: f64,
    /// Deposit numerator: a solution of cost `c` deposits `q / c`.
    pub q: f64,
    /// Ants per iteration.
    pub num_ants: usize,
    /// Upper bound on iterations.
    pub max_iterations: usize,
    /// EAS elite weight `e`.
    pub elitism_weight: f64,
    /// Initial trail value.
    pub tau_0: f64,
    /// Fixed MMAS lower bound; set together with `tau_max`.
    pub tau_min: Option<f64>,
    /// Fixed MMAS upper bound; set together with `tau_min`.
    pub tau_max: Option<f64>,
    /// Probability parameter of the adaptive MMAS lower bound.
    pub p_best: f64,
    /// MMAS depositing solution.
    pub mmas_deposit: MmasDeposit,
    /// Iterations without improvement before EAS stops or MMAS restarts.
    pub stagnation_window: usize,
    /// Consecutive fruitless MMAS restarts before the run stops.
    pub max_restarts: usize,
    /// Multiplier of violation magnitudes in the penalized cost.
    pub penalty_weight: f64,
    /// Route pricing.
    pub cost_model: CostModel,
    /// Seed of every ant's random stream.
    pub seed: u64,
    /// Build ants on the rayon thread pool.
    pub parallel: bool,
    /// Wall-clock budget, checked between iterations.
    pub time_limit: Option<Duration>,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Eas,
            alpha: 1.0,
            beta: 2.0,
            rho: 0.5,
            q: 1.0,
            num_ants: 10,
            max_iterations: 100,
            elitism_weight: 1.0,
            tau_0: 1.0,
            tau_min: None,
            tau_max: None,
            p_best: 0.05,
            mmas_deposit: MmasDeposit::IterationBest,
            stagnation_window: 25,
            max_restarts: 3,
            penalty_weight: 1.0e6,
            cost_model: CostModel::default(),
            seed: 42,
            parallel: true,
            time_limit: None,
        }
    }
}

impl ColonyConfig {
    /// Sets the update rule.
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the pheromone and heuristic exponents.
    pub fn with_weights(mut self, alpha: f64, beta: f64) -> Self {
        self.alpha = alpha;
        self.beta = beta;
        self
    }

    /// Sets the evaporation rate.
    pub fn with_rho(mut self, rho: f64) -> Self {
        self.rho = rho;
        self
    }

    /// Sets the deposit numerator.
    pub fn with_q(mut self, q: f64) -> Self {
        self.q = q;
        self
    }

    /// Sets the number of ants per iteration.
    pub fn with_num_ants(mut self, n: usize) -> Self {
        self.num_ants = n;
        self
    }

    /// Sets the iteration cap.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the EAS elite weight.
    pub fn with_elitism_weight(mut self, e: f64) -> Self {
        self.elitism_weight = e;
        self
    }

    /// Sets the initial trail value.
    pub fn with_tau_0(mut self, tau_0: f64) -> Self {
        self.tau_0 = tau_0;
        self
    }

    /// Fixes the MMAS trail bounds instead of deriving them.
    pub fn with_trail_bounds(mut self, tau_min: f64, tau_max: f64) -> Self {
        self.tau_min = Some(tau_min);
        self.tau_max = Some(tau_max);
        self
    }

    /// Sets `p_best` for adaptive MMAS bounds.
    pub fn with_p_best(mut self, p: f64) -> Self {
        self.p_best = p;
        self
    }

    /// Chooses the MMAS depositing solution.
    pub fn with_mmas_deposit(mut self, deposit: MmasDeposit) -> Self {
        self.mmas_deposit = deposit;
        self
    }

    /// Sets the stagnation window.
    pub fn with_stagnation_window(mut self, n: usize) -> Self {
        self.stagnation_window = n;
        self
    }

    /// Sets how many fruitless MMAS restarts end the run.
    pub fn with_max_restarts(mut self, n: usize) -> Self {
        self.max_restarts = n;
        self
    }

    /// Sets the penalty weight.
    pub fn with_penalty_weight(mut self, w: f64) -> Self {
        self.penalty_weight = w;
        self
    }

    /// Sets the cost model.
    pub fn with_cost_model(mut self, model: CostModel) -> Self {
        self.cost_model = model;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enables or disables parallel construction.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets a wall-clock budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Returns the first invalid parameter, if any.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("alpha", self.alpha)?;
        positive("beta", self.beta)?;
        if !(self.rho > 0.0 && self.rho < 1.0) {
            return Err(ConfigError::invalid("rho", "must be in (0, 1)"));
        }
        positive("q", self.q)?;
        if self.num_ants == 0 {
            return Err(ConfigError::invalid("num_ants", "must be > 0"));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::invalid("max_iterations", "must be > 0"));
        }
        if !(self.elitism_weight.is_finite() && self.elitism_weight >= 0.0) {
            return Err(ConfigError::invalid(
                "elitism_weight",
                "must be finite and >= 0",
            ));
        }
        positive("tau_0", self.tau_0)?;
        match (self.tau_min, self.tau_max) {
            (None, None) => {}
            (Some(lo), Some(hi)) => {
                positive("tau_min", lo)?;
                positive("tau_max", hi)?;
                if lo >= hi {
                    return Err(ConfigError::invalid("tau_min", "must be < tau_max"));
                }
            }
            (Some(_), None) => {
                return Err(ConfigError::invalid("tau_max", "required when tau_min is set"));
            }
            (None, Some(_)) => {
                return Err(ConfigError::invalid("tau_min", "required when tau_max is set"));
            }
        }
        if !(self.p_best > 0.0 && self.p_best < 1.0) {
            return Err(ConfigError::invalid("p_best", "must be in (0, 1)"));
        }
        if self.stagnation_window == 0 {
            return Err(ConfigError::invalid("stagnation_window", "must be > 0"));
        }
        if !(self.penalty_weight.is_finite() && self.penalty_weight >= 0.0) {
            return Err(ConfigError::invalid(
                "penalty_weight",
                "must be finite and >= 0",
            ));
        }
        self.cost_model.validate()
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, "must be finite and > 0"))
    }
}
