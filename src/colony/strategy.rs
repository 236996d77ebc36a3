//! Pheromone update strategies: Elitist Ant System and Max-Min Ant System.

use tracing::trace;

use crate::models::Solution;

use super::{ColonyConfig, Deposit, MmasDeposit, PheromoneUpdate, StrategyKind};

/// What a strategy sees when planning one update.
#[derive(Debug, Clone, Copy)]
pub struct UpdateContext<'a> {
    /// Evaluated solutions of this iteration, in ant order.
    pub solutions: &'a [Solution],
    /// Index of the iteration-best solution in `solutions`.
    pub iteration_best: usize,
    /// Index of the cheapest feasible solution in `solutions`, if any.
    pub iteration_best_feasible: Option<usize>,
    /// Best feasible solution so far, this iteration included.
    pub run_best: Option<&'a Solution>,
    /// Whether `run_best` changed this iteration.
    pub improved: bool,
}

impl<'a> UpdateContext<'a> {
    fn iteration_best_feasible(&self) -> Option<&'a Solution> {
        self.iteration_best_feasible.and_then(|i| self.solutions.get(i))
    }
}

fn deposit_for(solution: &Solution, amount: f64) -> Deposit {
    Deposit {
        arcs: solution.arcs().collect(),
        amount,
    }
}

/// Elitist Ant System.
///
/// Every feasible ant deposits `q / cost`; the run-best deposits an extra
/// `e * q / cost` on top.
#[derive(Debug, Clone, PartialEq)]
pub struct EasStrategy {
    rho: f64,
    q: f64,
    elitism_weight: f64,
}

impl EasStrategy {
    /// Creates the strategy.
    pub fn new(rho: f64, q: f64, elitism_weight: f64) -> Self {
        Self {
            rho,
            q,
            elitism_weight,
        }
    }

    fn plan(&self, ctx: &UpdateContext<'_>) -> PheromoneUpdate {
        let mut deposits: Vec<Deposit> = ctx
            .solutions
            .iter()
            .filter(|s| s.is_feasible())
            .map(|s| deposit_for(s, self.q / s.total_cost()))
            .collect();
        if let Some(best) = ctx.run_best {
            if self.elitism_weight > 0.0 {
                deposits.push(deposit_for(
                    best,
                    self.elitism_weight * self.q / best.total_cost(),
                ));
            }
        }
        PheromoneUpdate {
            evaporation: self.rho,
            deposits,
            clamp: None,
            reset: None,
        }
    }
}

/// Max-Min Ant System.
///
/// A single solution deposits and every cell is kept within
/// `[tau_min, tau_max]`. The bounds are either fixed or follow the run-best
/// cost; in the latter case the first feasible solution also refills the
/// whole matrix at the new `tau_max`.
#[derive(Debug, Clone, PartialEq)]
pub struct MmasStrategy {
    rho: f64,
    q: f64,
    deposit: MmasDeposit,
    p_best: f64,
    num_stops: usize,
    adaptive: bool,
    seeded: bool,
    tau_min: f64,
    tau_max: f64,
}

impl MmasStrategy {
    /// Bounds fixed for the whole run.
    pub fn fixed(rho: f64, q: f64, deposit: MmasDeposit, tau_min: f64, tau_max: f64) -> Self {
        Self {
            rho,
            q,
            deposit,
            p_best: 0.05,
            num_stops: 0,
            adaptive: false,
            seeded: true,
            tau_min,
            tau_max,
        }
    }

    /// Bounds derived from the run-best cost; `tau_0` stands in for
    /// `tau_max` until a feasible solution exists.
    pub fn adaptive(
        rho: f64,
        q: f64,
        deposit: MmasDeposit,
        p_best: f64,
        num_stops: usize,
        tau_0: f64,
    ) -> Self {
        let (tau_min, tau_max) = adaptive_bounds(tau_0, p_best, num_stops);
        Self {
            rho,
            q,
            deposit,
            p_best,
            num_stops,
            adaptive: true,
            seeded: false,
            tau_min,
            tau_max,
        }
    }

    /// Current `(tau_min, tau_max)`.
    pub fn bounds(&self) -> (f64, f64) {
        (self.tau_min, self.tau_max)
    }

    fn plan(&mut self, ctx: &UpdateContext<'_>) -> PheromoneUpdate {
        let mut reset = None;
        if let (true, true, Some(best)) = (self.adaptive, ctx.improved, ctx.run_best) {
            let tau_max = self.q / (self.rho * best.total_cost());
            (self.tau_min, self.tau_max) = adaptive_bounds(tau_max, self.p_best, self.num_stops);
            trace!(tau_min = self.tau_min, tau_max = self.tau_max, "trail bounds updated");
            if !self.seeded {
                self.seeded = true;
                reset = Some(self.tau_max);
            }
        }

        let source = match self.deposit {
            MmasDeposit::IterationBest => ctx.iteration_best_feasible(),
            MmasDeposit::RunBest => ctx.run_best,
        };
        let deposits = source
            .filter(|s| s.is_feasible())
            .map(|s| vec![deposit_for(s, self.q / s.total_cost())])
            .unwrap_or_default();

        PheromoneUpdate {
            evaporation: self.rho,
            deposits,
            clamp: Some((self.tau_min, self.tau_max)),
            reset,
        }
    }

    fn restart(&self) -> PheromoneUpdate {
        PheromoneUpdate {
            evaporation: 0.0,
            deposits: Vec::new(),
            clamp: Some((self.tau_min, self.tau_max)),
            reset: Some(self.tau_max),
        }
    }
}

/// `(tau_min, tau_max)` for a given `tau_max`, `p_best` and stop count
/// (depot included).
///
/// Falls back to `tau_min = 0.05 * tau_max` when the closed form does not
/// give a ratio strictly between 0 and 1.
pub fn adaptive_bounds(tau_max: f64, p_best: f64, num_stops: usize) -> (f64, f64) {
    let n = num_stops as f64;
    let root = p_best.powf(1.0 / n);
    let ratio = (1.0 - root) / ((n / 2.0 - 1.0) * root);
    let ratio = if ratio > 0.0 && ratio < 1.0 { ratio } else { 0.05 };
    (tau_max * ratio, tau_max)
}

/// The pheromone update rule of a run.
///
/// The optimization loop only calls [`plan`](Self::plan) and
/// [`restart`](Self::restart) and never looks at the variant.
///
/// # Examples
///
/// ```
/// use u_colony::colony::{ColonyConfig, Strategy, StrategyKind};
///
/// let eas = Strategy::from_config(&ColonyConfig::default(), 10);
/// assert_eq!(eas.kind(), StrategyKind::Eas);
/// assert!(eas.restart().is_none());
///
/// let config = ColonyConfig::default()
///     .with_strategy(StrategyKind::Mmas)
///     .with_trail_bounds(0.01, 2.0);
/// let mmas = Strategy::from_config(&config, 10);
/// assert_eq!(mmas.bounds(), Some((0.01, 2.0)));
/// assert_eq!(mmas.restart().and_then(|u| u.reset), Some(2.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    /// Elitist Ant System.
    Eas(EasStrategy),
    /// Max-Min Ant System.
    Mmas(MmasStrategy),
}

impl Strategy {
    /// Builds the strategy selected by `config` for a problem with
    /// `num_stops` stops (depot included).
    pub fn from_config(config: &ColonyConfig, num_stops: usize) -> Self {
        match config.strategy {
            StrategyKind::Eas => {
                Strategy::Eas(EasStrategy::new(config.rho, config.q, config.elitism_weight))
            }
            StrategyKind::Mmas => match (config.tau_min, config.tau_max) {
                (Some(lo), Some(hi)) => Strategy::Mmas(MmasStrategy::fixed(
                    config.rho,
                    config.q,
                    config.mmas_deposit,
                    lo,
                    hi,
                )),
                _ => Strategy::Mmas(MmasStrategy::adaptive(
                    config.rho,
                    config.q,
                    config.mmas_deposit,
                    config.p_best,
                    num_stops,
                    config.tau_0,
                )),
            },
        }
    }

    /// Which rule this is.
    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Eas(_) => StrategyKind::Eas,
            Strategy::Mmas(_) => StrategyKind::Mmas,
        }
    }

    /// Trail bounds currently enforced, if any.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match self {
            Strategy::Eas(_) => None,
            Strategy::Mmas(m) => Some(m.bounds()),
        }
    }

    /// Plans the regular end-of-iteration update.
    pub fn plan(&mut self, ctx: &UpdateContext<'_>) -> PheromoneUpdate {
        match self {
            Strategy::Eas(s) => s.plan(ctx),
            Strategy::Mmas(s) => s.plan(ctx),
        }
    }

    /// The update that replaces [`plan`](Self::plan) after stagnation, or
    /// `None` if this rule does not restart.
    pub fn restart(&self) -> Option<PheromoneUpdate> {
        match self {
            Strategy::Eas(_) => None,
            Strategy::Mmas(s) => Some(s.restart()),
        }
    }
}
