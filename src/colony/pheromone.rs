//! Pheromone trail matrix and its per-iteration update.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{ColonyError, ConfigError};

/// Smallest value evaporation may leave in a cell.
pub const MIN_TRAIL: f64 = f64::MIN_POSITIVE;

/// Trail reinforcement along the arcs of one solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deposit {
    /// Traversed `(from, to)` arcs, depot legs included.
    pub arcs: Vec<(usize, usize)>,
    /// Amount added to every arc.
    pub amount: f64,
}

/// Everything that turns one pheromone generation into the next.
///
/// Applied as reset (if any), evaporate, deposits in order, then clamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PheromoneUpdate {
    /// Evaporation rate `rho`.
    pub evaporation: f64,
    /// Deposits in application order.
    pub deposits: Vec<Deposit>,
    /// `(tau_min, tau_max)` bounds enforced after depositing.
    pub clamp: Option<(f64, f64)>,
    /// Uniform refill applied before everything else.
    pub reset: Option<f64>,
}

/// Square table of trail intensities, one cell per ordered stop pair.
///
/// Every cell stays strictly positive. A matrix is one generation: ants
/// read it through a shared reference and [`apply`](Self::apply) builds the
/// successor once every ant has returned.
///
/// # Examples
///
/// ```
/// use u_colony::colony::{Deposit, PheromoneMatrix, PheromoneUpdate};
///
/// let tau = PheromoneMatrix::new(3, 1.0, true).unwrap();
/// let next = tau
///     .apply(&PheromoneUpdate {
///         evaporation: 0.5,
///         deposits: vec![Deposit { arcs: vec![(0, 1), (1, 0)], amount: 0.25 }],
///         clamp: None,
///         reset: None,
///     })
///     .unwrap();
/// // symmetric: (0, 1) gets both traversals
/// assert!((next.get(0, 1) - 1.0).abs() < 1e-12);
/// assert!((next.get(0, 2) - 0.5).abs() < 1e-12);
/// assert_eq!(tau.get(0, 2), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PheromoneMatrix {
    size: usize,
    symmetric: bool,
    trails: Vec<f64>,
}

impl PheromoneMatrix {
    /// Fills a `size`×`size` matrix with `tau_0`.
    ///
    /// With `symmetric` set, every deposit also reinforces the reverse arc.
    pub fn new(size: usize, tau_0: f64, symmetric: bool) -> Result<Self, ColonyError> {
        if !(tau_0.is_finite() && tau_0 > 0.0) {
            return Err(ConfigError::invalid("tau_0", "must be finite and > 0").into());
        }
        Ok(Self {
            size,
            symmetric,
            trails: vec![tau_0; size * size],
        })
    }

    /// Number of stops covered.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether deposits are mirrored.
    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    /// Trail on the arc `from -> to`.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.trails[from * self.size + to]
    }

    /// All cells in row-major order.
    pub fn values(&self) -> &[f64] {
        &self.trails
    }

    /// Smallest and largest cell.
    pub fn bounds(&self) -> (f64, f64) {
        self.trails
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &t| {
                (lo.min(t), hi.max(t))
            })
    }

    /// Multiplies every cell by `1 - rho`, never going below [`MIN_TRAIL`].
    pub fn evaporate(&mut self, rho: f64) {
        let keep = 1.0 - rho;
        for t in &mut self.trails {
            *t = (*t * keep).max(MIN_TRAIL);
        }
    }

    /// Adds `amount` to each arc (and its reverse when symmetric).
    pub fn deposit<I>(&mut self, arcs: I, amount: f64)
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        for (i, j) in arcs {
            self.trails[i * self.size + j] += amount;
            if self.symmetric && i != j {
                self.trails[j * self.size + i] += amount;
            }
        }
    }

    /// Forces every cell into `[tau_min, tau_max]`.
    pub fn clamp(&mut self, tau_min: f64, tau_max: f64) {
        for t in &mut self.trails {
            *t = t.clamp(tau_min, tau_max);
        }
    }

    /// Sets every cell to `value`.
    pub fn reset(&mut self, value: f64) {
        self.trails.fill(value);
    }

    /// Builds the next generation.
    ///
    /// Fails with [`ColonyError::NumericalDegeneracy`] if any resulting cell
    /// is non-finite or not strictly positive.
    pub fn apply(&self, update: &PheromoneUpdate) -> Result<PheromoneMatrix, ColonyError> {
        let mut next = self.clone();
        if let Some(value) = update.reset {
            trace!(value, "pheromone reset");
            next.reset(value);
        }
        if update.evaporation > 0.0 {
            next.evaporate(update.evaporation);
        }
        for d in &update.deposits {
            next.deposit(d.arcs.iter().copied(), d.amount);
        }
        if let Some((lo, hi)) = update.clamp {
            if !(lo.is_finite() && hi.is_finite() && lo > 0.0 && lo <= hi) {
                return Err(ColonyError::NumericalDegeneracy(format!(
                    "invalid trail bounds [{lo}, {hi}]"
                )));
            }
            next.clamp(lo, hi);
        }
        next.check()?;
        Ok(next)
    }

    fn check(&self) -> Result<(), ColonyError> {
        match self
            .trails
            .iter()
            .position(|t| !(t.is_finite() && *t > 0.0))
        {
            Some(idx) => Err(ColonyError::NumericalDegeneracy(format!(
                "trail ({}, {}) = {}",
                idx / self.size,
                idx % self.size,
                self.trails[idx]
            ))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(evaporation: f64) -> PheromoneUpdate {
        PheromoneUpdate {
            evaporation,
            deposits: Vec::new(),
            clamp: None,
            reset: None,
        }
    }

    #[test]
    fn test_new_rejects_bad_tau_0() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = PheromoneMatrix::new(3, bad, true).unwrap_err();
            assert!(matches!(
                err,
                ColonyError::Config(ConfigError::InvalidParameter { field: "tau_0", .. })
            ));
        }
    }

    #[test]
    fn test_evaporate_scales_and_floors() {
        let mut tau = PheromoneMatrix::new(2, 1.0, false).expect("valid");
        tau.evaporate(0.25);
        assert!(tau.values().iter().all(|&t| (t - 0.75).abs() < 1e-12));

        let mut tiny = PheromoneMatrix::new(2, MIN_TRAIL, false).expect("valid");
        tiny.evaporate(0.9);
        assert!(tiny.values().iter().all(|&t| t == MIN_TRAIL));
    }

    #[test]
    fn test_deposit_asymmetric() {
        let mut tau = PheromoneMatrix::new(3, 1.0, false).expect("valid");
        tau.deposit([(0, 2), (2, 1)], 0.5);
        assert_eq!(tau.get(0, 2), 1.5);
        assert_eq!(tau.get(2, 0), 1.0);
        assert_eq!(tau.get(2, 1), 1.5);
        assert_eq!(tau.get(1, 2), 1.0);
    }

    #[test]
    fn test_deposit_symmetric() {
        let mut tau = PheromoneMatrix::new(3, 1.0, true).expect("valid");
        tau.deposit([(0, 2)], 0.5);
        assert_eq!(tau.get(0, 2), 1.5);
        assert_eq!(tau.get(2, 0), 1.5);
    }

    #[test]
    fn test_clamp_and_bounds() {
        let mut tau = PheromoneMatrix::new(3, 1.0, false).expect("valid");
        tau.deposit([(0, 1)], 10.0);
        tau.evaporate(0.9);
        tau.clamp(0.2, 0.5);
        let (lo, hi) = tau.bounds();
        assert!((lo - 0.2).abs() < 1e-12);
        assert!((hi - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_apply_leaves_source_untouched() {
        let tau = PheromoneMatrix::new(3, 1.0, true).expect("valid");
        let next = tau.apply(&update(0.5)).expect("valid");
        assert_eq!(tau.get(1, 2), 1.0);
        assert_eq!(next.get(1, 2), 0.5);
    }

    #[test]
    fn test_apply_order_is_evaporate_deposit_clamp() {
        let tau = PheromoneMatrix::new(2, 1.0, false).expect("valid");
        let next = tau
            .apply(&PheromoneUpdate {
                evaporation: 0.5,
                deposits: vec![Deposit {
                    arcs: vec![(0, 1)],
                    amount: 2.0,
                }],
                clamp: Some((0.6, 2.0)),
                reset: None,
            })
            .expect("valid");
        assert_eq!(next.get(0, 1), 2.0);
        assert_eq!(next.get(1, 0), 0.6);
    }

    #[test]
    fn test_apply_reset() {
        let mut tau = PheromoneMatrix::new(3, 1.0, true).expect("valid");
        tau.deposit([(0, 1)], 4.0);
        let mut u = update(0.0);
        u.reset = Some(3.0);
        let next = tau.apply(&u).expect("valid");
        assert!(next.values().iter().all(|&t| t == 3.0));

        // a reset is followed by the regular update
        u.evaporation = 0.5;
        u.clamp = Some((0.1, 1.2));
        u.deposits.push(Deposit {
            arcs: vec![(1, 2)],
            amount: 0.5,
        });
        let next = tau.apply(&u).expect("valid");
        assert_eq!(next.get(0, 1), 1.2);
        assert_eq!(next.get(1, 2), 1.2);
        assert_eq!(next.get(0, 2), 1.2);
    }

    #[test]
    fn test_apply_detects_degeneracy() {
        let tau = PheromoneMatrix::new(2, 1.0, false).expect("valid");
        let mut u = update(0.5);
        u.deposits.push(Deposit {
            arcs: vec![(0, 1)],
            amount: f64::INFINITY,
        });
        assert!(matches!(
            tau.apply(&u),
            Err(ColonyError::NumericalDegeneracy(_))
        ));

        let mut u = update(0.5);
        u.clamp = Some((0.0, 1.0));
        assert!(matches!(
            tau.apply(&u),
            Err(ColonyError::NumericalDegeneracy(_))
        ));
    }
}
