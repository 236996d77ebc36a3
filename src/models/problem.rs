//! Routing problem instance.

use crate::distance::{CostMatrix, CostProvider};
use crate::error::{ColonyError, ProblemError};

use super::{Fleet, Stop, DEPOT};

/// A capacitated, time-windowed routing problem: stops, fleet and costs.
///
/// Immutable once built; ants and the evaluator share it by reference.
///
/// # Examples
///
/// ```
/// use u_colony::distance::EuclideanProvider;
/// use u_colony::models::{Fleet, Problem, Stop};
///
/// let stops = vec![
///     Stop::depot(0.0, 0.0),
///     Stop::new(1, 1.0, 0.0, 5, 0.0),
///     Stop::new(2, 2.0, 0.0, 5, 0.0),
/// ];
/// let fleet = Fleet::homogeneous(10, 1).unwrap();
/// let problem = Problem::from_provider(stops, fleet, &EuclideanProvider::default()).unwrap();
/// assert_eq!(problem.num_customers(), 2);
/// assert_eq!(problem.total_demand(), 10);
/// ```
#[derive(Debug, Clone)]
pub struct Problem {
    stops: Vec<Stop>,
    fleet: Fleet,
    costs: CostMatrix,
    symmetric: bool,
}

impl Problem {
    /// Creates a problem from already computed costs.
    ///
    /// Stop ids must match their positions, the depot (position 0) must have
    /// no demand, and at least one other stop must exist. Service durations
    /// must be finite and non-negative.
    pub fn new(stops: Vec<Stop>, fleet: Fleet, costs: CostMatrix) -> Result<Self, ProblemError> {
        if stops.len() < 2 {
            return Err(ProblemError::NoStops);
        }
        if let Some((position, stop)) = stops.iter().enumerate().find(|(i, s)| s.id() != *i) {
            return Err(ProblemError::StopIdMismatch {
                position,
                id: stop.id(),
            });
        }
        if stops[DEPOT].demand() != 0 {
            return Err(ProblemError::DepotDemand(stops[DEPOT].demand()));
        }
        if let Some(stop) = stops
            .iter()
            .find(|s| !(s.service_duration().is_finite() && s.service_duration() >= 0.0))
        {
            return Err(ProblemError::ServiceDuration {
                stop: stop.id(),
                value: stop.service_duration(),
            });
        }
        if costs.size() != stops.len() {
            return Err(ProblemError::MatrixSize {
                matrix: costs.size(),
                stops: stops.len(),
            });
        }
        let symmetric = costs.is_symmetric(1e-9);
        Ok(Self {
            stops,
            fleet,
            costs,
            symmetric,
        })
    }

    /// Fetches costs from `provider` and builds the problem.
    pub fn from_provider<P>(stops: Vec<Stop>, fleet: Fleet, provider: &P) -> Result<Self, ColonyError>
    where
        P: CostProvider + ?Sized,
    {
        let costs = provider.get_costs(&stops)?;
        Ok(Self::new(stops, fleet, costs)?)
    }

    /// All locations (index 0 = depot).
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// The depot.
    pub fn depot(&self) -> &Stop {
        &self.stops[DEPOT]
    }

    /// Available vehicles.
    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    /// Pairwise travel costs.
    pub fn costs(&self) -> &CostMatrix {
        &self.costs
    }

    /// Number of stops excluding the depot.
    pub fn num_customers(&self) -> usize {
        self.stops.len() - 1
    }

    /// Whether the cost matrix is symmetric.
    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    /// Sum of all stop demands.
    pub fn total_demand(&self) -> u64 {
        self.stops.iter().map(|s| u64::from(s.demand())).sum()
    }
}
