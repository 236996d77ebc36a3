//! Solution and violation types.

use serde::{Deserialize, Serialize};

use super::Route;

/// What an evaluation found wrong with a solution.
///
/// Route indices refer to [`Solution::routes`]; stop ids are positions in
/// the problem's stop list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Route load above its vehicle's capacity.
    CapacityExceeded {
        route_index: usize,
        load: u32,
        capacity: u32,
    },
    /// Arrival after the stop closes.
    TimeWindowViolated {
        stop_id: usize,
        arrival: f64,
        due: f64,
    },
    /// Back at the depot after it closes.
    DepotReturnLate {
        route_index: usize,
        arrival: f64,
        due: f64,
    },
    /// No route visits the stop.
    Unserved { stop_id: usize },
    /// More than one visit to the stop.
    DuplicateVisit { stop_id: usize },
    /// The depot, or an id past the last stop, inside a route.
    UnknownStop { route_index: usize, stop_id: usize },
    /// Vehicle index outside the fleet, or already driving another route.
    InvalidVehicle {
        route_index: usize,
        vehicle_index: usize,
    },
}

/// One entry of [`Solution::violations`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// What went wrong.
    pub kind: ViolationType,
}

impl Violation {
    /// Wraps `kind`.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}

/// A complete multi-vehicle answer to a routing problem.
///
/// Cost and feasibility are filled in by the
/// [`SolutionEvaluator`](crate::evaluation::SolutionEvaluator); a fresh
/// solution reports itself infeasible until evaluated.
///
/// # Examples
///
/// ```
/// use u_colony::models::Solution;
///
/// let mut sol = Solution::new();
/// sol.add_unassigned(3);
/// assert_eq!(sol.num_routes(), 0);
/// assert_eq!(sol.unassigned(), &[3]);
/// assert!(!sol.is_feasible());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    routes: Vec<Route>,
    unassigned: Vec<usize>,
    raw_cost: f64,
    total_cost: f64,
    feasible: bool,
    violations: Vec<Violation>,
}

impl Solution {
    /// Creates an empty, unevaluated solution.
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            unassigned: Vec::new(),
            raw_cost: 0.0,
            total_cost: 0.0,
            feasible: false,
            violations: Vec::new(),
        }
    }

    /// Appends a route.
    pub fn add_route(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// Records a stop no route could take.
    pub fn add_unassigned(&mut self, stop_id: usize) {
        self.unassigned.push(stop_id);
    }

    /// Routes in vehicle order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Vehicles in use.
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Stops no route serves.
    pub fn unassigned(&self) -> &[usize] {
        &self.unassigned
    }

    /// Cost before penalties.
    pub fn raw_cost(&self) -> f64 {
        self.raw_cost
    }

    /// Cost including penalties; equals [`raw_cost`](Self::raw_cost) when feasible.
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// `true` once evaluated with no violations and no unserved stops.
    pub fn is_feasible(&self) -> bool {
        self.feasible
    }

    /// Violations found by the last evaluation.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub(crate) fn set_raw_cost(&mut self, cost: f64) {
        self.raw_cost = cost;
    }

    pub(crate) fn set_evaluation(
        &mut self,
        total_cost: f64,
        feasible: bool,
        violations: Vec<Violation>,
    ) {
        self.total_cost = total_cost;
        self.feasible = feasible;
        self.violations = violations;
    }

    /// Summed route distance.
    pub fn total_distance(&self) -> f64 {
        self.routes.iter().map(|r| r.total_distance()).sum()
    }

    /// Visits over all routes.
    pub fn num_served(&self) -> usize {
        self.routes.iter().map(|r| r.len()).sum()
    }

    /// Every traversed arc of every route.
    pub fn arcs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.routes.iter().flat_map(|r| r.arcs())
    }
}

impl Default for Solution {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Fleet, Visit};

    fn visit(stop_id: usize) -> Visit {
        Visit {
            stop_id,
            arrival_time: 0.0,
            service_start: 0.0,
            departure_time: 0.0,
            load_after: 0,
        }
    }

    #[test]
    fn test_solution_empty() {
        let sol = Solution::new();
        assert_eq!(sol.num_routes(), 0);
        assert!(sol.unassigned().is_empty());
        assert_eq!(sol.total_cost(), 0.0);
        assert_eq!(sol.num_served(), 0);
        assert!(!sol.is_feasible());
    }

    #[test]
    fn test_solution_with_routes() {
        let fleet = Fleet::homogeneous(10, 2).expect("valid");
        let mut sol = Solution::new();

        let mut r1 = Route::new(&fleet.vehicles()[0], 0.0);
        r1.push_visit(visit(1));
        r1.close(50.0, 50.0);

        let mut r2 = Route::new(&fleet.vehicles()[1], 0.0);
        r2.push_visit(visit(2));
        r2.push_visit(visit(3));
        r2.close(80.0, 80.0);

        sol.add_route(r1);
        sol.add_route(r2);
        sol.add_unassigned(4);

        assert_eq!(sol.num_routes(), 2);
        assert_eq!(sol.num_served(), 3);
        assert!((sol.total_distance() - 130.0).abs() < 1e-10);
        assert_eq!(sol.arcs().count(), 5);
    }

    #[test]
    fn test_set_evaluation() {
        let mut sol = Solution::new();
        sol.set_raw_cost(12.0);
        sol.set_evaluation(12.0, true, vec![]);
        assert!(sol.is_feasible());
        assert_eq!(sol.raw_cost(), 12.0);
        assert_eq!(sol.total_cost(), 12.0);
    }

    #[test]
    fn test_violation_types() {
        let v = Violation::new(ViolationType::CapacityExceeded {
            route_index: 0,
            load: 250,
            capacity: 200,
        });
        assert!(matches!(
            v.kind,
            ViolationType::CapacityExceeded { load: 250, .. }
        ));
    }
}
