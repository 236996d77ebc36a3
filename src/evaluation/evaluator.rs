//! Solution evaluator that computes timing, load, cost and feasibility.

use serde::{Deserialize, Serialize};

use crate::models::{
    Problem, Route, Solution, Stop, Vehicle, Violation, ViolationType, Visit, DEPOT,
};

use super::CostModel;

/// Arrival, service start and departure at `stop` when leaving the previous
/// location at `departure` and travelling for `travel_time`.
///
/// Shared by the construction heuristic and [`SolutionEvaluator::build_route`]
/// so both produce bit-identical schedules.
pub(crate) fn visit_timing(stop: &Stop, departure: f64, travel_time: f64) -> (f64, f64, f64) {
    let arrival = departure + travel_time;
    let service_start = match stop.time_window() {
        Some(tw) => arrival + tw.waiting_time(arrival),
        None => arrival,
    };
    (arrival, service_start, service_start + stop.service_duration())
}

/// Outcome of evaluating a [`Solution`].
///
/// Violation magnitudes are in problem units: overloaded demand for
/// capacity, time units of lateness for windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Cost before penalties.
    pub raw_cost: f64,
    /// Cost including penalties.
    pub cost: f64,
    /// Summed overload plus the fleet shortfall when stops are left unserved.
    pub capacity_violation: f64,
    /// Summed lateness at stops and at the depot return.
    pub time_window_violation: f64,
    /// Stops no route visits.
    pub unserved: Vec<usize>,
    /// Stops visited more than once.
    pub duplicated: Vec<usize>,
    /// Every violation found.
    pub violations: Vec<Violation>,
    /// `true` when `violations` is empty.
    pub feasible: bool,
}

/// Re-derives schedules, loads and cost of solutions against a [`Problem`].
///
/// The evaluator never trusts the timing stored in a route: it rebuilds each
/// schedule from the stop sequence alone.
///
/// # Examples
///
/// ```
/// use u_colony::distance::EuclideanProvider;
/// use u_colony::evaluation::{CostModel, SolutionEvaluator};
/// use u_colony::models::{Fleet, Problem, Solution, Stop};
///
/// let stops = vec![
///     Stop::depot(0.0, 0.0),
///     Stop::new(1, 3.0, 4.0, 10, 5.0),
///     Stop::new(2, 6.0, 8.0, 20, 5.0),
/// ];
/// let fleet = Fleet::homogeneous(100, 1).unwrap();
/// let problem = Problem::from_provider(stops, fleet, &EuclideanProvider::default()).unwrap();
///
/// let evaluator = SolutionEvaluator::new(&problem, CostModel::default(), 1000.0);
/// let route = evaluator.build_route(&problem.fleet().vehicles()[0], &[1, 2]);
/// assert!((route.total_distance() - 20.0).abs() < 1e-10);
///
/// let mut solution = Solution::new();
/// solution.add_route(route);
/// let eval = evaluator.evaluate(&solution);
/// assert!(eval.feasible);
/// assert!((eval.cost - 20.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SolutionEvaluator<'a> {
    problem: &'a Problem,
    cost_model: CostModel,
    penalty_weight: f64,
}

impl<'a> SolutionEvaluator<'a> {
    /// Creates a new evaluator for the given problem.
    pub fn new(problem: &'a Problem, cost_model: CostModel, penalty_weight: f64) -> Self {
        Self {
            problem,
            cost_model,
            penalty_weight,
        }
    }

    /// The cost model in use.
    pub fn cost_model(&self) -> &CostModel {
        &self.cost_model
    }

    /// Builds a route from a sequence of stop ids, computing timing and load.
    ///
    /// Every id must be a valid non-depot stop index. Constraints are not
    /// checked here; see [`evaluate`](Self::evaluate).
    pub fn build_route(&self, vehicle: &Vehicle, stop_ids: &[usize]) -> Route {
        let stops = self.problem.stops();
        let costs = self.problem.costs();
        let mut route = Route::new(vehicle, self.problem.depot().ready_time());
        let mut time = route.start_time();
        let mut load: u32 = 0;
        let mut distance = 0.0;
        let mut prev = DEPOT;

        for &sid in stop_ids {
            let stop = &stops[sid];
            distance += costs.distance(prev, sid);
            let (arrival_time, service_start, departure_time) =
                visit_timing(stop, time, costs.duration(prev, sid));
            load = load.saturating_add(stop.demand());
            route.push_visit(Visit {
                stop_id: sid,
                arrival_time,
                service_start,
                departure_time,
                load_after: load,
            });
            time = departure_time;
            prev = sid;
        }

        if !route.is_empty() {
            distance += costs.distance(prev, DEPOT);
            time += costs.duration(prev, DEPOT);
        }
        route.close(distance, time);
        route
    }

    /// Evaluates an entire solution.
    pub fn evaluate(&self, solution: &Solution) -> Evaluation {
        let stops = self.problem.stops();
        let fleet = self.problem.fleet();
        let depot_window = self.problem.depot().time_window().copied();

        let mut violations = Vec::new();
        let mut visit_count = vec![0usize; stops.len()];
        let mut vehicle_used = vec![false; fleet.len()];
        let mut raw_cost = 0.0;
        let mut capacity_violation = 0.0;
        let mut time_window_violation = 0.0;
        let mut structural = 0usize;

        for (route_index, route) in solution.routes().iter().enumerate() {
            let vehicle = match fleet.vehicles().get(route.vehicle_index()) {
                Some(v) if !vehicle_used[v.index] => {
                    vehicle_used[v.index] = true;
                    *v
                }
                _ => {
                    violations.push(Violation::new(ViolationType::InvalidVehicle {
                        route_index,
                        vehicle_index: route.vehicle_index(),
                    }));
                    structural += 1;
                    Vehicle {
                        index: route.vehicle_index(),
                        class: 0,
                        capacity: route.capacity(),
                    }
                }
            };

            let mut ids = Vec::with_capacity(route.len());
            for sid in route.stop_ids() {
                if sid == DEPOT || sid >= stops.len() {
                    violations.push(Violation::new(ViolationType::UnknownStop {
                        route_index,
                        stop_id: sid,
                    }));
                    structural += 1;
                } else {
                    visit_count[sid] += 1;
                    ids.push(sid);
                }
            }

            let rebuilt = self.build_route(&vehicle, &ids);
            raw_cost += self.cost_model.route_cost(&rebuilt);

            if rebuilt.total_load() > vehicle.capacity {
                capacity_violation += f64::from(rebuilt.total_load() - vehicle.capacity);
                violations.push(Violation::new(ViolationType::CapacityExceeded {
                    route_index,
                    load: rebuilt.total_load(),
                    capacity: vehicle.capacity,
                }));
            }

            for visit in rebuilt.visits() {
                if let Some(tw) = stops[visit.stop_id].time_window() {
                    if tw.is_violated(visit.arrival_time) {
                        time_window_violation += tw.lateness(visit.arrival_time);
                        violations.push(Violation::new(ViolationType::TimeWindowViolated {
                            stop_id: visit.stop_id,
                            arrival: visit.arrival_time,
                            due: tw.due(),
                        }));
                    }
                }
            }

            if let Some(tw) = depot_window {
                if !rebuilt.is_empty() && tw.is_violated(rebuilt.return_time()) {
                    time_window_violation += tw.lateness(rebuilt.return_time());
                    violations.push(Violation::new(ViolationType::DepotReturnLate {
                        route_index,
                        arrival: rebuilt.return_time(),
                        due: tw.due(),
                    }));
                }
            }
        }

        let mut unserved = Vec::new();
        let mut duplicated = Vec::new();
        for (sid, &count) in visit_count.iter().enumerate().skip(1) {
            match count {
                0 => {
                    unserved.push(sid);
                    violations.push(Violation::new(ViolationType::Unserved { stop_id: sid }));
                }
                1 => {}
                _ => {
                    duplicated.push(sid);
                    violations.push(Violation::new(ViolationType::DuplicateVisit { stop_id: sid }));
                }
            }
        }

        if !unserved.is_empty() {
            let shortfall = self
                .problem
                .total_demand()
                .saturating_sub(fleet.total_capacity());
            capacity_violation += shortfall as f64;
        }

        let feasible = violations.is_empty();
        let magnitude = capacity_violation
            + time_window_violation
            + (unserved.len() + duplicated.len() + structural) as f64;
        let cost = if feasible {
            raw_cost
        } else {
            raw_cost + self.penalty_weight * magnitude
        };

        Evaluation {
            raw_cost,
            cost,
            capacity_violation,
            time_window_violation,
            unserved,
            duplicated,
            violations,
            feasible,
        }
    }

    /// Evaluates `solution` and stores cost, feasibility and violations in it.
    pub fn evaluate_into(&self, solution: &mut Solution) -> Evaluation {
        let eval = self.evaluate(solution);
        solution.set_raw_cost(eval.raw_cost);
        solution.set_evaluation(eval.cost, eval.feasible, eval.violations.clone());
        eval
    }
}
